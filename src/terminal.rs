//! Terminal Executor
//!
//! Ties together the parser, screen model and configuration, and applies
//! parsed actions to update the terminal state. This is the public face
//! of the engine: bytes go in through [`Terminal::write`], display cells
//! and events come out, and local input is translated back to bytes.

use tracing::debug;

use crate::app::Config;
use crate::core::{
    AlternateScreen, Cell, Cursor, Event, Flags, Modes, MouseButton, MouseModifiers,
    MouseTracking, Screen, Snapshot,
};
use crate::input::{self, Key, Modifiers};
use crate::parser::{Action, Command, ControlCode, Parser};

/// A count parameter: 0 or missing means 1
fn count(n: u16) -> usize {
    usize::from(n.max(1))
}

/// A 1-based position parameter converted to 0-based
fn position(n: u16) -> usize {
    usize::from(n.max(1)) - 1
}

/// The terminal engine
#[derive(Debug, Clone)]
pub struct Terminal {
    screen: Screen,
    parser: Parser,
    config: Config,
}

impl Terminal {
    /// Create a new terminal. Dimensions are at least 1x1.
    pub fn new(rows: usize, cols: usize, config: Config) -> Self {
        Self {
            screen: Screen::new(rows, cols, config.default_attributes(), config.debug),
            parser: Parser::with_debug(config.debug),
            config,
        }
    }

    /// Get a reference to the screen
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn rows(&self) -> usize {
        self.screen.rows()
    }

    pub fn columns(&self) -> usize {
        self.screen.cols()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the configuration. Cells already written keep their
    /// attributes.
    pub fn set_config(&mut self, config: Config) {
        self.screen.set_defaults(config.default_attributes());
        self.screen.set_debug(config.debug);
        self.parser.set_debug(config.debug);
        self.config = config;
    }

    pub fn modes(&self) -> &Modes {
        &self.screen.modes
    }

    pub fn scroll_region(&self) -> (usize, usize) {
        self.screen.scroll_region()
    }

    /// Cursor with its position clamped into the grid
    pub fn cursor(&self) -> Cursor {
        self.screen.cursor().clamped(self.rows(), self.columns())
    }

    /// Power-on state: blank screen, default attribute and modes
    pub fn reset(&mut self) {
        self.parser.reset();
        self.screen.reset();
    }

    /// Resize, dropping all content
    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.parser.reset();
        self.screen.resize(rows, cols);
    }

    /// Process bytes received from the application
    pub fn write(&mut self, data: &[u8]) {
        for action in self.parser.parse(data) {
            self.apply_action(action);
        }
    }

    /// Take the oldest pending event
    pub fn next_event(&mut self) -> Option<Event> {
        self.screen.next_event()
    }

    /// Take every pending event, oldest first
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.screen.events_mut().drain().collect()
    }

    /// Stored cell, `None` outside the grid
    pub fn raw_cell(&self, row: usize, col: usize) -> Option<Cell> {
        self.screen.cell(row, col)
    }

    /// Cell as it should be displayed.
    ///
    /// The cursor is drawn into the cell when automatic cursor rendering
    /// is on, bold base colors are brightened when configured, and
    /// reverse video is resolved into swapped colors. Coordinates outside
    /// the grid yield a blank cell with the default attribute.
    pub fn cell_at(&self, row: usize, col: usize) -> Cell {
        let Some(mut cell) = self.screen.cell(row, col) else {
            return Cell::blank(self.screen.defaults());
        };

        let cursor = self.screen.cursor();
        let last_col = self.columns() - 1;
        let under_cursor = cursor.row == row
            && (cursor.col == col || (col == last_col && cursor.col > last_col));
        if under_cursor && cursor.visible && self.config.automatic_cursor {
            let bg = if cursor.blinking {
                self.config.blinking_cursor_color
            } else {
                self.config.cursor_color
            };
            cell.attr.set_bg(bg);
            cell.attr.set_fg(self.config.cursor_char_color);
        }

        if self.config.bold_is_bright && cell.attr.contains(Flags::BOLD) {
            let fg = cell.attr.fg().brightened();
            cell.attr.set_fg(fg);
        }

        if cell.attr.contains(Flags::REVERSE) {
            let (fg, bg) = (cell.attr.fg(), cell.attr.bg());
            cell.attr.set_fg(bg);
            cell.attr.set_bg(fg);
            cell.attr.flags.remove(Flags::REVERSE);
        }

        cell
    }

    /// Serializable view of the stored screen
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_screen(&self.screen)
    }

    /// Bytes to send for a key press
    pub fn translate_key(&self, key: Key, shift: bool, ctrl: bool) -> Vec<u8> {
        input::encode_key(key, Modifiers::new(shift, ctrl), self.screen.modes.cursor_app)
    }

    /// Bytes to send for a mouse button press or release
    pub fn translate_mouse_click(
        &mut self,
        row: usize,
        col: usize,
        button: MouseButton,
        down: bool,
        modifiers: MouseModifiers,
    ) -> Vec<u8> {
        let screen = &mut self.screen;
        input::encode_mouse_click(&screen.modes, &mut screen.mouse, row, col, button, down, modifiers)
    }

    /// Bytes to send for pointer motion
    pub fn translate_mouse_move(&mut self, row: usize, col: usize) -> Vec<u8> {
        let screen = &mut self.screen;
        input::encode_mouse_move(&screen.modes, &mut screen.mouse, row, col)
    }

    /// Apply a single parsed action to the screen
    fn apply_action(&mut self, action: Action) {
        match action {
            Action::Print(byte) => {
                let glyph = if self.screen.modes.acs {
                    self.config.acs_glyph(byte)
                } else {
                    byte
                };
                self.screen.print(glyph);
            },
            Action::Control(control) => self.execute_control(control),
            Action::Command(command) => self.execute_command(command),
            Action::TextCaptured { kind, text } => {
                self.screen.push_event(Event::TextReceived { kind, text });
            },
        }
    }

    /// Execute a C0 control character
    fn execute_control(&mut self, control: ControlCode) {
        match control {
            ControlCode::Bell => self.screen.push_event(Event::Bell),
            ControlCode::Backspace => self.screen.backspace(),
            ControlCode::Tab => self.screen.tab(),
            ControlCode::LineFeed => self.screen.line_feed(),
            ControlCode::CarriageReturn => self.screen.to_line_start(),
        }
    }

    /// Execute a recognized escape sequence
    fn execute_command(&mut self, command: Command) {
        let screen = &mut self.screen;
        match command {
            Command::CursorUp(n) => screen.move_up(count(n)),
            Command::CursorDown(n) => screen.move_down(count(n)),
            Command::CursorForward(n) => screen.move_forward(count(n)),
            Command::CursorBack(n) => screen.move_backward(count(n)),
            Command::CursorNextLine(n) => {
                let row = screen.cursor().row.saturating_add(count(n));
                screen.move_to(row, 0);
            },
            Command::CursorPrevLine(n) => {
                let row = screen.cursor().row.min(screen.rows() - 1).saturating_sub(count(n));
                screen.move_to(row, 0);
            },
            Command::CursorColumn(n) => screen.move_to_col(position(n)),
            Command::CursorRow(n) => screen.move_to_row(position(n)),
            Command::CursorPosition { row, col } => screen.move_to(position(row), position(col)),

            Command::EraseInDisplay(mode) => screen.erase_in_display(mode),
            Command::EraseInLine(mode) => screen.erase_in_line(mode),
            Command::EraseChars(n) => screen.erase_chars(count(n)),

            Command::InsertLines(n) => screen.insert_lines(count(n)),
            Command::DeleteLines(n) => screen.delete_lines(count(n)),
            Command::InsertChars(n) => screen.insert_chars(count(n)),
            Command::DeleteChars(n) => screen.delete_chars(count(n)),

            Command::ScrollUp(n) => screen.scroll_up(count(n)),
            Command::ScrollDown(n) => screen.scroll_down(count(n)),
            Command::SetScrollRegion { top, bottom } => {
                let bottom = if bottom == 0 {
                    screen.rows() - 1
                } else {
                    usize::from(bottom) - 1
                };
                screen.set_scroll_region(position(top), bottom);
            },

            Command::SetMode { modes, enable } => {
                for mode in modes {
                    self.set_mode(mode, enable);
                }
            },
            Command::SetPrivateModes { modes, enable } => {
                for mode in modes {
                    self.set_private_mode(mode, enable);
                }
            },

            Command::Sgr(params) => {
                // a 0 after the first position means "no argument"
                for (i, &code) in params.iter().enumerate() {
                    if i == 0 || code != 0 {
                        screen.apply_sgr(code);
                    }
                }
            },
            Command::RepeatLast(n) => screen.repeat_last(count(n)),

            Command::SaveCursor => screen.save_cursor(),
            Command::RestoreCursor => screen.restore_cursor(),
            Command::FullReset => {
                screen.reset();
                screen.mark_all_updated();
                screen.push_event(Event::CursorMoved);
            },

            Command::DesignateAcs => screen.modes.acs = true,
            Command::UndesignateAcs => screen.modes.acs = false,

            Command::Index => screen.index(),
            Command::NextLine => screen.next_line(),
            Command::ReverseIndex => screen.reverse_index(),

            Command::SoftReset
            | Command::WindowOps
            | Command::KeypadApplication
            | Command::KeypadNumeric
            | Command::StringTerminator => {},
        }
    }

    /// SM / RM
    fn set_mode(&mut self, mode: u16, enable: bool) {
        match mode {
            4 => self.screen.modes.insert = enable,
            _ => {
                if self.config.debug.sequences() {
                    debug!("unsupported mode {} ({})", mode, if enable { "set" } else { "reset" });
                }
            },
        }
    }

    /// DECSET / DECRST
    fn set_private_mode(&mut self, mode: u16, enable: bool) {
        let screen = &mut self.screen;
        let tracking = |requested| if enable { requested } else { MouseTracking::Off };
        match mode {
            1 => screen.modes.cursor_app = enable,
            12 => {
                screen.set_cursor_blinking(enable);
                screen.push_event(Event::CursorMoved);
            },
            25 => {
                screen.set_cursor_visible(enable);
                screen.push_event(Event::CursorMoved);
            },
            1000 => screen.modes.mouse_tracking = tracking(MouseTracking::Clicks),
            1002 => screen.modes.mouse_tracking = tracking(MouseTracking::Drag),
            1003 => screen.modes.mouse_tracking = tracking(MouseTracking::All),
            1006 => screen.modes.sgr_mouse = enable,
            47 | 1047 | 1049 => {
                let variant = match mode {
                    47 => AlternateScreen::Plain,
                    1047 => AlternateScreen::Clearing,
                    _ => AlternateScreen::SaveCursor,
                };
                if enable {
                    screen.enter_alternate_screen(variant);
                } else {
                    screen.exit_alternate_screen(variant);
                }
            },
            1048 => {
                if enable {
                    screen.save_cursor();
                } else {
                    screen.restore_cursor();
                }
            },
            2004 => screen.modes.bracketed_paste = enable,
            // local echo and DECLRMM
            3 | 69 => {},
            _ => {
                if self.config.debug.sequences() {
                    debug!("unsupported private mode {} ({})", mode, if enable { "set" } else { "reset" });
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Color, TextKind};

    fn terminal(rows: usize, cols: usize) -> Terminal {
        Terminal::new(rows, cols, Config::default())
    }

    fn text(term: &Terminal) -> String {
        term.snapshot().to_text()
    }

    #[test]
    fn test_terminal_print() {
        let mut term = terminal(24, 80);
        term.write(b"Hello, World!");
        assert_eq!(text(&term), "Hello, World!\n");
    }

    #[test]
    fn test_terminal_cursor_movement() {
        let mut term = terminal(24, 80);
        term.write(b"\x1b[10;5HX");
        assert_eq!(term.cursor().row, 9);
        assert_eq!(term.cursor().col, 5);
    }

    #[test]
    fn test_terminal_relative_moves_clamp() {
        let mut term = terminal(5, 10);
        term.write(b"\x1b[99C\x1b[99B");
        assert_eq!((term.cursor().row, term.cursor().col), (4, 9));
        term.write(b"\x1b[2A\x1b[3D");
        assert_eq!((term.cursor().row, term.cursor().col), (2, 6));
        term.write(b"\x1b[E");
        assert_eq!((term.cursor().row, term.cursor().col), (3, 0));
        term.write(b"\x1b[5;5H\x1b[2F");
        assert_eq!((term.cursor().row, term.cursor().col), (2, 0));
        term.write(b"\x1b[7G\x1b[2d");
        assert_eq!((term.cursor().row, term.cursor().col), (1, 6));
    }

    #[test]
    fn test_terminal_colors() {
        let mut term = terminal(24, 80);
        term.write(b"\x1b[31;44mC");
        let cell = term.raw_cell(0, 0).unwrap();
        assert_eq!(cell.attr.fg(), Color::Red);
        assert_eq!(cell.attr.bg(), Color::Blue);
    }

    #[test]
    fn test_terminal_sgr_reset() {
        let mut term = terminal(24, 80);
        term.write(b"\x1b[1;31mB\x1b[0mN");
        let bold = term.raw_cell(0, 0).unwrap();
        let normal = term.raw_cell(0, 1).unwrap();
        assert!(bold.attr.contains(Flags::BOLD));
        assert_eq!(normal.attr, term.config().default_attributes());
    }

    #[test]
    fn test_terminal_sgr_skips_later_zero() {
        let mut term = terminal(2, 10);
        term.write(b"\x1b[1;0;4mX");
        let attr = term.raw_cell(0, 0).unwrap().attr;
        assert!(attr.contains(Flags::BOLD));
        assert!(attr.contains(Flags::UNDERLINE));
    }

    #[test]
    fn test_terminal_erase() {
        let mut term = terminal(3, 10);
        term.write(b"XXXXXXXXXX");
        term.write(b"\x1b[1;5H\x1b[K");
        assert_eq!(text(&term), "XXXX\n");
    }

    #[test]
    fn test_terminal_scroll_region() {
        let mut term = terminal(5, 80);
        term.write(b"\x1b[2;4r");
        assert_eq!(term.scroll_region(), (1, 3));
        term.write(b"\x1b[r");
        assert_eq!(term.scroll_region(), (0, 4));
        term.write(b"\x1b[3;4r\x1b[;2r");
        assert_eq!(term.scroll_region(), (0, 1));
    }

    #[test]
    fn test_terminal_scroll_region_confines_linefeed() {
        let mut term = terminal(4, 5);
        term.write(b"top\x1b[2;3r\x1b[3;1Ha\nb\nc");
        assert_eq!(term.raw_cell(0, 0).unwrap().ch, b't');
        assert_eq!(term.raw_cell(1, 0).unwrap().ch, b' ');
        assert_eq!(term.raw_cell(1, 1).unwrap().ch, b'b');
        assert_eq!(term.raw_cell(2, 2).unwrap().ch, b'c');
        assert_eq!(term.raw_cell(3, 0).unwrap().ch, b' ');
    }

    #[test]
    fn test_terminal_alternate_screen() {
        let mut term = terminal(24, 80);
        term.write(b"Primary");
        term.write(b"\x1b[?1049h");
        term.write(b"Alternate");
        assert!(term.modes().alternate_screen);
        assert_eq!(text(&term), "       Alternate\n");

        term.write(b"\x1b[?1049l");
        assert!(!term.modes().alternate_screen);
        assert_eq!(text(&term), "Primary\n");
        assert_eq!(term.cursor().col, 7);
    }

    #[test]
    fn test_terminal_alternate_screen_47_keeps_content() {
        let mut term = terminal(2, 10);
        term.write(b"abc\x1b[?47h");
        assert_eq!(text(&term), "abc\n");
        term.write(b"\x1b[1;1HX\x1b[?47l");
        assert_eq!(text(&term), "abc\n");
    }

    #[test]
    fn test_terminal_bracketed_paste() {
        let mut term = terminal(24, 80);
        term.write(b"\x1b[?2004h");
        assert!(term.modes().bracketed_paste);
        term.write(b"\x1b[?2004l");
        assert!(!term.modes().bracketed_paste);
    }

    #[test]
    fn test_terminal_mouse_modes() {
        let mut term = terminal(24, 80);
        term.write(b"\x1b[?1002;1006h");
        assert_eq!(term.modes().mouse_tracking, MouseTracking::Drag);
        assert!(term.modes().sgr_mouse);
        term.write(b"\x1b[?1000l");
        assert_eq!(term.modes().mouse_tracking, MouseTracking::Off);
    }

    #[test]
    fn test_terminal_title() {
        let mut term = terminal(24, 80);
        term.write(b"\x1b]0;My Terminal Title\x07");
        assert_eq!(
            term.next_event(),
            Some(Event::TextReceived {
                kind: TextKind::WindowTitle,
                text: "My Terminal Title".to_string()
            })
        );
        assert_eq!(term.next_event(), None);
    }

    #[test]
    fn test_terminal_bell_event() {
        let mut term = terminal(2, 2);
        term.write(b"\x07");
        assert_eq!(term.drain_events(), vec![Event::Bell]);
    }

    #[test]
    fn test_terminal_insert_delete_lines() {
        let mut term = terminal(5, 10);
        term.write(b"Line 1\r\nLine 2\r\nLine 3\r\nLine 4\r\nLine 5");
        term.write(b"\x1b[2;1H\x1b[L");
        assert_eq!(text(&term), "Line 1\n\nLine 2\nLine 3\nLine 4\n");
        term.write(b"\x1b[2M");
        assert_eq!(text(&term), "Line 1\nLine 3\nLine 4\n");
    }

    #[test]
    fn test_terminal_insert_mode() {
        let mut term = terminal(1, 10);
        term.write(b"world\r\x1b[4hhello \x1b[4l");
        assert_eq!(text(&term), "hello worl\n");
        assert!(!term.modes().insert);
    }

    #[test]
    fn test_terminal_erase_chars_and_repeat() {
        let mut term = terminal(1, 10);
        term.write(b"abcdef\x1b[1;2H\x1b[2X");
        assert_eq!(text(&term), "a  def\n");
        assert_eq!(term.cursor().col, 1);
        term.write(b"\x1b[10;1Hz\x1b[3b");
        assert_eq!(text(&term), "zzzzef\n");
    }

    #[test]
    fn test_terminal_acs() {
        let mut term = terminal(1, 10);
        term.write(b"\x1b(0lqqk\x1b(Bq");
        assert_eq!(text(&term), "+--+q\n");
    }

    #[test]
    fn test_terminal_save_restore_cursor() {
        let mut term = terminal(5, 10);
        term.write(b"\x1b[2;3H\x1b7\x1b[5;5H\x1b8X");
        assert_eq!(term.raw_cell(1, 2).unwrap().ch, b'X');
    }

    #[test]
    fn test_terminal_reverse_index() {
        let mut term = terminal(3, 5);
        term.write(b"a\r\nb\x1b[1;1H\x1bM");
        assert_eq!(text(&term), "\na\nb\n");
    }

    #[test]
    fn test_terminal_full_reset() {
        let mut term = terminal(3, 5);
        term.write(b"\x1b[1mab\x1b[?25l\x1bc");
        assert_eq!(text(&term), "\n");
        assert!(term.cursor().visible);
        assert_eq!((term.cursor().row, term.cursor().col), (0, 0));
        assert_eq!(term.screen().attributes(), term.config().default_attributes());
    }

    #[test]
    fn test_cell_at_draws_cursor() {
        let mut term = terminal(2, 4);
        term.write(b"a");
        let config = term.config().clone();
        let cell = term.cell_at(0, 1);
        assert_eq!(cell.attr.bg(), config.cursor_color);
        assert_eq!(cell.attr.fg(), config.cursor_char_color);
        assert_eq!(term.raw_cell(0, 1).unwrap().attr.bg(), config.default_bg);

        term.write(b"\x1b[?12h");
        assert_eq!(term.cell_at(0, 1).attr.bg(), config.blinking_cursor_color);

        term.write(b"\x1b[?25l");
        assert_eq!(term.cell_at(0, 1).attr.bg(), config.default_bg);
    }

    #[test]
    fn test_cell_at_cursor_on_wrap_sentinel() {
        let mut term = terminal(2, 4);
        term.write(b"abcd");
        assert_eq!(term.cell_at(0, 3).attr.bg(), term.config().cursor_color);
    }

    #[test]
    fn test_cell_at_reverse_and_bold() {
        let config = Config {
            bold_is_bright: true,
            automatic_cursor: false,
            ..Config::default()
        };
        let mut term = Terminal::new(2, 4, config);
        term.write(b"\x1b[1;31mb\x1b[0;7mr");

        let bold = term.cell_at(0, 0);
        assert_eq!(bold.attr.fg(), Color::BrightRed);

        let reversed = term.cell_at(0, 1);
        assert_eq!(reversed.attr.fg(), Color::Black);
        assert_eq!(reversed.attr.bg(), Color::White);
    }

    #[test]
    fn test_cell_at_out_of_range() {
        let term = terminal(2, 4);
        let cell = term.cell_at(10, 10);
        assert!(cell.is_blank());
        assert_eq!(cell.attr, term.config().default_attributes());
        assert_eq!(term.raw_cell(2, 0), None);
    }

    #[test]
    fn test_translate_key_follows_cursor_mode() {
        let mut term = terminal(2, 4);
        assert_eq!(term.translate_key(Key::Up, false, false), b"\x1b[A");
        term.write(b"\x1b[?1h");
        assert_eq!(term.translate_key(Key::Up, false, false), b"\x1bOA");
    }

    #[test]
    fn test_translate_mouse_click() {
        let mut term = terminal(24, 80);
        assert!(term
            .translate_mouse_click(0, 0, MouseButton::Left, true, MouseModifiers::empty())
            .is_empty());
        term.write(b"\x1b[?1000h\x1b[?1006h");
        assert_eq!(
            term.translate_mouse_click(4, 9, MouseButton::Left, true, MouseModifiers::empty()),
            b"\x1b[<0;10;5M"
        );
    }

    #[test]
    fn test_set_config_changes_defaults() {
        let mut term = terminal(2, 4);
        term.set_config(Config {
            default_bg: Color::Blue,
            ..Config::default()
        });
        term.write(b"\x1b[0m\x1b[2J");
        assert_eq!(term.raw_cell(1, 1).unwrap().attr.bg(), Color::Blue);
    }

    #[test]
    fn test_resize_cancels_sequence() {
        let mut term = terminal(3, 3);
        term.write(b"\x1b[3");
        term.resize(4, 6);
        term.write(b"B");
        assert_eq!(term.raw_cell(0, 0).unwrap().ch, b'B');
        assert_eq!((term.rows(), term.columns()), (4, 6));
    }
}
