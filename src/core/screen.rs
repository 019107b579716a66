//! Screen model implementation
//!
//! The screen owns the visible grid, the copy of the primary grid kept
//! while the alternate screen is active, the cursor and its saved slot,
//! the scroll region, the current attribute and the mode flags. Every
//! mutation records an [`Event`] for the consumer.

use tracing::warn;

use super::attributes::Attributes;
use super::cell::Cell;
use super::cursor::Cursor;
use super::event::{Event, EventQueue};
use super::grid::Grid;
use super::modes::{Modes, MouseState};
use crate::app::DebugLevel;

/// Flavor of alternate screen toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlternateScreen {
    /// Mode 47: switch buffers only
    Plain,
    /// Mode 1047: switch buffers, clearing the alternate one on entry
    Clearing,
    /// Mode 1049: like 1047, also saving and restoring the cursor
    SaveCursor,
}

/// The main screen structure
#[derive(Debug, Clone)]
pub struct Screen {
    rows: usize,
    cols: usize,
    /// Visible grid
    grid: Grid,
    /// Primary content saved while the alternate screen is active
    saved_grid: Grid,
    cursor: Cursor,
    /// DECSC/DECRC slot, shared with the 1049 toggle
    saved_cursor: Cursor,
    /// Scroll region top (inclusive)
    scroll_top: usize,
    /// Scroll region bottom (inclusive)
    scroll_bottom: usize,
    /// Attribute applied to newly written cells
    attr: Attributes,
    /// Attribute restored by SGR 0 and reset
    defaults: Attributes,
    pub modes: Modes,
    pub mouse: MouseState,
    /// Last printed glyph, for REP
    last_char: u8,
    events: EventQueue,
    debug: DebugLevel,
}

impl Screen {
    /// Create a new screen. Dimensions are at least 1x1.
    pub fn new(rows: usize, cols: usize, defaults: Attributes, debug: DebugLevel) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        let blank = Cell::blank(defaults);
        Self {
            rows,
            cols,
            grid: Grid::new(rows, cols, blank),
            saved_grid: Grid::new(rows, cols, blank),
            cursor: Cursor::default(),
            saved_cursor: Cursor::default(),
            scroll_top: 0,
            scroll_bottom: rows - 1,
            attr: defaults,
            defaults,
            modes: Modes::default(),
            mouse: MouseState::default(),
            last_char: b' ',
            events: EventQueue::new(),
            debug,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Stored cell at an exact position
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        self.grid.get(row, col)
    }

    /// The cursor as stored, possibly on the wrap sentinel
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn scroll_region(&self) -> (usize, usize) {
        (self.scroll_top, self.scroll_bottom)
    }

    pub fn attributes(&self) -> Attributes {
        self.attr
    }

    pub fn defaults(&self) -> Attributes {
        self.defaults
    }

    /// Change the default attribute. Existing cells are untouched.
    pub fn set_defaults(&mut self, defaults: Attributes) {
        self.defaults = defaults;
    }

    pub fn set_debug(&mut self, debug: DebugLevel) {
        self.debug = debug;
    }

    pub fn push_event(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn next_event(&mut self) -> Option<Event> {
        self.events.pop()
    }

    pub fn events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    fn blank(&self) -> Cell {
        Cell::blank(self.attr)
    }

    fn last_col(&self) -> usize {
        self.cols - 1
    }

    /// Report the whole screen as changed
    pub fn mark_all_updated(&mut self) {
        self.events
            .push(Event::cells(0, self.rows - 1, 0, self.cols - 1));
    }

    // Region operations

    /// Overwrite one cell with the current attribute (coordinates clamped)
    pub fn set_char(&mut self, row: usize, col: usize, ch: u8) {
        self.grid.set(row, col, Cell::new(ch, self.attr));
    }

    /// Blank a row-major span with the current attribute
    pub fn fill(&mut self, row0: usize, row1: usize, col0: usize, col1: usize) {
        let blank = self.blank();
        self.grid.fill(row0, row1, col0, col1, blank);
    }

    /// Move a rectangle; a rejected move is diagnosed and skipped
    pub fn move_region(
        &mut self,
        row0: usize,
        row1: usize,
        col0: usize,
        col1: usize,
        d_row: isize,
        d_col: isize,
    ) {
        if let Err(err) = self.grid.move_region(row0, row1, col0, col1, d_row, d_col) {
            if self.debug.errors() {
                warn!("region move abandoned: {}", err);
            }
        }
    }

    // Printing

    /// Write a printable byte at the cursor and advance
    pub fn print(&mut self, ch: u8) {
        self.wrap_or_scroll();
        if self.modes.insert {
            self.scroll_horizontal(self.cursor.row, self.cursor.col, 1);
        }
        let (row, col) = (self.cursor.row, self.cursor.col);
        self.set_char(row, col, ch);
        self.events.push(Event::cells(row, row, col, col));
        self.advance(0, 1);
        self.last_char = ch;
    }

    /// Print the last printed glyph `n` times (REP)
    pub fn repeat_last(&mut self, n: usize) {
        let ch = self.last_char;
        for _ in 0..n.min(self.rows * self.cols) {
            self.print(ch);
        }
    }

    /// Apply pending wrap before a glyph is written. Only a wrap off the
    /// region's bottom row scrolls; a cursor already below the region
    /// stays on its row.
    fn wrap_or_scroll(&mut self) {
        if !self.cursor.at_wrap_sentinel(self.cols) {
            return;
        }
        self.cursor.col = 0;
        if self.cursor.row == self.scroll_bottom {
            self.scroll_vertical(self.scroll_top, self.scroll_bottom, 1);
            self.events.push(Event::CursorMoved);
        } else if self.cursor.row + 1 < self.rows {
            self.advance(1, 0);
        }
    }

    // Cursor movement

    /// Relative move, allowing the wrap sentinel
    pub fn advance(&mut self, d_row: isize, d_col: isize) {
        self.cursor.offset(d_row, d_col, self.rows, self.cols);
        self.events.push(Event::CursorMoved);
    }

    /// Absolute move, clamped into the grid
    pub fn move_to(&mut self, row: usize, col: usize) {
        self.cursor.row = row.min(self.rows - 1);
        self.cursor.col = col.min(self.last_col());
        self.events.push(Event::CursorMoved);
    }

    pub fn move_up(&mut self, n: usize) {
        let row = self.cursor.row.min(self.rows - 1).saturating_sub(n);
        self.move_to(row, self.cursor.col);
    }

    pub fn move_down(&mut self, n: usize) {
        let row = self.cursor.row.saturating_add(n);
        self.move_to(row, self.cursor.col);
    }

    pub fn move_forward(&mut self, n: usize) {
        let col = self.cursor.col.saturating_add(n);
        self.move_to(self.cursor.row, col);
    }

    pub fn move_backward(&mut self, n: usize) {
        let col = self.cursor.col.min(self.last_col()).saturating_sub(n);
        self.move_to(self.cursor.row, col);
    }

    pub fn move_to_col(&mut self, col: usize) {
        self.move_to(self.cursor.row, col);
    }

    pub fn move_to_row(&mut self, row: usize) {
        self.move_to(row, self.cursor.col);
    }

    pub fn to_line_start(&mut self) {
        self.cursor.col = 0;
        self.events.push(Event::CursorMoved);
    }

    pub fn backspace(&mut self) {
        self.advance(0, -1);
    }

    /// Advance to the next multiple of 8, stopping at the last column
    pub fn tab(&mut self) {
        let next = (self.cursor.col / 8 + 1) * 8;
        self.cursor.col = next.min(self.last_col());
        self.events.push(Event::CursorMoved);
    }

    /// LF: move down one row, scrolling the region at its bottom
    pub fn line_feed(&mut self) {
        if self.cursor.row == self.scroll_bottom {
            self.scroll_vertical(self.scroll_top, self.scroll_bottom, 1);
        } else if self.cursor.row + 1 < self.rows {
            self.advance(1, 0);
        }
    }

    /// IND
    pub fn index(&mut self) {
        self.line_feed();
    }

    /// NEL
    pub fn next_line(&mut self) {
        self.line_feed();
        self.to_line_start();
    }

    /// RI: move up one row, scrolling the region down at its top
    pub fn reverse_index(&mut self) {
        if self.cursor.row == self.scroll_top {
            self.scroll_vertical(self.scroll_top, self.scroll_bottom, -1);
        } else if self.cursor.row > 0 {
            self.advance(-1, 0);
        }
    }

    // Scrolling

    /// Scroll rows `top..=bottom` by `n`: positive moves content up and
    /// blanks the bottom, negative moves content down and blanks the top
    pub fn scroll_vertical(&mut self, top: usize, bottom: usize, n: isize) {
        if n == 0 {
            return;
        }
        let top = top.min(self.rows - 1);
        let bottom = bottom.min(self.rows - 1);
        if top > bottom {
            return;
        }

        let height = (bottom - top + 1) as isize;
        let n = n.clamp(-height, height);
        let shift = n.unsigned_abs();
        let last_col = self.last_col();

        if n > 0 {
            if n < height {
                self.move_region(top + shift, bottom, 0, last_col, -n, 0);
            }
            self.fill(bottom + 1 - shift, bottom, 0, last_col);
        } else {
            if -n < height {
                self.move_region(top, bottom - shift, 0, last_col, -n, 0);
            }
            self.fill(top, top + shift - 1, 0, last_col);
        }

        self.events.push(Event::cells(top, bottom, 0, last_col));
    }

    /// Shift cells `col..` of one row by `n`: positive inserts blanks at
    /// `col`, negative deletes cells at `col`
    pub fn scroll_horizontal(&mut self, row: usize, col: usize, n: isize) {
        if n == 0 || col >= self.cols {
            return;
        }
        let row = row.min(self.rows - 1);
        let width = (self.cols - col) as isize;
        let n = n.clamp(-width, width);
        let shift = n.unsigned_abs();
        let last_col = self.last_col();

        if n > 0 {
            if n < width {
                self.move_region(row, row, col, last_col - shift, 0, n);
            }
            self.fill(row, row, col, col + shift - 1);
        } else {
            if -n < width {
                self.move_region(row, row, col + shift, last_col, 0, n);
            }
            self.fill(row, row, self.cols - shift, last_col);
        }

        self.events.push(Event::cells(row, row, col, last_col));
    }

    /// SU
    pub fn scroll_up(&mut self, n: usize) {
        let n = n.min(self.rows) as isize;
        self.scroll_vertical(self.scroll_top, self.scroll_bottom, n);
    }

    /// SD
    pub fn scroll_down(&mut self, n: usize) {
        let n = n.min(self.rows) as isize;
        self.scroll_vertical(self.scroll_top, self.scroll_bottom, -n);
    }

    /// DECSTBM with 0-based rows. An empty or inverted region selects the
    /// whole screen. The cursor homes.
    pub fn set_scroll_region(&mut self, top: usize, bottom: usize) {
        let bottom = bottom.min(self.rows - 1);
        if top < bottom {
            self.scroll_top = top;
            self.scroll_bottom = bottom;
        } else {
            self.reset_scroll_region();
        }
        self.move_to(0, 0);
    }

    pub fn reset_scroll_region(&mut self) {
        self.scroll_top = 0;
        self.scroll_bottom = self.rows - 1;
    }

    fn cursor_in_region(&self) -> bool {
        (self.scroll_top..=self.scroll_bottom).contains(&self.cursor.row)
    }

    // Erase / insert / delete

    /// ED: 0 cursor to end, 1 start to cursor, 2 whole screen
    pub fn erase_in_display(&mut self, mode: u16) {
        let row = self.cursor.row.min(self.rows - 1);
        let col = self.cursor.col.min(self.last_col());
        let (last_row, last_col) = (self.rows - 1, self.last_col());
        match mode {
            0 => {
                self.fill(row, last_row, col, last_col);
                self.events.push(Event::cells(row, last_row, 0, last_col));
            },
            1 => {
                self.fill(0, row, 0, col);
                self.events.push(Event::cells(0, row, 0, last_col));
            },
            2 => {
                self.fill(0, last_row, 0, last_col);
                self.mark_all_updated();
            },
            // scrollback: there is none
            3 => {},
            _ => {
                if self.debug.errors() {
                    warn!("unsupported erase-in-display mode {}", mode);
                }
            },
        }
    }

    /// EL: 0 cursor to end of line, 1 start of line to cursor, 2 whole line
    pub fn erase_in_line(&mut self, mode: u16) {
        let row = self.cursor.row.min(self.rows - 1);
        let col = self.cursor.col.min(self.last_col());
        let last_col = self.last_col();
        let (start, end) = match mode {
            0 => (col, last_col),
            1 => (0, col),
            2 => (0, last_col),
            _ => {
                if self.debug.errors() {
                    warn!("unsupported erase-in-line mode {}", mode);
                }
                return;
            },
        };
        self.fill(row, row, start, end);
        self.events.push(Event::cells(row, row, start, end));
    }

    /// ECH: blank `n` cells from the cursor without moving it
    pub fn erase_chars(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        let row = self.cursor.row.min(self.rows - 1);
        let col = self.cursor.col.min(self.last_col());
        let end = col.saturating_add(n - 1).min(self.last_col());
        self.fill(row, row, col, end);
        self.events.push(Event::cells(row, row, col, end));
    }

    /// IL, only inside the scroll region
    pub fn insert_lines(&mut self, n: usize) {
        if self.cursor_in_region() {
            let n = n.min(self.rows) as isize;
            self.scroll_vertical(self.cursor.row, self.scroll_bottom, -n);
        }
    }

    /// DL, only inside the scroll region
    pub fn delete_lines(&mut self, n: usize) {
        if self.cursor_in_region() {
            let n = n.min(self.rows) as isize;
            self.scroll_vertical(self.cursor.row, self.scroll_bottom, n);
        }
    }

    /// ICH
    pub fn insert_chars(&mut self, n: usize) {
        let n = n.min(self.cols) as isize;
        self.scroll_horizontal(self.cursor.row, self.cursor.col, n);
    }

    /// DCH
    pub fn delete_chars(&mut self, n: usize) {
        let n = n.min(self.cols) as isize;
        self.scroll_horizontal(self.cursor.row, self.cursor.col, -n);
    }

    // Attributes

    /// Apply one SGR code to the current attribute
    pub fn apply_sgr(&mut self, code: u16) {
        self.attr.apply_sgr(code, self.defaults);
    }

    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor.visible = visible;
    }

    pub fn set_cursor_blinking(&mut self, blinking: bool) {
        self.cursor.blinking = blinking;
    }

    // Save / restore

    /// DECSC
    pub fn save_cursor(&mut self) {
        self.saved_cursor = self.cursor;
    }

    /// DECRC
    pub fn restore_cursor(&mut self) {
        let saved = self.saved_cursor;
        self.cursor = Cursor {
            row: saved.row.min(self.rows - 1),
            col: saved.col.min(self.cols),
            ..saved
        };
        self.events.push(Event::CursorMoved);
    }

    pub fn enter_alternate_screen(&mut self, variant: AlternateScreen) {
        if self.modes.alternate_screen {
            return;
        }
        if variant == AlternateScreen::SaveCursor {
            self.save_cursor();
        }
        self.saved_grid.copy_from(&self.grid);
        self.modes.alternate_screen = true;
        if variant != AlternateScreen::Plain {
            let blank = self.blank();
            self.grid.clear(blank);
        }
        self.mark_all_updated();
    }

    pub fn exit_alternate_screen(&mut self, variant: AlternateScreen) {
        if !self.modes.alternate_screen {
            return;
        }
        self.grid.copy_from(&self.saved_grid);
        self.modes.alternate_screen = false;
        if variant == AlternateScreen::SaveCursor {
            self.restore_cursor();
        }
        self.mark_all_updated();
    }

    // Lifecycle

    /// RIS: everything back to power-on state except queued events
    pub fn reset(&mut self) {
        let blank = Cell::blank(self.defaults);
        self.grid.clear(blank);
        self.saved_grid.clear(blank);
        self.cursor = Cursor::default();
        self.saved_cursor = Cursor::default();
        self.attr = self.defaults;
        self.reset_scroll_region();
        self.modes = Modes::default();
        self.mouse = MouseState::default();
        self.last_char = b' ';
    }

    /// Resize, dropping all content. The cursor returns to the origin.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.rows = rows.max(1);
        self.cols = cols.max(1);
        let blank = Cell::blank(self.defaults);
        self.grid = Grid::new(self.rows, self.cols, blank);
        self.saved_grid = Grid::new(self.rows, self.cols, blank);
        self.cursor.row = 0;
        self.cursor.col = 0;
        self.saved_cursor = self.saved_cursor.clamped(self.rows, self.cols);
        self.reset_scroll_region();
        self.modes.alternate_screen = false;
        self.mark_all_updated();
        self.events.push(Event::CursorMoved);
    }
}
