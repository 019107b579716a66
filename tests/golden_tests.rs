//! Golden tests for the terminal engine
//!
//! Each test feeds a byte sequence to a fresh terminal and checks the
//! resulting cells, cursor and events.

use virtterm::core::{Color, Event, Flags, MouseButton, MouseModifiers, TextKind};
use virtterm::input::Key;
use virtterm::{Config, Terminal};

/// A 10x20 terminal with `input` written to it
fn run(input: &[u8]) -> Terminal {
    let mut term = Terminal::new(10, 20, Config::default());
    term.write(input);
    term
}

/// Feed `input` in chunks of `chunk_size` to check streaming
fn run_chunked(input: &[u8], chunk_size: usize) -> Terminal {
    let mut term = Terminal::new(10, 20, Config::default());
    for chunk in input.chunks(chunk_size) {
        term.write(chunk);
    }
    term
}

fn row_text(term: &Terminal, row: usize) -> String {
    (0..term.columns())
        .map(|col| char::from(term.raw_cell(row, col).unwrap().ch))
        .collect::<String>()
        .trim_end()
        .to_string()
}

fn cells_updated(events: &[Event]) -> Vec<&Event> {
    events
        .iter()
        .filter(|e| matches!(e, Event::CellsUpdated { .. }))
        .collect()
}

#[test]
fn test_single_character() {
    let mut term = run(b"A");

    assert_eq!(term.cell_at(0, 0).ch, b'A');
    let cursor = term.cursor();
    assert_eq!((cursor.row, cursor.col), (0, 1));

    let events = term.drain_events();
    let updates = cells_updated(&events);
    assert_eq!(updates.len(), 1);
    match updates[0] {
        Event::CellsUpdated { row_start, row_end, .. } => {
            assert_eq!((*row_start, *row_end), (0, 0));
        },
        _ => unreachable!(),
    }
}

#[test]
fn test_full_row_then_wrap() {
    let mut term = run(b"01234567890123456789");
    assert_eq!(row_text(&term, 0), "01234567890123456789");
    let cursor = term.cursor();
    assert_eq!((cursor.row, cursor.col), (0, 19));

    term.write(b"x");
    assert_eq!(term.raw_cell(1, 0).unwrap().ch, b'x');
    let cursor = term.cursor();
    assert_eq!((cursor.row, cursor.col), (1, 1));
}

#[test]
fn test_carriage_return_and_line_feed() {
    let term = run(b"abc\r");
    assert_eq!((term.cursor().row, term.cursor().col), (0, 0));

    let term = run(b"abc\n");
    assert_eq!((term.cursor().row, term.cursor().col), (1, 3));
}

#[test]
fn test_scroll_after_full_screen() {
    let mut input = Vec::new();
    for row in 0..10u8 {
        input.extend(std::iter::repeat(b'a' + row).take(20));
    }
    let mut term = run(&input);
    assert_eq!(row_text(&term, 0), "a".repeat(20));

    term.write(b"x");
    assert_eq!(row_text(&term, 0), "b".repeat(20));
    assert_eq!(row_text(&term, 8), "j".repeat(20));
    assert_eq!(row_text(&term, 9), "x");
    assert_eq!((term.cursor().row, term.cursor().col), (9, 1));
}

#[test]
fn test_cursor_forward_leaves_blanks() {
    let term = run(b"a\x1b[2Cb");
    assert_eq!(row_text(&term, 0), "a  b");
}

#[test]
fn test_overlong_sequence_bells_and_replays() {
    let mut term = run(b"\x1b0123456789012345678901234567890123");

    assert_eq!(term.cell_at(0, 0).ch, b'0');
    assert_eq!(row_text(&term, 0), "01234567890123456789");
    assert_eq!(row_text(&term, 1), "01234567890123");
    assert!(term.drain_events().contains(&Event::Bell));
}

#[test]
fn test_bold_then_normal_intensity_restores_attribute() {
    let mut term = run(b"");
    let before = term.screen().attributes();

    term.write(b"\x1b[1m");
    assert!(term.screen().attributes().contains(Flags::BOLD));

    term.write(b"\x1b[22m");
    assert_eq!(term.screen().attributes(), before);
}

#[test]
fn test_translate_key_return_and_ctrl() {
    let term = run(b"");
    for (shift, ctrl) in [(false, false), (true, false), (false, true), (true, true)] {
        assert_eq!(term.translate_key(Key::Char(b'\r'), shift, ctrl), b"\n");
    }
    assert_eq!(term.translate_key(Key::Char(b'a'), false, true), vec![1]);
    assert_eq!(term.translate_key(Key::Char(b'A'), false, true), vec![1]);
}

#[test]
fn test_alternate_screen_round_trip() {
    let mut term = run(b"hello\r\n\x1b[31mworld\x1b[3;4H");
    let before = term.snapshot();
    let cursor = term.cursor();

    term.write(b"\x1b[?1049h");
    term.write(b"\x1b[2Jfull screen app\x1b[8;2H");
    assert!(!term.snapshot().content_equals(&before));

    term.write(b"\x1b[?1049l");
    assert!(term.snapshot().content_equals(&before));
    assert_eq!(term.cursor(), cursor);
}

#[test]
fn test_chunked_input_matches_whole() {
    let input = b"\x1b[1;31mred\x1b[0m\r\n\x1b]2;title\x07\x1b[5;5Hx\x1b[?25l\x1b[2K";
    let whole = run(input);
    for chunk_size in [1, 2, 3, 7] {
        let chunked = run_chunked(input, chunk_size);
        assert!(chunked.snapshot().content_equals(&whole.snapshot()));
        assert_eq!(chunked.cursor(), whole.cursor());
    }
}

#[test]
fn test_colored_text() {
    let term = run(b"\x1b[31mR\x1b[42mG\x1b[0mN");
    let red = term.raw_cell(0, 0).unwrap();
    assert_eq!(red.attr.fg(), Color::Red);
    let green_bg = term.raw_cell(0, 1).unwrap();
    assert_eq!(green_bg.attr.fg(), Color::Red);
    assert_eq!(green_bg.attr.bg(), Color::Green);
    let plain = term.raw_cell(0, 2).unwrap();
    assert_eq!(plain.attr, Config::default().default_attributes());
}

#[test]
fn test_window_title_event() {
    let mut term = run(b"\x1b]2;build: ok\x1b\\");
    assert!(term.drain_events().contains(&Event::TextReceived {
        kind: TextKind::WindowTitle,
        text: "build: ok".to_string(),
    }));
}

#[test]
fn test_scroll_region_and_insert_lines() {
    let term = run(b"1\r\n2\r\n3\r\n4\r\n5\x1b[2;4r\x1b[2;1H\x1b[L");
    assert_eq!(row_text(&term, 0), "1");
    assert_eq!(row_text(&term, 1), "");
    assert_eq!(row_text(&term, 2), "2");
    assert_eq!(row_text(&term, 3), "3");
    assert_eq!(row_text(&term, 4), "5");
}

#[test]
fn test_erase_line_and_display() {
    let term = run(b"abcdef\x1b[1;3H\x1b[K");
    assert_eq!(row_text(&term, 0), "ab");

    let term = run(b"row0\r\nrow1\r\nrow2\x1b[2;2H\x1b[J");
    assert_eq!(row_text(&term, 0), "row0");
    assert_eq!(row_text(&term, 1), "r");
    assert_eq!(row_text(&term, 2), "");
}

#[test]
fn test_acs_line_drawing() {
    let term = run(b"\x1b(0lqqk\x1b(Bq");
    assert_eq!(row_text(&term, 0), "+--+q");
}

#[test]
fn test_sgr_mouse_report() {
    let mut term = run(b"\x1b[?1000h\x1b[?1006h");
    let down = term.translate_mouse_click(2, 4, MouseButton::Left, true, MouseModifiers::empty());
    assert_eq!(down, b"\x1b[<0;5;3M");
    let up = term.translate_mouse_click(2, 4, MouseButton::Left, false, MouseModifiers::empty());
    assert_eq!(up, b"\x1b[<0;5;3m");
}

#[test]
fn test_resize_drops_content() {
    let mut term = run(b"keep?");
    term.resize(5, 8);
    assert_eq!(term.rows(), 5);
    assert_eq!(term.columns(), 8);
    assert_eq!(term.snapshot().to_text(), "\n");
    assert_eq!((term.cursor().row, term.cursor().col), (0, 0));
}

#[test]
fn test_snapshot_json_round_trip() {
    let term = run(b"\x1b[7mhi\x1b[0m there");
    let snapshot = term.snapshot();
    let json = snapshot.to_json().unwrap();
    let restored = virtterm::core::Snapshot::from_json(&json).unwrap();
    assert_eq!(restored, snapshot);
}

#[test]
fn test_status_line_below_scroll_region() {
    for status_row in [4usize, 5] {
        let mut term = Terminal::new(5, 10, Config::default());
        term.write(b"r0\r\nr1\r\nr2\x1b[1;3r");
        term.write(format!("\x1b[{};1HS", status_row).as_bytes());

        assert_eq!(row_text(&term, 0), "r0");
        assert_eq!(row_text(&term, 1), "r1");
        assert_eq!(row_text(&term, 2), "r2");
        assert_eq!(term.raw_cell(status_row - 1, 0).unwrap().ch, b'S');
        let cursor = term.cursor();
        assert_eq!((cursor.row, cursor.col), (status_row - 1, 1));
    }
}

#[test]
fn test_wrap_off_region_bottom_scrolls_region_only() {
    let mut term = Terminal::new(5, 4, Config::default());
    term.write(b"\x1b[5;1Hstat\x1b[1;2raaaabbbbc");
    assert_eq!(row_text(&term, 0), "bbbb");
    assert_eq!(row_text(&term, 1), "c");
    assert_eq!(row_text(&term, 4), "stat");
}
