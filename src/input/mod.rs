//! Input Encoding Module
//!
//! Translates host keyboard and mouse input into the byte sequences a
//! terminal application expects to read.
//!
//! # Keyboard Encoding
//!
//! Symbolic keys are looked up in one of four static tables chosen by the
//! Shift/Ctrl combination. In application cursor mode (DECCKM) the arrow
//! keys use SS3 instead. Plain keys pass through, or become C0 codes with
//! Ctrl held.
//!
//! # Mouse Encoding
//!
//! Reports use SGR encoding (`ESC [ < b ; x ; y M|m`) when mode 1006 is
//! set and the legacy X10 encoding (`ESC [ M` + three offset bytes)
//! otherwise. The tracking mode decides which events are reported.

use crate::core::{Modes, MouseButton, MouseModifiers, MouseState, MouseTracking};

/// Keyboard modifiers that select a key table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub fn new(shift: bool, ctrl: bool) -> Self {
        Self { shift, ctrl }
    }
}

/// A key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A plain byte
    Char(u8),

    // Cursor keys
    Up,
    Down,
    Right,
    Left,

    // Navigation
    Home,
    End,
    Insert,
    Delete,
    PageUp,
    PageDown,

    // Function keys
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    // Editing
    Backspace,
    Tab,
}

type KeyTable = [(Key, &'static [u8])];

static KEYS: &KeyTable = &[
    (Key::Up, b"\x1b[A"),
    (Key::Down, b"\x1b[B"),
    (Key::Right, b"\x1b[C"),
    (Key::Left, b"\x1b[D"),
    (Key::Home, b"\x1b[H"),
    (Key::End, b"\x1b[F"),
    (Key::Insert, b"\x1b[2~"),
    (Key::Delete, b"\x1b[3~"),
    (Key::PageUp, b"\x1b[5~"),
    (Key::PageDown, b"\x1b[6~"),
    (Key::F1, b"\x1bOP"),
    (Key::F2, b"\x1bOQ"),
    (Key::F3, b"\x1bOR"),
    (Key::F4, b"\x1bOS"),
    (Key::F5, b"\x1b[15~"),
    (Key::F6, b"\x1b[17~"),
    (Key::F7, b"\x1b[18~"),
    (Key::F8, b"\x1b[19~"),
    (Key::F9, b"\x1b[20~"),
    (Key::F10, b"\x1b[21~"),
    (Key::F11, b"\x1b[23~"),
    (Key::F12, b"\x1b[24~"),
    (Key::Backspace, b"\x08"),
    (Key::Tab, b"\t"),
];

static SHIFT_KEYS: &KeyTable = &[
    (Key::Up, b"\x1b[1;2A"),
    (Key::Down, b"\x1b[1;2B"),
    (Key::Right, b"\x1b[1;2C"),
    (Key::Left, b"\x1b[1;2D"),
    (Key::Home, b"\x1b[1;2H"),
    (Key::End, b"\x1b[1;2F"),
    (Key::Insert, b"\x1b[2;2~"),
    (Key::Delete, b"\x1b[3;2~"),
    (Key::PageUp, b"\x1b[5~"),
    (Key::PageDown, b"\x1b[6~"),
    (Key::F1, b"\x1b[1;2P"),
    (Key::F2, b"\x1b[1;2Q"),
    (Key::F3, b"\x1b[1;2R"),
    (Key::F4, b"\x1b[1;2S"),
    (Key::F5, b"\x1b[15;2~"),
    (Key::F6, b"\x1b[17;2~"),
    (Key::F7, b"\x1b[18;2~"),
    (Key::F8, b"\x1b[19;2~"),
    (Key::F9, b"\x1b[20;2~"),
    (Key::F10, b"\x1b[21;2~"),
    (Key::F11, b"\x1b[23;2~"),
    (Key::F12, b"\x1b[24;2~"),
    (Key::Backspace, b"\x7f"),
    (Key::Tab, b"\x1b[Z"),
];

static CTRL_KEYS: &KeyTable = &[
    (Key::Up, b"\x1b[1;5A"),
    (Key::Down, b"\x1b[1;5B"),
    (Key::Right, b"\x1b[1;5C"),
    (Key::Left, b"\x1b[1;5D"),
    (Key::Home, b"\x1b[1;5H"),
    (Key::End, b"\x1b[1;5F"),
    (Key::Insert, b"\x1b[2;5~"),
    (Key::Delete, b"\x1b[3;5~"),
    (Key::PageUp, b"\x1b[5;5~"),
    (Key::PageDown, b"\x1b[6;5~"),
    (Key::F1, b"\x1b[1;5P"),
    (Key::F2, b"\x1b[1;5Q"),
    (Key::F3, b"\x1b[1;5R"),
    (Key::F4, b"\x1b[1;5S"),
    (Key::F5, b"\x1b[15;5~"),
    (Key::F6, b"\x1b[17;5~"),
    (Key::F7, b"\x1b[18;5~"),
    (Key::F8, b"\x1b[19;5~"),
    (Key::F9, b"\x1b[20;5~"),
    (Key::F10, b"\x1b[21;5~"),
    (Key::F11, b"\x1b[23;5~"),
    (Key::F12, b"\x1b[24;5~"),
    (Key::Backspace, b"\x08"),
    (Key::Tab, b"\t"),
];

static CTRL_SHIFT_KEYS: &KeyTable = &[
    (Key::Up, b"\x1b[1;6A"),
    (Key::Down, b"\x1b[1;6B"),
    (Key::Right, b"\x1b[1;6C"),
    (Key::Left, b"\x1b[1;6D"),
    (Key::Home, b"\x1b[1;6H"),
    (Key::End, b"\x1b[1;6F"),
    (Key::Insert, b"\x1b[2;6~"),
    (Key::Delete, b"\x1b[3;6~"),
    (Key::PageUp, b"\x1b[5;6~"),
    (Key::PageDown, b"\x1b[6;6~"),
    (Key::F1, b"\x1b[1;6P"),
    (Key::F2, b"\x1b[1;6Q"),
    (Key::F3, b"\x1b[1;6R"),
    (Key::F4, b"\x1b[1;6S"),
    (Key::F5, b"\x1b[15;6~"),
    (Key::F6, b"\x1b[17;6~"),
    (Key::F7, b"\x1b[18;6~"),
    (Key::F8, b"\x1b[19;6~"),
    (Key::F9, b"\x1b[20;6~"),
    (Key::F10, b"\x1b[21;6~"),
    (Key::F11, b"\x1b[23;6~"),
    (Key::F12, b"\x1b[24;6~"),
    (Key::Backspace, b"\x08"),
    (Key::Tab, b"\t"),
];

fn key_table(modifiers: Modifiers) -> &'static KeyTable {
    match (modifiers.shift, modifiers.ctrl) {
        (false, false) => KEYS,
        (true, false) => SHIFT_KEYS,
        (false, true) => CTRL_KEYS,
        (true, true) => CTRL_SHIFT_KEYS,
    }
}

/// Encode a key press into the bytes to send to the application
pub fn encode_key(key: Key, modifiers: Modifiers, application_cursor: bool) -> Vec<u8> {
    if key == Key::Char(b'\r') {
        return vec![b'\n'];
    }

    if application_cursor {
        let ss3 = match key {
            Key::Up => Some(b'A'),
            Key::Down => Some(b'B'),
            Key::Right => Some(b'C'),
            Key::Left => Some(b'D'),
            _ => None,
        };
        if let Some(code) = ss3 {
            return vec![0x1b, b'O', code];
        }
    }

    if let Some((_, bytes)) = key_table(modifiers).iter().find(|(k, _)| *k == key) {
        return bytes.to_vec();
    }

    match key {
        Key::Char(0) => vec![],
        Key::Char(c) if modifiers.ctrl => match c {
            b'A'..=b'_' => vec![c - b'A' + 1],
            b'a'..=b'z' => vec![c - b'a' + 1],
            _ => vec![],
        },
        Key::Char(c) => vec![c],
        _ => vec![],
    }
}

/// Encode a button press or release and record it as the last mouse
/// state. Nothing happens while tracking is off.
pub fn encode_mouse_click(
    modes: &Modes,
    mouse: &mut MouseState,
    row: usize,
    col: usize,
    button: MouseButton,
    down: bool,
    modifiers: MouseModifiers,
) -> Vec<u8> {
    if modes.mouse_tracking == MouseTracking::Off {
        return vec![];
    }

    let report = if modes.sgr_mouse {
        encode_sgr(button, modifiers, false, row, col, down)
    } else {
        let button = if down { button } else { MouseButton::Release };
        encode_x10(button, modifiers, false, row, col)
    };

    mouse.button = if down { button } else { MouseButton::Release };
    mouse.modifiers = modifiers;
    mouse.row = row;
    mouse.col = col;
    report
}

/// Encode pointer motion, reporting the held button
pub fn encode_mouse_move(modes: &Modes, mouse: &mut MouseState, row: usize, col: usize) -> Vec<u8> {
    let tracking = modes.mouse_tracking;
    if tracking == MouseTracking::Off {
        return vec![];
    }

    let same_position = mouse.row == row && mouse.col == col;
    mouse.row = row;
    mouse.col = col;

    let all = tracking == MouseTracking::All;
    let dragging = tracking == MouseTracking::Drag && mouse.button_held();
    if !(all || dragging) || (same_position && !all) {
        return vec![];
    }

    if modes.sgr_mouse {
        encode_sgr(mouse.button, mouse.modifiers, true, row, col, true)
    } else {
        encode_x10(mouse.button, mouse.modifiers, true, row, col)
    }
}

fn button_code(button: MouseButton, modifiers: MouseModifiers, motion: bool) -> u8 {
    button.code() + modifiers.bits() + if motion { 32 } else { 0 }
}

/// `ESC [ < code ; col ; row M|m`, 1-based
fn encode_sgr(
    button: MouseButton,
    modifiers: MouseModifiers,
    motion: bool,
    row: usize,
    col: usize,
    down: bool,
) -> Vec<u8> {
    format!(
        "\x1b[<{};{};{}{}",
        button_code(button, modifiers, motion),
        col + 1,
        row + 1,
        if down { 'M' } else { 'm' }
    )
    .into_bytes()
}

/// `ESC [ M` followed by code, column and row, each offset by 32 and
/// 1-based. Positions that do not fit a byte are not reported.
fn encode_x10(button: MouseButton, modifiers: MouseModifiers, motion: bool, row: usize, col: usize) -> Vec<u8> {
    if row >= 223 || col >= 223 {
        return vec![];
    }
    let code = button_code(button, modifiers, motion);
    vec![0x1b, b'[', b'M', code + 32, col as u8 + 33, row as u8 + 33]
}
