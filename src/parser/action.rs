//! Terminal Actions
//!
//! Semantic operations produced by the parser that should be applied to
//! the screen. Numeric parameters are carried raw: 0 stands for a missing
//! parameter and the consumer decides what the default is.

use serde::{Deserialize, Serialize};

use crate::core::TextKind;

/// A terminal action produced by the parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Print a byte to the screen
    Print(u8),

    /// Execute a C0 control character
    Control(ControlCode),

    /// Execute a recognized escape sequence
    Command(Command),

    /// An OSC capture finished
    TextCaptured { kind: TextKind, text: String },
}

/// C0 control codes with an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlCode {
    /// BEL
    Bell,
    /// BS
    Backspace,
    /// HT
    Tab,
    /// LF, VT and FF
    LineFeed,
    /// CR
    CarriageReturn,
}

impl ControlCode {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x07 => Some(ControlCode::Bell),
            0x08 => Some(ControlCode::Backspace),
            0x09 => Some(ControlCode::Tab),
            0x0A..=0x0C => Some(ControlCode::LineFeed),
            0x0D => Some(ControlCode::CarriageReturn),
            _ => None,
        }
    }
}

/// Recognized escape sequences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    // Cursor movement
    /// CUU
    CursorUp(u16),
    /// CUD, VPR
    CursorDown(u16),
    /// CUF, HPR
    CursorForward(u16),
    /// CUB
    CursorBack(u16),
    /// CNL
    CursorNextLine(u16),
    /// CPL
    CursorPrevLine(u16),
    /// CHA (1-based)
    CursorColumn(u16),
    /// VPA (1-based)
    CursorRow(u16),
    /// CUP, HVP (1-based)
    CursorPosition { row: u16, col: u16 },

    // Erasing
    /// ED
    EraseInDisplay(u16),
    /// EL
    EraseInLine(u16),
    /// ECH
    EraseChars(u16),

    // Insert / delete
    /// IL
    InsertLines(u16),
    /// DL
    DeleteLines(u16),
    /// ICH
    InsertChars(u16),
    /// DCH
    DeleteChars(u16),

    // Scrolling
    /// SU
    ScrollUp(u16),
    /// SD
    ScrollDown(u16),
    /// DECSTBM (1-based, 0 = missing)
    SetScrollRegion { top: u16, bottom: u16 },

    // Modes
    /// SM / RM
    SetMode { modes: Vec<u16>, enable: bool },
    /// DECSET / DECRST
    SetPrivateModes { modes: Vec<u16>, enable: bool },

    /// SGR, every argument in order
    Sgr(Vec<u16>),
    /// REP
    RepeatLast(u16),

    /// DECSC
    SaveCursor,
    /// DECRC
    RestoreCursor,
    /// RIS
    FullReset,
    /// DECSTR, accepted without effect
    SoftReset,

    /// Designate DEC special graphics into G0
    DesignateAcs,
    /// Designate US ASCII into G0
    UndesignateAcs,

    /// IND
    Index,
    /// NEL
    NextLine,
    /// RI
    ReverseIndex,

    /// Window manipulation, accepted without effect
    WindowOps,
    /// DECKPAM, accepted without effect
    KeypadApplication,
    /// DECKPNM, accepted without effect
    KeypadNumeric,
    /// Stray ST outside a capture
    StringTerminator,
}
