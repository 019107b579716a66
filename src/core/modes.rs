//! Terminal modes
//!
//! Flags toggled by escape sequences that change how later input is
//! interpreted or how local keyboard and mouse input is encoded.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Mouse tracking mode (DEC private modes 1000, 1002, 1003)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseTracking {
    /// No mouse reporting
    #[default]
    Off,
    /// Button presses and releases only
    Clicks,
    /// Clicks plus motion while a button is held
    Drag,
    /// Clicks plus every motion
    All,
}

/// Mode flags owned by the screen
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modes {
    pub mouse_tracking: MouseTracking,
    /// SGR (1006) mouse encoding instead of X10
    pub sgr_mouse: bool,
    /// Application cursor keys (DECCKM)
    pub cursor_app: bool,
    /// Insert mode (IRM)
    pub insert: bool,
    /// DEC special graphics designated into G0
    pub acs: bool,
    /// Bracketed paste (2004), tracked only
    pub bracketed_paste: bool,
    /// Alternate screen buffer active
    pub alternate_screen: bool,
}

/// Mouse button as encoded in a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum MouseButton {
    Left = 0,
    Middle = 1,
    Right = 2,
    /// No button held
    #[default]
    Release = 3,
    WheelUp = 64,
    WheelDown = 65,
}

impl MouseButton {
    pub fn code(self) -> u8 {
        self as u8
    }
}

bitflags! {
    /// Modifier bits added to a mouse report's button code
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct MouseModifiers: u8 {
        const SHIFT = 4;
        const ALT = 8;
        const CTRL = 16;
    }
}

/// Last reported mouse state, used to synthesize drag reports and to
/// suppress repeated motion at the same position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MouseState {
    pub button: MouseButton,
    pub modifiers: MouseModifiers,
    pub row: usize,
    pub col: usize,
}

impl MouseState {
    pub fn button_held(&self) -> bool {
        self.button != MouseButton::Release
    }
}
