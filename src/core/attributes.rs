//! Cell attributes
//!
//! The SGR attribute model: style flags plus a 16-color foreground and
//! background packed into a single byte, and the state machine that
//! mutates the "current attribute" one SGR code at a time.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// 16-entry palette: 8 base colors followed by their bright variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Color {
    #[default]
    Black = 0,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl Color {
    const PALETTE: [Color; 16] = [
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::White,
        Color::BrightBlack,
        Color::BrightRed,
        Color::BrightGreen,
        Color::BrightYellow,
        Color::BrightBlue,
        Color::BrightMagenta,
        Color::BrightCyan,
        Color::BrightWhite,
    ];

    /// Color for a palette index; only the low nibble is used
    pub fn from_index(index: u8) -> Self {
        Self::PALETTE[(index & 0x0f) as usize]
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn is_bright(self) -> bool {
        self.index() >= 8
    }

    /// The bright variant of a base color; bright colors map to themselves
    pub fn brightened(self) -> Self {
        if self.is_bright() {
            self
        } else {
            Self::from_index(self.index() + 8)
        }
    }
}

bitflags! {
    /// Style flags carried by every cell
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Flags: u8 {
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const BLINK = 1 << 4;
        const REVERSE = 1 << 5;
        const INVISIBLE = 1 << 6;
    }
}

/// Style flags plus foreground (high nibble) and background (low nibble)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Attributes {
    pub flags: Flags,
    colors: u8,
}

impl Attributes {
    /// Unstyled attributes with the given colors
    pub fn new(fg: Color, bg: Color) -> Self {
        Self {
            flags: Flags::empty(),
            colors: (fg.index() << 4) | bg.index(),
        }
    }

    pub fn fg(&self) -> Color {
        Color::from_index(self.colors >> 4)
    }

    pub fn bg(&self) -> Color {
        Color::from_index(self.colors)
    }

    pub fn set_fg(&mut self, color: Color) {
        self.colors = (self.colors & 0x0f) | (color.index() << 4);
    }

    pub fn set_bg(&mut self, color: Color) {
        self.colors = (self.colors & 0xf0) | color.index();
    }

    pub fn contains(&self, flags: Flags) -> bool {
        self.flags.contains(flags)
    }

    /// Apply a single SGR parameter.
    ///
    /// `defaults` supplies the colors restored by 0, 39 and 49. Codes
    /// outside the supported set are ignored.
    pub fn apply_sgr(&mut self, code: u16, defaults: Attributes) {
        match code {
            0 => {
                self.flags = Flags::empty();
                self.colors = defaults.colors;
            },
            1 => self.flags.insert(Flags::BOLD),
            2 => self.flags.insert(Flags::DIM),
            3 => self.flags.insert(Flags::ITALIC),
            4 => self.flags.insert(Flags::UNDERLINE),
            5 | 6 => self.flags.insert(Flags::BLINK),
            7 => self.flags.insert(Flags::REVERSE),
            8 => self.flags.insert(Flags::INVISIBLE),
            22 => self.flags.remove(Flags::BOLD | Flags::DIM),
            23 => self.flags.remove(Flags::ITALIC),
            24 => self.flags.remove(Flags::UNDERLINE),
            25 => self.flags.remove(Flags::BLINK),
            27 => self.flags.remove(Flags::REVERSE),
            28 => self.flags.remove(Flags::INVISIBLE),
            30..=37 => self.set_fg(Color::from_index((code - 30) as u8)),
            39 => self.set_fg(defaults.fg()),
            40..=47 => self.set_bg(Color::from_index((code - 40) as u8)),
            49 => self.set_bg(defaults.bg()),
            90..=97 => self.set_fg(Color::from_index((code - 90) as u8 + 8)),
            100..=107 => self.set_bg(Color::from_index((code - 100) as u8 + 8)),
            _ => {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Attributes {
        Attributes::new(Color::White, Color::Black)
    }

    #[test]
    fn test_color_packing() {
        let mut attr = Attributes::new(Color::BrightCyan, Color::Blue);
        assert_eq!(attr.fg(), Color::BrightCyan);
        assert_eq!(attr.bg(), Color::Blue);

        attr.set_bg(Color::BrightWhite);
        assert_eq!(attr.fg(), Color::BrightCyan);
        assert_eq!(attr.bg(), Color::BrightWhite);
    }

    #[test]
    fn test_color_brightened() {
        assert_eq!(Color::Red.brightened(), Color::BrightRed);
        assert_eq!(Color::BrightRed.brightened(), Color::BrightRed);
        assert_eq!(Color::from_index(0x1f), Color::BrightWhite);
    }

    #[test]
    fn test_sgr_bold_roundtrip() {
        let before = defaults();
        let mut attr = before;
        attr.apply_sgr(1, defaults());
        assert!(attr.contains(Flags::BOLD));
        attr.apply_sgr(22, defaults());
        assert_eq!(attr, before);
    }

    #[test]
    fn test_sgr_reset_restores_defaults() {
        let mut attr = defaults();
        attr.apply_sgr(4, defaults());
        attr.apply_sgr(7, defaults());
        attr.apply_sgr(31, defaults());
        attr.apply_sgr(104, defaults());
        assert_eq!(attr.fg(), Color::Red);
        assert_eq!(attr.bg(), Color::BrightBlue);

        attr.apply_sgr(0, defaults());
        assert_eq!(attr, defaults());
    }

    #[test]
    fn test_sgr_colors() {
        let mut attr = defaults();
        attr.apply_sgr(37, defaults());
        assert_eq!(attr.fg(), Color::White);
        attr.apply_sgr(90, defaults());
        assert_eq!(attr.fg(), Color::BrightBlack);
        attr.apply_sgr(97, defaults());
        assert_eq!(attr.fg(), Color::BrightWhite);
        attr.apply_sgr(42, defaults());
        assert_eq!(attr.bg(), Color::Green);
        attr.apply_sgr(39, defaults());
        attr.apply_sgr(49, defaults());
        assert_eq!(attr, defaults());
    }

    #[test]
    fn test_sgr_blink_and_clear() {
        let mut attr = defaults();
        attr.apply_sgr(6, defaults());
        assert!(attr.contains(Flags::BLINK));
        attr.apply_sgr(25, defaults());
        assert!(!attr.contains(Flags::BLINK));

        attr.apply_sgr(8, defaults());
        attr.apply_sgr(3, defaults());
        attr.apply_sgr(28, defaults());
        attr.apply_sgr(23, defaults());
        assert_eq!(attr.flags, Flags::empty());
    }

    #[test]
    fn test_sgr_unknown_ignored() {
        let mut attr = defaults();
        for code in [9, 21, 26, 38, 48, 58, 98, 108, 999] {
            attr.apply_sgr(code, defaults());
        }
        assert_eq!(attr, defaults());
    }
}
