//! Terminal Cell
//!
//! A single grid position: one byte of glyph plus its attributes.

use serde::{Deserialize, Serialize};

use super::attributes::Attributes;

/// A single cell in the terminal grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// The glyph, a single byte (ISO-8859-1 or an ACS substitution)
    pub ch: u8,
    /// Attributes the glyph was written with
    pub attr: Attributes,
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank(Attributes::default())
    }
}

impl Cell {
    pub fn new(ch: u8, attr: Attributes) -> Self {
        Self { ch, attr }
    }

    /// A space carrying the given attributes
    pub fn blank(attr: Attributes) -> Self {
        Self { ch: b' ', attr }
    }

    pub fn is_blank(&self) -> bool {
        self.ch == b' '
    }

    /// The glyph as a `char`, interpreting the byte as Latin-1
    pub fn display_char(&self) -> char {
        char::from(self.ch)
    }
}
