//! Cursor state
//!
//! The cursor column may transiently equal the column count (and the row
//! the row count): that sentinel position means "the next printable
//! character wraps first". Readers outside the engine see the clamped
//! position via [`Cursor::clamped`].

use serde::{Deserialize, Serialize};

/// Cursor position and visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Row position (0-indexed)
    pub row: usize,
    /// Column position (0-indexed, may equal the column count)
    pub col: usize,
    /// Whether the cursor is visible (DECTCEM)
    pub visible: bool,
    /// Whether the cursor blinks
    pub blinking: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            row: 0,
            col: 0,
            visible: true,
            blinking: false,
        }
    }
}

impl Cursor {
    /// Whether the cursor sits on the wrap sentinel past the last column
    pub fn at_wrap_sentinel(&self, cols: usize) -> bool {
        self.col >= cols
    }

    /// Copy of the cursor with its position clamped into the grid
    pub fn clamped(&self, rows: usize, cols: usize) -> Self {
        Self {
            row: self.row.min(rows.saturating_sub(1)),
            col: self.col.min(cols.saturating_sub(1)),
            ..*self
        }
    }

    /// Move by a signed offset, clamping into [0, rows] x [0, cols]
    pub(crate) fn offset(&mut self, d_row: isize, d_col: isize, rows: usize, cols: usize) {
        self.row = offset_clamped(self.row, d_row, rows);
        self.col = offset_clamped(self.col, d_col, cols);
    }
}

fn offset_clamped(value: usize, delta: isize, max: usize) -> usize {
    let moved = value as isize + delta;
    moved.clamp(0, max as isize) as usize
}
