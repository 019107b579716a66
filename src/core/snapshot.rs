//! Deterministic snapshot generation
//!
//! Snapshots capture the complete screen state in a serializable format
//! for testing and debugging. Given the same byte stream, the terminal
//! must produce identical snapshots.

use serde::{Deserialize, Serialize};

use super::attributes::{Color, Flags};
use super::cell::Cell;
use super::cursor::Cursor;
use super::modes::Modes;
use super::screen::Screen;

/// A complete snapshot of the screen state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub rows: usize,
    pub cols: usize,
    /// Stored cells, row-major
    pub grid: Vec<Vec<CellSnapshot>>,
    /// Cursor with its position clamped into the grid
    pub cursor: Cursor,
    pub scroll_top: usize,
    pub scroll_bottom: usize,
    pub modes: Modes,
}

/// Snapshot of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
    #[serde(default, skip_serializing_if = "Flags::is_empty")]
    pub flags: Flags,
}

impl From<&Cell> for CellSnapshot {
    fn from(cell: &Cell) -> Self {
        CellSnapshot {
            ch: cell.display_char(),
            fg: cell.attr.fg(),
            bg: cell.attr.bg(),
            flags: cell.attr.flags,
        }
    }
}

impl Snapshot {
    /// Create a snapshot from the current screen state
    pub fn from_screen(screen: &Screen) -> Self {
        let grid = (0..screen.rows())
            .map(|row| screen.grid().row(row).iter().map(CellSnapshot::from).collect())
            .collect();

        let (scroll_top, scroll_bottom) = screen.scroll_region();
        Snapshot {
            rows: screen.rows(),
            cols: screen.cols(),
            grid,
            cursor: screen.cursor().clamped(screen.rows(), screen.cols()),
            scroll_top,
            scroll_bottom,
            modes: screen.modes.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Plain text of the screen, trailing blanks and blank lines removed
    pub fn to_text(&self) -> String {
        let mut lines: Vec<String> = self
            .grid
            .iter()
            .map(|row| {
                let line: String = row.iter().map(|cell| cell.ch).collect();
                line.trim_end_matches(' ').to_string()
            })
            .collect();

        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    /// Compare grid contents only
    pub fn content_equals(&self, other: &Snapshot) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.grid == other.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::DebugLevel;
    use crate::core::Attributes;

    fn screen(rows: usize, cols: usize) -> Screen {
        Screen::new(
            rows,
            cols,
            Attributes::new(Color::White, Color::Black),
            DebugLevel::None,
        )
    }

    #[test]
    fn test_snapshot_from_screen() {
        let mut screen = screen(3, 10);
        screen.print(b'H');
        screen.print(b'i');

        let snapshot = Snapshot::from_screen(&screen);

        assert_eq!(snapshot.cols, 10);
        assert_eq!(snapshot.rows, 3);
        assert_eq!(snapshot.grid[0][0].ch, 'H');
        assert_eq!(snapshot.grid[0][1].ch, 'i');
        assert_eq!(snapshot.grid[0][1].fg, Color::White);
        assert_eq!(snapshot.cursor.col, 2);
        assert_eq!(snapshot.cursor.row, 0);
    }

    #[test]
    fn test_snapshot_clamps_sentinel_cursor() {
        let mut screen = screen(2, 3);
        for b in b"abc" {
            screen.print(*b);
        }
        let snapshot = Snapshot::from_screen(&screen);
        assert_eq!(snapshot.cursor.col, 2);
    }

    #[test]
    fn test_snapshot_to_text() {
        let mut screen = screen(3, 10);
        screen.print(b'A');
        screen.print(b'B');
        screen.line_feed();
        screen.to_line_start();
        screen.print(b'C');

        let text = Snapshot::from_screen(&screen).to_text();
        assert_eq!(text, "AB\nC\n");
    }

    #[test]
    fn test_snapshot_json_roundtrip() {
        let mut screen = screen(2, 5);
        screen.print(b'X');
        screen.apply_sgr(1);
        screen.apply_sgr(31);
        screen.print(b'Y');

        let snapshot = Snapshot::from_screen(&screen);
        let json = snapshot.to_json().unwrap();
        let restored = Snapshot::from_json(&json).unwrap();

        assert!(snapshot.content_equals(&restored));
        assert_eq!(restored.grid[0][1].flags, Flags::BOLD);
        assert_eq!(restored.grid[0][1].fg, Color::Red);
    }
}
