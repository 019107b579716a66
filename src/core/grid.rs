//! Terminal Grid
//!
//! A flat, row-major matrix of cells with bounds-safe region operations.
//! Every coordinate handed to the grid is clamped into range before it is
//! turned into an index, and region operations work on contiguous
//! row-major spans the way the display memory of a real terminal does.

use serde::{Deserialize, Serialize};

use super::cell::Cell;

/// Region operation rejected because it would leave the backing storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("move destination {dest} is before the start of the grid")]
    BeforeStart { dest: isize },

    #[error("move of {size} cells to {dest} runs past the end of the grid ({len} cells)")]
    PastEnd { dest: isize, size: usize, len: usize },
}

/// The terminal grid: `rows * cols` cells in row-major order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid filled with `blank`. Dimensions are at least 1x1.
    pub fn new(rows: usize, cols: usize, blank: Cell) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            rows,
            cols,
            cells: vec![blank; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn clamp_row(&self, row: usize) -> usize {
        row.min(self.rows - 1)
    }

    fn clamp_col(&self, col: usize) -> usize {
        col.min(self.cols - 1)
    }

    fn index(&self, row: usize, col: usize) -> usize {
        self.clamp_row(row) * self.cols + self.clamp_col(col)
    }

    /// Cell at an exact position, `None` when out of range
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// The cells of one row (clamped)
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = self.clamp_row(row) * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Overwrite one cell; both coordinates are clamped into range
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        let idx = self.index(row, col);
        self.cells[idx] = cell;
    }

    /// Fill the row-major span from (row0, col0) through (row1, col1).
    ///
    /// Both corners are clamped; a span whose end precedes its start is a
    /// no-op.
    pub fn fill(&mut self, row0: usize, row1: usize, col0: usize, col1: usize, cell: Cell) {
        let start = self.index(row0, col0);
        let end = self.index(row1, col1);
        if start > end {
            return;
        }
        self.cells[start..=end].fill(cell);
    }

    /// Move the row-major span covering the clamped rectangle by
    /// (`d_row`, `d_col`).
    ///
    /// Source and destination may overlap. If the destination would leave
    /// the storage nothing is written and an error is returned. Inverted
    /// rectangles are a no-op.
    pub fn move_region(
        &mut self,
        row0: usize,
        row1: usize,
        col0: usize,
        col1: usize,
        d_row: isize,
        d_col: isize,
    ) -> Result<(), GridError> {
        let (row0, row1) = (self.clamp_row(row0), self.clamp_row(row1));
        let (col0, col1) = (self.clamp_col(col0), self.clamp_col(col1));
        if row0 > row1 || col0 > col1 {
            return Ok(());
        }

        let start = row0 * self.cols + col0;
        let end = row1 * self.cols + col1;
        let size = end - start + 1;
        let dest = (row0 as isize + d_row) * self.cols as isize + (col0 as isize + d_col);

        if dest < 0 {
            return Err(GridError::BeforeStart { dest });
        }
        if dest as usize + size > self.cells.len() {
            return Err(GridError::PastEnd {
                dest,
                size,
                len: self.cells.len(),
            });
        }

        self.cells.copy_within(start..=end, dest as usize);
        Ok(())
    }

    /// Overwrite every cell
    pub fn clear(&mut self, blank: Cell) {
        self.cells.fill(blank);
    }

    /// Copy the contents of a grid with the same shape
    pub fn copy_from(&mut self, other: &Grid) {
        if self.rows == other.rows && self.cols == other.cols {
            self.cells.copy_from_slice(&other.cells);
        } else {
            self.clone_from(other);
        }
    }

    /// Text of one row with trailing blanks removed
    pub fn row_text(&self, row: usize) -> String {
        let text: String = self.row(row).iter().map(Cell::display_char).collect();
        text.trim_end_matches(' ').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Attributes;

    fn ch(c: u8) -> Cell {
        Cell::new(c, Attributes::default())
    }

    fn lettered(rows: usize, cols: usize) -> Grid {
        let mut grid = Grid::new(rows, cols, Cell::default());
        for r in 0..rows {
            for c in 0..cols {
                grid.set(r, c, ch(b'a' + ((r * cols + c) % 26) as u8));
            }
        }
        grid
    }

    #[test]
    fn test_grid_new_min_size() {
        let grid = Grid::new(0, 0, Cell::default());
        assert_eq!(grid.rows(), 1);
        assert_eq!(grid.cols(), 1);
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_set_clamps() {
        let mut grid = Grid::new(3, 4, Cell::default());
        grid.set(10, 10, ch(b'x'));
        assert_eq!(grid.get(2, 3), Some(ch(b'x')));
        assert_eq!(grid.get(3, 0), None);
        assert_eq!(grid.get(0, 4), None);
    }

    #[test]
    fn test_fill_linear_span() {
        let mut grid = Grid::new(3, 4, Cell::default());
        grid.fill(0, 1, 2, 1, ch(b'#'));
        assert_eq!(grid.row_text(0), "  ##");
        assert_eq!(grid.row_text(1), "##");
        assert_eq!(grid.row_text(2), "");
    }

    #[test]
    fn test_fill_inverted_is_noop() {
        let mut grid = Grid::new(3, 4, Cell::default());
        grid.fill(2, 1, 0, 3, ch(b'#'));
        grid.fill(1, 1, 3, 0, ch(b'#'));
        assert!((0..3).all(|r| grid.row_text(r).is_empty()));
    }

    #[test]
    fn test_move_rows_up_overlapping() {
        let mut grid = lettered(3, 2);
        grid.move_region(1, 2, 0, 1, -1, 0).unwrap();
        assert_eq!(grid.row_text(0), "cd");
        assert_eq!(grid.row_text(1), "ef");
        assert_eq!(grid.row_text(2), "ef");
    }

    #[test]
    fn test_move_rows_down_overlapping() {
        let mut grid = lettered(3, 2);
        grid.move_region(0, 1, 0, 1, 1, 0).unwrap();
        assert_eq!(grid.row_text(0), "ab");
        assert_eq!(grid.row_text(1), "ab");
        assert_eq!(grid.row_text(2), "cd");
    }

    #[test]
    fn test_move_out_of_bounds_rejected() {
        let mut grid = lettered(2, 3);
        let before = grid.clone();
        assert!(matches!(
            grid.move_region(0, 1, 0, 2, 1, 0),
            Err(GridError::PastEnd { .. })
        ));
        assert!(matches!(
            grid.move_region(0, 0, 0, 2, -1, 0),
            Err(GridError::BeforeStart { .. })
        ));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_move_inverted_is_noop() {
        let mut grid = lettered(2, 3);
        let before = grid.clone();
        grid.move_region(1, 0, 0, 2, -1, 0).unwrap();
        grid.move_region(0, 1, 2, 1, 0, 1).unwrap();
        assert_eq!(grid, before);
    }

    #[test]
    fn test_copy_from() {
        let source = lettered(2, 2);
        let mut grid = Grid::new(2, 2, Cell::default());
        grid.copy_from(&source);
        assert_eq!(grid, source);
    }
}
