//! Keyboard movement between editor cells.

use serde::{Deserialize, Serialize};

/// Cell coordinate in the editing grid (row index, column index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Navigation keys handled by the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavKey {
    /// Next cell, wrapping to the first cell of the next row
    Tab,
    /// Previous cell, wrapping to the last cell of the previous row
    ShiftTab,
    /// Same column, next row
    Enter,
    /// Same column, previous row
    ShiftEnter,
}

/// Target of a navigation key from `from` in a `rows` x `cols` grid.
///
/// Returns `None` when the move would leave the grid or `from` is outside it.
pub fn next_cell(from: CellPos, key: NavKey, rows: usize, cols: usize) -> Option<CellPos> {
    if from.row >= rows || from.col >= cols {
        return None;
    }
    match key {
        NavKey::Tab => {
            if from.col + 1 < cols {
                Some(CellPos::new(from.row, from.col + 1))
            } else if from.row + 1 < rows {
                Some(CellPos::new(from.row + 1, 0))
            } else {
                None
            }
        }
        NavKey::ShiftTab => {
            if from.col > 0 {
                Some(CellPos::new(from.row, from.col - 1))
            } else if from.row > 0 {
                Some(CellPos::new(from.row - 1, cols - 1))
            } else {
                None
            }
        }
        NavKey::Enter => (from.row + 1 < rows).then(|| CellPos::new(from.row + 1, from.col)),
        NavKey::ShiftEnter => (from.row > 0).then(|| CellPos::new(from.row - 1, from.col)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(CellPos::new(0, 0), NavKey::Tab, Some(CellPos::new(0, 1)) ; "tab right")]
    #[test_case(CellPos::new(0, 2), NavKey::Tab, Some(CellPos::new(1, 0)) ; "tab wraps")]
    #[test_case(CellPos::new(1, 2), NavKey::Tab, None ; "tab off end")]
    #[test_case(CellPos::new(1, 0), NavKey::ShiftTab, Some(CellPos::new(0, 2)) ; "shift tab wraps")]
    #[test_case(CellPos::new(0, 0), NavKey::ShiftTab, None ; "shift tab off start")]
    #[test_case(CellPos::new(0, 1), NavKey::Enter, Some(CellPos::new(1, 1)) ; "enter down")]
    #[test_case(CellPos::new(1, 1), NavKey::Enter, None ; "enter off bottom")]
    #[test_case(CellPos::new(1, 1), NavKey::ShiftEnter, Some(CellPos::new(0, 1)) ; "shift enter up")]
    #[test_case(CellPos::new(5, 0), NavKey::Tab, None ; "outside grid")]
    fn test_next_cell(from: CellPos, key: NavKey, expected: Option<CellPos>) {
        assert_eq!(next_cell(from, key, 2, 3), expected);
    }
}
