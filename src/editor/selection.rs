//! Row selection (the editor's per-row checkboxes).

use std::collections::BTreeSet;

/// Set of selected row indices that follows structural row edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSelection {
    rows: BTreeSet<usize>,
}

impl RowSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn contains(&self, row: usize) -> bool {
        self.rows.contains(&row)
    }

    /// Selected indices in ascending order.
    pub fn indices(&self) -> Vec<usize> {
        self.rows.iter().copied().collect()
    }

    pub(crate) fn as_set(&self) -> &BTreeSet<usize> {
        &self.rows
    }

    pub fn set(&mut self, row: usize, selected: bool) {
        if selected {
            self.rows.insert(row);
        } else {
            self.rows.remove(&row);
        }
    }

    /// Flip one row; returns the new state.
    pub fn toggle(&mut self, row: usize) -> bool {
        if self.rows.remove(&row) {
            false
        } else {
            self.rows.insert(row);
            true
        }
    }

    pub fn select_all(&mut self, row_count: usize) {
        self.rows = (0..row_count).collect();
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Whether every one of `row_count` rows is selected (and there is at
    /// least one).
    pub fn all_selected(&self, row_count: usize) -> bool {
        row_count > 0 && self.rows.len() == row_count
    }

    /// A row was inserted at `index`: later selections shift down by one.
    pub(crate) fn on_insert(&mut self, index: usize) {
        self.rows = self
            .rows
            .iter()
            .map(|&r| if r >= index { r + 1 } else { r })
            .collect();
    }

    /// Rows at `removed` were deleted: drop them and close the gaps.
    pub(crate) fn on_remove(&mut self, removed: &BTreeSet<usize>) {
        self.rows = self
            .rows
            .iter()
            .filter(|r| !removed.contains(r))
            .map(|&r| r - removed.range(..r).count())
            .collect();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_select_all() {
        let mut sel = RowSelection::new();
        assert!(sel.toggle(2));
        assert!(!sel.toggle(2));
        sel.select_all(3);
        assert_eq!(sel.indices(), vec![0, 1, 2]);
        assert!(sel.all_selected(3));
        sel.set(1, false);
        assert!(!sel.all_selected(3));
    }

    #[test]
    fn test_insert_shifts_later_rows() {
        let mut sel = RowSelection::new();
        sel.set(0, true);
        sel.set(2, true);
        sel.on_insert(1);
        assert_eq!(sel.indices(), vec![0, 3]);
    }

    #[test]
    fn test_remove_closes_gaps() {
        let mut sel = RowSelection::new();
        for r in [0, 2, 4, 5] {
            sel.set(r, true);
        }
        let removed: BTreeSet<usize> = [1, 2, 3].into_iter().collect();
        sel.on_remove(&removed);
        // 0 stays, 2 removed, 4 -> 1, 5 -> 2
        assert_eq!(sel.indices(), vec![0, 1, 2]);
    }
}
