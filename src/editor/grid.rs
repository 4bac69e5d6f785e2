//! Grid Model: the authoritative schema + rows of an edit session.
//!
//! Every mutation applies in place and either succeeds completely or returns
//! an error with the model untouched. Successful structural changes bump the
//! revision counter and set the dirty flag; only the caller clears it after
//! a confirmed save.

use std::collections::BTreeSet;

use crate::error::{DataTableError, Result};
use crate::types::{Column, ColumnPatch, ColumnType, ImportedTable, Row, Table, TableSnapshot};

use super::navigation::{next_cell, CellPos, NavKey};
use super::selection::RowSelection;

/// Live, editable representation of a table.
#[derive(Debug, Clone, Default)]
pub struct GridModel {
    columns: Vec<Column>,
    rows: Vec<Row>,
    dirty: bool,
    /// Incremented on every successful mutation
    revision: u64,
    selection: RowSelection,
}

impl GridModel {
    /// An empty grid with no columns.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows,
            ..Self::default()
        }
    }

    /// Grid for a loaded table. Display options are not part of the grid.
    pub fn from_table(table: Table) -> Self {
        Self::from_parts(table.columns, table.rows)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn selection(&self) -> &RowSelection {
        &self.selection
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.revision += 1;
    }

    fn check_row(&self, index: usize) -> Result<()> {
        if index < self.rows.len() {
            Ok(())
        } else {
            Err(DataTableError::RowOutOfBounds {
                index,
                len: self.rows.len(),
            })
        }
    }

    fn column_index(&self, key: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.key == key)
            .ok_or_else(|| DataTableError::UnknownColumn(key.to_string()))
    }

    // ---- cells -------------------------------------------------------------

    /// Set one cell. Out-of-range rows are ignored. Any key and any string
    /// are accepted as-is.
    pub fn set_cell(&mut self, row: usize, key: &str, value: impl Into<String>) {
        let Some(target) = self.rows.get_mut(row) else {
            tracing::debug!(row, key, "set_cell ignored: row out of range");
            return;
        };
        target.set(key, value);
        self.touch();
    }

    // ---- rows --------------------------------------------------------------

    /// Append an empty row.
    ///
    /// # Errors
    /// [`DataTableError::NoColumns`] when the schema is empty.
    pub fn add_row(&mut self) -> Result<usize> {
        if self.columns.is_empty() {
            tracing::warn!("add_row rejected: no columns defined");
            return Err(DataTableError::NoColumns);
        }
        self.rows.push(Row::empty_for(&self.columns));
        self.touch();
        Ok(self.rows.len() - 1)
    }

    /// Insert an empty row at `index`, clamped to `0..=len`. Returns the index
    /// actually used.
    pub fn insert_row(&mut self, index: usize) -> usize {
        let index = index.min(self.rows.len());
        self.rows.insert(index, Row::empty_for(&self.columns));
        self.selection.on_insert(index);
        self.touch();
        index
    }

    /// Insert an empty row directly above `index`.
    pub fn insert_row_above(&mut self, index: usize) -> usize {
        self.insert_row(index)
    }

    /// Insert an empty row directly below `index`.
    pub fn insert_row_below(&mut self, index: usize) -> usize {
        self.insert_row(index.saturating_add(1))
    }

    /// Insert a copy of row `index` directly after it.
    ///
    /// # Errors
    /// [`DataTableError::RowOutOfBounds`] when `index` is not a row.
    pub fn duplicate_row(&mut self, index: usize) -> Result<usize> {
        let copy = self
            .rows
            .get(index)
            .cloned()
            .ok_or(DataTableError::RowOutOfBounds {
                index,
                len: self.rows.len(),
            })?;
        self.rows.insert(index + 1, copy);
        self.selection.on_insert(index + 1);
        self.touch();
        Ok(index + 1)
    }

    /// Remove every row whose index is in `indices`. Indices past the end are
    /// ignored. Returns how many rows were removed.
    pub fn delete_rows(&mut self, indices: &BTreeSet<usize>) -> usize {
        let before = self.rows.len();
        // Highest first so earlier removals don't shift later targets.
        for &index in indices.iter().rev() {
            if index < self.rows.len() {
                self.rows.remove(index);
            }
        }
        let removed = before - self.rows.len();
        if removed > 0 {
            self.selection.on_remove(indices);
            self.touch();
            tracing::debug!(removed, remaining = self.rows.len(), "rows deleted");
        }
        removed
    }

    /// Remove a single row.
    ///
    /// # Errors
    /// [`DataTableError::RowOutOfBounds`] when `index` is not a row.
    pub fn delete_row(&mut self, index: usize) -> Result<()> {
        self.check_row(index)?;
        self.delete_rows(&BTreeSet::from([index]));
        Ok(())
    }

    // ---- columns -----------------------------------------------------------

    /// Append a column and give every existing row an empty value for it.
    ///
    /// `key` is used verbatim; see [`crate::slug::suggest_key`] for deriving
    /// one from a label.
    ///
    /// # Errors
    /// [`DataTableError::DuplicateKey`] when `key` is already in the schema
    /// (exact, case-sensitive match).
    pub fn add_column(
        &mut self,
        key: impl Into<String>,
        label: impl Into<String>,
        col_type: ColumnType,
    ) -> Result<()> {
        self.push_column(Column::new(key, label, col_type))
    }

    /// Append a fully specified column. Same rules as [`Self::add_column`].
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if self.columns.iter().any(|c| c.key == column.key) {
            tracing::warn!(key = %column.key, "add_column rejected: duplicate key");
            return Err(DataTableError::DuplicateKey(column.key));
        }
        for row in &mut self.rows {
            row.set(column.key.clone(), String::new());
        }
        tracing::debug!(key = %column.key, col_type = %column.col_type, "column added");
        self.columns.push(column);
        self.touch();
        Ok(())
    }

    /// Remove a column and its value from every row.
    ///
    /// # Errors
    /// [`DataTableError::UnknownColumn`] when no column has this key.
    pub fn delete_column(&mut self, key: &str) -> Result<Column> {
        let index = self.column_index(key)?;
        let column = self.columns.remove(index);
        for row in &mut self.rows {
            row.remove(key);
        }
        self.touch();
        Ok(column)
    }

    /// Change a column's label, type, alignment or width. The key is fixed.
    ///
    /// # Errors
    /// [`DataTableError::UnknownColumn`] when no column has this key.
    pub fn update_column(&mut self, key: &str, patch: ColumnPatch) -> Result<()> {
        let index = self.column_index(key)?;
        if let Some(column) = self.columns.get_mut(index) {
            patch.apply(column);
        }
        self.touch();
        Ok(())
    }

    // ---- whole-table -------------------------------------------------------

    /// Replace schema and rows with an import result. Clears the selection.
    pub fn replace(&mut self, imported: ImportedTable) {
        self.columns = imported.columns;
        self.rows = imported.rows;
        self.selection.clear();
        self.touch();
    }

    /// Deep copy of the current schema and rows. Does not clear `dirty`.
    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            columns: self.columns.clone(),
            rows: self.rows.clone(),
        }
    }

    /// Clear the dirty flag after a confirmed save.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    // ---- selection ---------------------------------------------------------

    /// Select or deselect a row. Out-of-range rows are ignored.
    pub fn select_row(&mut self, index: usize, selected: bool) {
        if index < self.rows.len() {
            self.selection.set(index, selected);
        }
    }

    /// Flip a row's selection; returns the new state (`false` when out of range).
    pub fn toggle_row(&mut self, index: usize) -> bool {
        index < self.rows.len() && self.selection.toggle(index)
    }

    /// The select-all checkbox: select every row or clear the selection.
    pub fn select_all(&mut self, selected: bool) {
        if selected {
            self.selection.select_all(self.rows.len());
        } else {
            self.selection.clear();
        }
    }

    pub fn selected_rows(&self) -> Vec<usize> {
        self.selection.indices()
    }

    /// Delete every selected row. Returns how many rows were removed.
    pub fn delete_selected(&mut self) -> usize {
        let targets = self.selection.as_set().clone();
        self.delete_rows(&targets)
    }

    // ---- navigation --------------------------------------------------------

    /// Cell reached from `from` by a navigation key, if any.
    pub fn navigate(&self, from: CellPos, key: NavKey) -> Option<CellPos> {
        next_cell(from, key, self.rows.len(), self.columns.len())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::types::Align;

    fn grid_with(names: &[&str]) -> GridModel {
        let columns = vec![Column::text("name", "Name")];
        let rows = names.iter().map(|n| [("name", *n)].into_iter().collect()).collect();
        GridModel::from_parts(columns, rows)
    }

    fn names(grid: &GridModel) -> Vec<&str> {
        grid.rows().iter().map(|r| r.get("name")).collect()
    }

    #[test]
    fn test_set_cell_marks_dirty() {
        let mut grid = grid_with(&["A"]);
        assert!(!grid.is_dirty());
        grid.set_cell(0, "name", "Z");
        assert_eq!(names(&grid), vec!["Z"]);
        assert!(grid.is_dirty());
    }

    #[test]
    fn test_set_cell_out_of_range_is_noop() {
        let mut grid = grid_with(&["A"]);
        grid.set_cell(5, "name", "Z");
        assert_eq!(names(&grid), vec!["A"]);
        assert!(!grid.is_dirty());
        assert_eq!(grid.revision(), 0);
    }

    #[test]
    fn test_add_row_requires_columns() {
        let mut grid = GridModel::new();
        assert!(matches!(grid.add_row(), Err(DataTableError::NoColumns)));
        assert!(!grid.is_dirty());
    }

    #[test]
    fn test_add_row_fills_every_key() {
        let mut grid = grid_with(&["A"]);
        grid.add_column("age", "Age", ColumnType::Number).unwrap();
        let idx = grid.add_row().unwrap();
        assert_eq!(idx, 1);
        let keys: Vec<&str> = grid.rows()[1].keys().collect();
        assert_eq!(keys, vec!["age", "name"]);
    }

    #[test]
    fn test_insert_row_clamps() {
        let mut grid = grid_with(&["A", "B"]);
        assert_eq!(grid.insert_row(99), 2);
        assert_eq!(grid.insert_row_above(0), 0);
        assert_eq!(names(&grid), vec!["", "A", "B", ""]);
    }

    #[test]
    fn test_insert_row_below() {
        let mut grid = grid_with(&["A", "B"]);
        grid.insert_row_below(0);
        assert_eq!(names(&grid), vec!["A", "", "B"]);
    }

    #[test]
    fn test_duplicate_row_is_independent() {
        let mut grid = grid_with(&["A", "B", "C"]);
        assert_eq!(grid.duplicate_row(1).unwrap(), 2);
        assert_eq!(names(&grid), vec!["A", "B", "B", "C"]);
        grid.set_cell(2, "name", "B2");
        assert_eq!(names(&grid), vec!["A", "B", "B2", "C"]);
    }

    #[test]
    fn test_duplicate_row_out_of_bounds() {
        let mut grid = grid_with(&["A"]);
        assert!(matches!(
            grid.duplicate_row(1),
            Err(DataTableError::RowOutOfBounds { index: 1, len: 1 })
        ));
        assert_eq!(grid.row_count(), 1);
    }

    #[test]
    fn test_delete_rows_highest_first() {
        let mut grid = grid_with(&["A", "B", "C", "D"]);
        let removed = grid.delete_rows(&BTreeSet::from([3, 1]));
        assert_eq!(removed, 2);
        assert_eq!(names(&grid), vec!["A", "C"]);
        assert!(grid.is_dirty());
    }

    #[test]
    fn test_delete_rows_empty_set_is_clean() {
        let mut grid = grid_with(&["A"]);
        assert_eq!(grid.delete_rows(&BTreeSet::new()), 0);
        assert_eq!(grid.delete_rows(&BTreeSet::from([7])), 0);
        assert!(!grid.is_dirty());
    }

    #[test]
    fn test_add_column_duplicate_key_leaves_schema() {
        let mut grid = grid_with(&["A"]);
        grid.add_column("age", "Age", ColumnType::Number).unwrap();
        let before = grid.columns().to_vec();
        let err = grid.add_column("age", "Other", ColumnType::Text).unwrap_err();
        assert!(matches!(err, DataTableError::DuplicateKey(k) if k == "age"));
        assert_eq!(grid.columns(), before.as_slice());
        // Case-sensitive: "Age" is a different key.
        grid.add_column("Age", "Age 2", ColumnType::Text).unwrap();
        assert_eq!(grid.column_count(), 3);
    }

    #[test]
    fn test_add_column_fills_existing_rows() {
        let mut grid = grid_with(&["A", "B"]);
        grid.add_column("city", "City", ColumnType::Text).unwrap();
        assert!(grid.rows().iter().all(|r| r.contains_key("city")));
    }

    #[test]
    fn test_delete_column_removes_values() {
        let mut grid = grid_with(&["A"]);
        let col = grid.delete_column("name").unwrap();
        assert_eq!(col.key, "name");
        assert!(!grid.rows()[0].contains_key("name"));
        assert!(matches!(
            grid.delete_column("name"),
            Err(DataTableError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_update_column() {
        let mut grid = grid_with(&["A"]);
        grid.update_column(
            "name",
            ColumnPatch {
                label: Some("Full name".into()),
                align: Some(Align::Center),
                ..Default::default()
            },
        )
        .unwrap();
        let col = grid.column("name").unwrap();
        assert_eq!(col.label, "Full name");
        assert_eq!(col.align, Align::Center);
        assert!(grid
            .update_column("missing", ColumnPatch::default())
            .is_err());
    }

    #[test]
    fn test_snapshot_keeps_dirty() {
        let mut grid = grid_with(&["A"]);
        grid.set_cell(0, "name", "B");
        let snap = grid.snapshot();
        assert!(grid.is_dirty());
        grid.set_cell(0, "name", "C");
        assert_eq!(snap.rows[0].get("name"), "B");
        grid.mark_clean();
        assert!(!grid.is_dirty());
    }

    #[test]
    fn test_selection_follows_structure() {
        let mut grid = grid_with(&["A", "B", "C", "D"]);
        grid.select_row(1, true);
        grid.select_row(3, true);
        grid.select_row(9, true);
        grid.insert_row(0);
        assert_eq!(grid.selected_rows(), vec![2, 4]);
        assert_eq!(grid.delete_selected(), 2);
        assert_eq!(names(&grid), vec!["", "A", "C"]);
        assert!(grid.selected_rows().is_empty());
    }

    #[test]
    fn test_select_all_and_replace() {
        let mut grid = grid_with(&["A", "B"]);
        grid.select_all(true);
        assert_eq!(grid.selected_rows(), vec![0, 1]);
        grid.replace(ImportedTable {
            columns: vec![Column::text("x", "X")],
            rows: vec![Row::new()],
        });
        assert!(grid.selected_rows().is_empty());
        assert_eq!(grid.columns()[0].key, "x");
    }

    #[test]
    fn test_navigate_uses_grid_size() {
        let grid = grid_with(&["A", "B"]);
        assert_eq!(
            grid.navigate(CellPos::new(0, 0), NavKey::Tab),
            Some(CellPos::new(1, 0))
        );
        assert_eq!(grid.navigate(CellPos::new(1, 0), NavKey::Enter), None);
    }
}
