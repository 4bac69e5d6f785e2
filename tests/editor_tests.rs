//! Integration tests for the grid model and edit session.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use std::collections::BTreeSet;

use common::{column_values, row};
use datatable::editor::{CellPos, NavKey};
use datatable::{
    suggest_key, Column, ColumnPatch, ColumnType, DataTableError, EditSession, GridModel,
    MemoryStore, TableId, TableStore,
};

fn letters(names: &[&str]) -> GridModel {
    GridModel::from_parts(
        vec![Column::text("v", "V")],
        names.iter().map(|n| row(&[("v", n)])).collect(),
    )
}

#[test]
fn test_delete_rows_by_set() {
    let mut grid = letters(&["A", "B", "C", "D"]);
    grid.delete_rows(&BTreeSet::from([1, 3]));
    assert_eq!(column_values(grid.rows(), "v"), vec!["A", "C"]);
}

#[test]
fn test_duplicate_row_copy_is_independent() {
    let mut grid = letters(&["A", "B", "C"]);
    grid.duplicate_row(1).unwrap();
    assert_eq!(column_values(grid.rows(), "v"), vec!["A", "B", "B", "C"]);
    grid.set_cell(2, "v", "B'");
    assert_eq!(column_values(grid.rows(), "v"), vec!["A", "B", "B'", "C"]);
}

#[test]
fn test_duplicate_key_leaves_schema_unchanged() {
    let mut grid = letters(&["A"]);
    grid.add_column("price", "Price", ColumnType::Currency).unwrap();
    let before = grid.snapshot();
    let err = grid
        .add_column("price", "Price again", ColumnType::Number)
        .unwrap_err();
    assert!(matches!(err, DataTableError::DuplicateKey(_)));
    assert_eq!(grid.snapshot(), before);
}

#[test]
fn test_suggested_key_then_add_column() {
    let mut grid = letters(&["A"]);
    let key = suggest_key("Unit Price (EUR)");
    assert_eq!(key, "unit_price_eur");
    grid.add_column(key.as_str(), "Unit Price (EUR)", ColumnType::Currency)
        .unwrap();
    assert_eq!(grid.rows()[0].get("unit_price_eur"), "");
    // add_column does not re-slugify
    grid.add_column("Mixed Case Key", "M", ColumnType::Text).unwrap();
    assert!(grid.column("Mixed Case Key").is_some());
}

#[test]
fn test_context_menu_actions() {
    let mut grid = letters(&["A", "B"]);
    grid.insert_row_above(1);
    grid.insert_row_below(2);
    assert_eq!(column_values(grid.rows(), "v"), vec!["A", "", "B", ""]);
    grid.delete_row(1).unwrap();
    assert_eq!(column_values(grid.rows(), "v"), vec!["A", "B", ""]);
    assert!(matches!(
        grid.delete_row(3),
        Err(DataTableError::RowOutOfBounds { index: 3, len: 3 })
    ));
}

#[test]
fn test_column_maintenance() {
    let mut grid = letters(&["A"]);
    grid.push_column(Column::new("n", "N", ColumnType::Number))
        .unwrap();
    grid.update_column(
        "n",
        ColumnPatch {
            col_type: Some(ColumnType::Percent),
            width: Some("10%".into()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(grid.column("n").unwrap().col_type, ColumnType::Percent);
    grid.delete_column("v").unwrap();
    assert_eq!(grid.column_count(), 1);
    assert!(!grid.rows()[0].contains_key("v"));
    assert!(matches!(
        grid.update_column("v", ColumnPatch::default()),
        Err(DataTableError::UnknownColumn(_))
    ));
}

#[test]
fn test_checkbox_selection_delete() {
    let mut grid = letters(&["A", "B", "C"]);
    grid.toggle_row(0);
    grid.toggle_row(2);
    grid.duplicate_row(0).unwrap();
    assert_eq!(grid.selected_rows(), vec![0, 3]);
    assert_eq!(grid.delete_selected(), 2);
    assert_eq!(column_values(grid.rows(), "v"), vec!["A", "B"]);
}

#[test]
fn test_keyboard_navigation_wraps_rows() {
    let mut grid = letters(&["A", "B"]);
    grid.add_column("w", "W", ColumnType::Text).unwrap();
    let mut pos = CellPos::new(0, 0);
    let mut visited = vec![pos];
    while let Some(next) = grid.navigate(pos, NavKey::Tab) {
        visited.push(next);
        pos = next;
    }
    assert_eq!(
        visited,
        vec![
            CellPos::new(0, 0),
            CellPos::new(0, 1),
            CellPos::new(1, 0),
            CellPos::new(1, 1)
        ]
    );
    assert_eq!(
        grid.navigate(CellPos::new(1, 1), NavKey::ShiftEnter),
        Some(CellPos::new(0, 1))
    );
}

#[test]
fn test_session_round_trip_through_store() {
    let mut store = MemoryStore::new();
    let mut session = EditSession::open(&store, TableId(11)).unwrap();
    assert!(matches!(
        session.grid_mut().add_row(),
        Err(DataTableError::NoColumns)
    ));

    session.import_csv("Name,Age\nAnn,30\nBob,41").unwrap();
    session.grid_mut().set_cell(1, "age", "42");
    session.save_to(&mut store).unwrap();
    assert!(!session.is_dirty());

    let reopened = EditSession::open(&store, TableId(11)).unwrap();
    assert_eq!(reopened.grid().snapshot(), session.grid().snapshot());
    assert_eq!(store.load(TableId(11)).unwrap().rows[1].get("age"), "42");
}

#[test]
fn test_save_failure_keeps_dirty_and_allows_retry() {
    struct Rejecting;
    impl TableStore for Rejecting {
        fn load(&self, id: TableId) -> datatable::Result<datatable::Table> {
            Err(DataTableError::NotFound(id))
        }
        fn save(&mut self, _: TableId, _: &datatable::TableSnapshot) -> datatable::Result<()> {
            Err(DataTableError::Failure("read-only".into()))
        }
    }

    let mut session = EditSession::new(TableId(1));
    session.grid_mut().add_column("a", "A", ColumnType::Text).unwrap();
    let err = session.save_to(&mut Rejecting).unwrap_err();
    assert!(matches!(err, DataTableError::Failure(reason) if reason == "read-only"));
    assert!(session.is_dirty());
    assert!(!session.is_saving());

    let mut store = MemoryStore::new();
    session.save_to(&mut store).unwrap();
    assert!(!session.is_dirty());
}

#[test]
fn test_failed_import_keeps_previous_grid() {
    let mut session = EditSession::new(TableId(1));
    session.import_html("<table><tr><th>X</th></tr><tr><td>1</td></tr></table>")
        .unwrap();
    let before = session.grid().snapshot();
    assert!(session.import_html("<table><tr><td>1</td></tr></table>").is_err());
    assert!(session.import_csv("").is_err());
    assert_eq!(session.grid().snapshot(), before);
}
