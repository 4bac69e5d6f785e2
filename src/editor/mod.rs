//! Table editing.
//!
//! [`EditSession`] owns the [`GridModel`] of one table for as long as its
//! editor is open, plus the state of the (single) outstanding save:
//! - structural edits and cell edits via [`EditSession::grid_mut`]
//! - CSV/HTML imports that replace the grid wholesale
//! - the save lifecycle (`begin_save` / `finish_save`)
//!
//! On wasm32 the session is exposed to JavaScript as [`TableEditor`].

pub mod grid;
pub mod navigation;
pub mod selection;

pub use grid::GridModel;
pub use navigation::{next_cell, CellPos, NavKey};
pub use selection::RowSelection;

use crate::error::{DataTableError, Result};
use crate::persistence::TableStore;
use crate::types::{ImportedTable, TableId, TableSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum SaveState {
    #[default]
    Idle,
    /// Snapshot taken at this grid revision is being persisted
    InFlight { revision: u64 },
}

/// Editing state for one table.
#[derive(Debug, Clone)]
pub struct EditSession {
    table_id: TableId,
    grid: GridModel,
    save: SaveState,
}

impl EditSession {
    /// A session over an empty grid.
    pub fn new(table_id: TableId) -> Self {
        Self::with_grid(table_id, GridModel::new())
    }

    pub fn with_grid(table_id: TableId, grid: GridModel) -> Self {
        Self {
            table_id,
            grid,
            save: SaveState::Idle,
        }
    }

    /// Open the editor for a stored table. A table that has never been saved
    /// opens empty.
    ///
    /// # Errors
    /// Any store error other than [`DataTableError::NotFound`].
    pub fn open(store: &impl TableStore, table_id: TableId) -> Result<Self> {
        match store.load(table_id) {
            Ok(table) => Ok(Self::with_grid(table_id, GridModel::from_table(table))),
            Err(DataTableError::NotFound(_)) => Ok(Self::new(table_id)),
            Err(e) => Err(e),
        }
    }

    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut GridModel {
        &mut self.grid
    }

    pub fn is_dirty(&self) -> bool {
        self.grid.is_dirty()
    }

    /// Whether a save is outstanding (the save button should be disabled).
    pub fn is_saving(&self) -> bool {
        matches!(self.save, SaveState::InFlight { .. })
    }

    /// Start a save: take a snapshot and mark the save as in flight.
    ///
    /// # Errors
    /// [`DataTableError::SaveInFlight`] when a previous save has not finished.
    pub fn begin_save(&mut self) -> Result<TableSnapshot> {
        if self.is_saving() {
            tracing::warn!(table = %self.table_id, "save rejected: already in flight");
            return Err(DataTableError::SaveInFlight);
        }
        self.save = SaveState::InFlight {
            revision: self.grid.revision(),
        };
        Ok(self.grid.snapshot())
    }

    /// Complete the outstanding save with the store's answer.
    ///
    /// On success the dirty flag is cleared, unless the grid was edited after
    /// the snapshot was taken. On failure the grid stays dirty. The store's
    /// result is returned unchanged.
    pub fn finish_save(&mut self, result: Result<()>) -> Result<()> {
        let SaveState::InFlight { revision } = std::mem::take(&mut self.save) else {
            tracing::debug!(table = %self.table_id, "finish_save without a save in flight");
            return result;
        };
        match &result {
            Ok(()) if revision == self.grid.revision() => self.grid.mark_clean(),
            Ok(()) => {
                tracing::debug!(table = %self.table_id, "saved, but edited since snapshot");
            }
            Err(e) => tracing::warn!(table = %self.table_id, error = %e, "save failed"),
        }
        result
    }

    /// Run a complete save against `store`.
    pub fn save_to(&mut self, store: &mut impl TableStore) -> Result<()> {
        let snapshot = self.begin_save()?;
        let result = store.save(self.table_id, &snapshot);
        self.finish_save(result)
    }

    /// Replace the grid's schema and rows with an import result. Returns the
    /// import summary line.
    pub fn replace_with(&mut self, imported: ImportedTable) -> String {
        let summary = imported.summary();
        self.grid.replace(imported);
        summary
    }

    /// Import CSV text, replacing the grid. The grid is untouched on error.
    pub fn import_csv(&mut self, text: &str) -> Result<String> {
        let imported = crate::csv::import_csv(text)?;
        Ok(self.replace_with(imported))
    }

    /// Import the first table of an HTML fragment, replacing the grid. The
    /// grid is untouched on error.
    pub fn import_html(&mut self, html: &str) -> Result<String> {
        let imported = crate::html_import::import_html(html)?;
        Ok(self.replace_with(imported))
    }
}

// ============================================================================
// WASM32 bindings
// ============================================================================

#[cfg(target_arch = "wasm32")]
pub use bindings::TableEditor;

#[cfg(target_arch = "wasm32")]
mod bindings {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;

    use super::EditSession;
    use crate::error::DataTableError;
    use crate::types::{ColumnPatch, ColumnType, Table, TableId};

    /// Editor handle exported to JavaScript.
    ///
    /// The session sits behind `Rc<RefCell<..>>` so an async save can hold on
    /// to it across the await.
    #[wasm_bindgen]
    pub struct TableEditor {
        session: Rc<RefCell<EditSession>>,
    }

    #[wasm_bindgen]
    impl TableEditor {
        #[wasm_bindgen(constructor)]
        pub fn new(table_id: u32) -> TableEditor {
            console_error_panic_hook::set_once();
            TableEditor {
                session: Rc::new(RefCell::new(EditSession::new(TableId(u64::from(table_id))))),
            }
        }

        /// Load a stored table (`{columns, rows, options}`).
        #[wasm_bindgen]
        pub fn load(&mut self, table: JsValue) -> Result<(), JsValue> {
            let table: Table = serde_wasm_bindgen::from_value(table)?;
            let mut session = self.session.borrow_mut();
            let id = session.table_id();
            *session = EditSession::with_grid(id, super::GridModel::from_table(table));
            Ok(())
        }

        /// Current `{columns, rows}`.
        #[wasm_bindgen]
        pub fn snapshot(&self) -> Result<JsValue, JsValue> {
            let snapshot = self.session.borrow().grid().snapshot();
            Ok(serde_wasm_bindgen::to_value(&snapshot)?)
        }

        #[wasm_bindgen]
        pub fn set_cell(&mut self, row: usize, key: &str, value: &str) {
            self.session.borrow_mut().grid_mut().set_cell(row, key, value);
        }

        #[wasm_bindgen]
        pub fn add_row(&mut self) -> Result<usize, JsValue> {
            Ok(self.session.borrow_mut().grid_mut().add_row()?)
        }

        #[wasm_bindgen]
        pub fn insert_row(&mut self, index: usize) -> usize {
            self.session.borrow_mut().grid_mut().insert_row(index)
        }

        #[wasm_bindgen]
        pub fn duplicate_row(&mut self, index: usize) -> Result<usize, JsValue> {
            Ok(self.session.borrow_mut().grid_mut().duplicate_row(index)?)
        }

        #[wasm_bindgen]
        pub fn delete_row(&mut self, index: usize) -> Result<(), JsValue> {
            Ok(self.session.borrow_mut().grid_mut().delete_row(index)?)
        }

        #[wasm_bindgen]
        pub fn toggle_row(&mut self, index: usize) -> bool {
            self.session.borrow_mut().grid_mut().toggle_row(index)
        }

        #[wasm_bindgen]
        pub fn select_all(&mut self, selected: bool) {
            self.session.borrow_mut().grid_mut().select_all(selected);
        }

        #[wasm_bindgen]
        pub fn selected_rows(&self) -> Vec<usize> {
            self.session.borrow().grid().selected_rows()
        }

        #[wasm_bindgen]
        pub fn delete_selected(&mut self) -> usize {
            self.session.borrow_mut().grid_mut().delete_selected()
        }

        #[wasm_bindgen]
        pub fn add_column(&mut self, key: &str, label: &str, col_type: &str) -> Result<(), JsValue> {
            let col_type: ColumnType = col_type.parse().unwrap_or_default();
            Ok(self
                .session
                .borrow_mut()
                .grid_mut()
                .add_column(key, label, col_type)?)
        }

        #[wasm_bindgen]
        pub fn delete_column(&mut self, key: &str) -> Result<(), JsValue> {
            self.session.borrow_mut().grid_mut().delete_column(key)?;
            Ok(())
        }

        /// Apply a `{label?, type?, align?, width?}` patch.
        #[wasm_bindgen]
        pub fn update_column(&mut self, key: &str, patch: JsValue) -> Result<(), JsValue> {
            let patch: ColumnPatch = serde_wasm_bindgen::from_value(patch)?;
            Ok(self.session.borrow_mut().grid_mut().update_column(key, patch)?)
        }

        /// Import CSV, replacing the grid. Returns the summary line.
        #[wasm_bindgen]
        pub fn import_csv(&mut self, text: &str) -> Result<String, JsValue> {
            Ok(self.session.borrow_mut().import_csv(text)?)
        }

        /// Import an HTML table, replacing the grid. Returns the summary line.
        #[wasm_bindgen]
        pub fn import_html(&mut self, html: &str) -> Result<String, JsValue> {
            Ok(self.session.borrow_mut().import_html(html)?)
        }

        #[wasm_bindgen]
        pub fn is_dirty(&self) -> bool {
            self.session.borrow().is_dirty()
        }

        #[wasm_bindgen]
        pub fn is_saving(&self) -> bool {
            self.session.borrow().is_saving()
        }

        /// Persist the current snapshot through `persist(tableId, snapshot)`,
        /// which may return a Promise. Rejects with "A save is already in
        /// progress" while an earlier save is outstanding.
        #[wasm_bindgen]
        pub fn save(&self, persist: js_sys::Function) -> js_sys::Promise {
            let session = Rc::clone(&self.session);
            wasm_bindgen_futures::future_to_promise(async move {
                let (id, snapshot) = {
                    let mut s = session.borrow_mut();
                    let snapshot = s.begin_save()?;
                    (s.table_id(), snapshot)
                };
                let outcome = match serde_wasm_bindgen::to_value(&snapshot) {
                    Ok(payload) => {
                        let id = JsValue::from_f64(id.0 as f64);
                        match persist.call2(&JsValue::NULL, &id, &payload) {
                            Ok(ret) => JsFuture::from(js_sys::Promise::resolve(&ret))
                                .await
                                .map(|_| ()),
                            Err(e) => Err(e),
                        }
                    }
                    Err(e) => Err(e.into()),
                };
                let result = outcome.map_err(|e| {
                    DataTableError::Failure(e.as_string().unwrap_or_else(|| "save rejected".into()))
                });
                session.borrow_mut().finish_save(result)?;
                Ok(JsValue::TRUE)
            })
        }
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
    use crate::persistence::MemoryStore;
    use crate::types::{Column, Row, Table};

    fn session() -> EditSession {
        let grid = GridModel::from_parts(
            vec![Column::text("name", "Name")],
            vec![[("name", "Ann")].into_iter().collect::<Row>()],
        );
        EditSession::with_grid(TableId(1), grid)
    }

    #[test]
    fn test_second_save_rejected_while_in_flight() {
        let mut s = session();
        s.grid_mut().set_cell(0, "name", "Bob");
        s.begin_save().unwrap();
        assert!(s.is_saving());
        assert!(matches!(s.begin_save(), Err(DataTableError::SaveInFlight)));
        s.finish_save(Ok(())).unwrap();
        assert!(!s.is_saving());
        assert!(!s.is_dirty());
    }

    #[test]
    fn test_failed_save_keeps_dirty() {
        let mut s = session();
        s.grid_mut().set_cell(0, "name", "Bob");
        s.begin_save().unwrap();
        let result = s.finish_save(Err(DataTableError::Failure("disk full".into())));
        assert!(matches!(result, Err(DataTableError::Failure(_))));
        assert!(s.is_dirty());
        assert!(!s.is_saving());
    }

    #[test]
    fn test_edit_during_save_stays_dirty() {
        let mut s = session();
        s.grid_mut().set_cell(0, "name", "Bob");
        let snap = s.begin_save().unwrap();
        s.grid_mut().set_cell(0, "name", "Cy");
        s.finish_save(Ok(())).unwrap();
        assert!(s.is_dirty());
        assert_eq!(snap.rows[0].get("name"), "Bob");
    }

    #[test]
    fn test_save_to_store() {
        let mut store = MemoryStore::new();
        let mut s = session();
        s.grid_mut().add_row().unwrap();
        s.save_to(&mut store).unwrap();
        assert!(!s.is_dirty());
        assert_eq!(store.row_count(TableId(1)).unwrap(), 2);
    }

    #[test]
    fn test_open_missing_table_is_empty() {
        let store = MemoryStore::new();
        let s = EditSession::open(&store, TableId(9)).unwrap();
        assert_eq!(s.grid().column_count(), 0);
        assert!(!s.is_dirty());
    }

    #[test]
    fn test_open_loads_stored_table() {
        let mut store = MemoryStore::new();
        store.insert(TableId(2), Table::new(vec![Column::text("a", "A")], vec![]));
        let s = EditSession::open(&store, TableId(2)).unwrap();
        assert_eq!(s.grid().columns()[0].key, "a");
    }

    #[test]
    fn test_import_replaces_and_failure_leaves_grid() {
        let mut s = session();
        let summary = s.import_csv("City,Pop\nOslo,700000\nRome,2800000").unwrap();
        assert_eq!(summary, "Imported 2 columns and 2 rows");
        assert_eq!(s.grid().columns()[0].key, "city");
        assert!(s.is_dirty());

        let before = s.grid().snapshot();
        assert!(matches!(
            s.import_html("<p>nothing</p>"),
            Err(DataTableError::NoTableFound)
        ));
        assert!(matches!(s.import_csv("only header"), Err(DataTableError::EmptyInput)));
        assert_eq!(s.grid().snapshot(), before);
    }
}
