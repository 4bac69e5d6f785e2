//! Table storage.
//!
//! The engine only needs `load` and `save` keyed by [`TableId`]; where the
//! data lives is up to the [`TableStore`] implementation. Two are provided:
//! [`MemoryStore`] for tests and embedding, and [`JsonFileStore`] which keeps
//! one JSON document per table in a directory.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{DataTableError, Result};
use crate::types::{Table, TableId, TableSnapshot};

/// Save/load of schema + rows keyed by table id.
///
/// `save` must be idempotent for identical input, and `load` must return
/// exactly what the last successful `save` stored.
pub trait TableStore {
    /// Load a table.
    ///
    /// # Errors
    /// [`DataTableError::NotFound`] when no table has this id.
    fn load(&self, id: TableId) -> Result<Table>;

    /// Store schema and rows. Display options already stored for `id` are
    /// kept; a new table gets the defaults.
    ///
    /// # Errors
    /// [`DataTableError::Failure`] with the reason when the write is
    /// rejected.
    fn save(&mut self, id: TableId, snapshot: &TableSnapshot) -> Result<()>;

    /// Number of stored rows, for listing screens.
    fn row_count(&self, id: TableId) -> Result<usize> {
        Ok(self.load(id)?.rows.len())
    }
}

fn merge(existing: Option<Table>, snapshot: &TableSnapshot) -> Table {
    let options = existing.map(|t| t.options).unwrap_or_default();
    Table {
        columns: snapshot.columns.clone(),
        rows: snapshot.rows.clone(),
        options,
    }
}

/// In-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: HashMap<TableId, Table>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a complete table (including display options) into the store.
    pub fn insert(&mut self, id: TableId, table: Table) {
        self.tables.insert(id, table);
    }

    pub fn contains(&self, id: TableId) -> bool {
        self.tables.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl TableStore for MemoryStore {
    fn load(&self, id: TableId) -> Result<Table> {
        self.tables
            .get(&id)
            .cloned()
            .ok_or(DataTableError::NotFound(id))
    }

    fn save(&mut self, id: TableId, snapshot: &TableSnapshot) -> Result<()> {
        let table = merge(self.tables.remove(&id), snapshot);
        self.tables.insert(id, table);
        Ok(())
    }
}

/// Directory of `<id>.json` files, one per table.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// A store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: TableId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// Write a complete table, display options included.
    pub fn put(&self, id: TableId, table: &Table) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(table)?;
        fs::write(self.path_for(id), json)?;
        Ok(())
    }

    fn read(&self, id: TableId) -> Result<Option<Table>> {
        match fs::read_to_string(self.path_for(id)) {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl TableStore for JsonFileStore {
    fn load(&self, id: TableId) -> Result<Table> {
        self.read(id)?.ok_or(DataTableError::NotFound(id))
    }

    fn save(&mut self, id: TableId, snapshot: &TableSnapshot) -> Result<()> {
        // An unreadable existing file only costs its display options.
        let existing = self.read(id).unwrap_or_else(|e| {
            tracing::warn!(%id, error = %e, "existing table unreadable, using default options");
            None
        });
        let table = merge(existing, snapshot);
        self.put(id, &table).map_err(|e| {
            tracing::warn!(%id, error = %e, "table save failed");
            DataTableError::Failure(e.to_string())
        })?;
        tracing::debug!(%id, rows = table.rows.len(), "table saved");
        Ok(())
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
    use crate::types::{Column, DisplayOptions, Row};

    fn snapshot(value: &str) -> TableSnapshot {
        TableSnapshot {
            columns: vec![Column::text("name", "Name")],
            rows: vec![[("name", value)].into_iter().collect::<Row>()],
        }
    }

    #[test]
    fn test_memory_missing_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.load(TableId(3)),
            Err(DataTableError::NotFound(TableId(3)))
        ));
    }

    #[test]
    fn test_memory_save_keeps_options() {
        let mut store = MemoryStore::new();
        let options = DisplayOptions {
            sortable: true,
            ..Default::default()
        };
        store.insert(TableId(1), Table::default().with_options(options.clone()));
        store.save(TableId(1), &snapshot("Ann")).unwrap();
        let table = store.load(TableId(1)).unwrap();
        assert_eq!(table.options, options);
        assert_eq!(table.rows[0].get("name"), "Ann");
        assert_eq!(store.row_count(TableId(1)).unwrap(), 1);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("tables"));
        assert!(matches!(
            store.load(TableId(7)),
            Err(DataTableError::NotFound(_))
        ));
        store.save(TableId(7), &snapshot("Bob")).unwrap();
        store.save(TableId(7), &snapshot("Bob")).unwrap();
        let table = store.load(TableId(7)).unwrap();
        assert_eq!(table.columns, snapshot("Bob").columns);
        assert_eq!(table.rows, snapshot("Bob").rows);
        assert_eq!(table.options, DisplayOptions::default());
    }

    #[test]
    fn test_file_store_corrupt_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("1.json"), "{not json").unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(matches!(store.load(TableId(1)), Err(DataTableError::Json(_))));
    }

    #[test]
    fn test_file_store_overwrites_corrupt_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("1.json"), "{not json").unwrap();
        let mut store = JsonFileStore::new(dir.path());
        store.save(TableId(1), &snapshot("Cy")).unwrap();
        let table = store.load(TableId(1)).unwrap();
        assert_eq!(table.rows[0].get("name"), "Cy");
        assert_eq!(table.options, DisplayOptions::default());
    }

    #[test]
    fn test_file_store_rejected_write_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let mut store = JsonFileStore::new(blocker.join("tables"));
        let err = store.save(TableId(1), &snapshot("Ann")).unwrap_err();
        assert!(matches!(err, DataTableError::Failure(reason) if !reason.is_empty()));
    }
}
