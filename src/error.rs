//! Structured error types for datatable.
//!
//! Every import, mutation and persistence failure is reported through
//! [`DataTableError`]. None of them leave partially-applied state behind.

use crate::types::TableId;

/// All errors that can occur while importing, editing or persisting a table.
#[derive(Debug, thiserror::Error)]
pub enum DataTableError {
    /// CSV import had fewer than two usable lines (header + one data row).
    #[error("CSV must have at least a header row and one data row")]
    EmptyInput,

    /// HTML import found no `<table>` element.
    #[error("No table found in HTML")]
    NoTableFound,

    /// HTML import found a table without a header row or without data rows.
    #[error("Could not parse table structure")]
    NoHeaderOrData,

    /// A column with this key already exists.
    #[error("Column key already exists: {0}")]
    DuplicateKey(String),

    /// Rows cannot be added before any column is defined.
    #[error("Define columns before adding rows")]
    NoColumns,

    /// Row index outside the current row range.
    #[error("Row index {index} out of bounds (len {len})")]
    RowOutOfBounds { index: usize, len: usize },

    /// No column with this key exists.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Persistence lookup miss.
    #[error("Table {0} not found")]
    NotFound(TableId),

    /// Persistence write rejected.
    #[error("Save failed: {0}")]
    Failure(String),

    /// A save is already outstanding for this edit session.
    #[error("A save is already in progress")]
    SaveInFlight,

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DataTableError>;

#[cfg(target_arch = "wasm32")]
impl From<DataTableError> for wasm_bindgen::JsValue {
    fn from(e: DataTableError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
