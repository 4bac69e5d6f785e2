//! datatable - tabular data engine for the web
//!
//! Defines, edits and displays simple data tables, natively or in the browser
//! via WebAssembly:
//! - CSV and HTML table import with schema inference
//! - An editable grid model (rows, columns, selection, save lifecycle)
//! - Type-driven value formatting (number, currency, percent, link, image, html)
//! - Static table rendering plus client-side sort and debounced search
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { TableEditor, TableViewer } from 'datatable';
//! await init();
//! const editor = new TableEditor(42);
//! editor.import_csv(text);
//! await editor.save((id, snapshot) => fetch(`/tables/${id}`, { method: 'PUT', body: JSON.stringify(snapshot) }));
//!
//! const viewer = new TableViewer(table, 42, 'wide');
//! container.innerHTML = viewer.html();
//! ```

// Import
pub mod csv;
pub mod html_import;
pub mod slug;
pub mod xml_helpers;

// Formatting
pub mod formatter;
pub mod hyperlinks;
pub mod markup;
pub mod numfmt;
pub mod sanitize;

// Model, rendering and interaction
pub mod editor;
pub mod error;
pub mod persistence;
pub mod render;
pub mod types;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use csv::import_csv;
pub use editor::{EditSession, GridModel};
pub use error::{DataTableError, Result};
pub use formatter::{format_value, FormattedValue};
pub use html_import::import_html;
pub use persistence::{JsonFileStore, MemoryStore, TableStore};
pub use render::{render_directive, render_table, RenderedTable};
pub use slug::{slugify, suggest_key};
pub use viewer::TableView;

#[cfg(target_arch = "wasm32")]
pub use editor::TableEditor;
#[cfg(target_arch = "wasm32")]
pub use viewer::TableViewer;

pub use types::*;

/// Import CSV text and return `{columns, rows}` as a `JsValue`.
///
/// # Errors
/// Returns the error message if the text has no header plus data row.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn import_csv_table(text: &str) -> std::result::Result<JsValue, JsValue> {
    let imported = csv::import_csv(text)?;
    Ok(serde_wasm_bindgen::to_value(&imported)?)
}

/// Import the first table of an HTML fragment and return `{columns, rows}`.
///
/// # Errors
/// Returns the error message if no usable table is found.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn import_html_table(html: &str) -> std::result::Result<JsValue, JsValue> {
    let imported = html_import::import_html(html)?;
    Ok(serde_wasm_bindgen::to_value(&imported)?)
}

/// Render a stored table (`{columns, rows, options}`) to markup.
///
/// # Errors
/// Returns an error if `table` is not a valid table object.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn render_table_html(
    table: JsValue,
    table_id: u32,
    class: Option<String>,
) -> std::result::Result<String, JsValue> {
    let table: Table = serde_wasm_bindgen::from_value(table)?;
    let rendered = render::render_table(
        &table.columns,
        &table.rows,
        &table.options,
        TableId(u64::from(table_id)),
        class.as_deref(),
    );
    Ok(rendered.to_html())
}

/// Format one value for a column type name (unknown names format as text).
#[must_use]
#[wasm_bindgen]
pub fn format_cell(value: &str, col_type: &str) -> String {
    let col_type: ColumnType = col_type.parse().unwrap_or_default();
    formatter::format_html(value, col_type)
}

/// Suggested key for a manually added column.
#[must_use]
#[wasm_bindgen]
pub fn suggest_column_key(label: &str) -> String {
    slug::suggest_key(label)
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
