//! Render Engine.
//!
//! [`render_table`] projects a schema + rows + display options into a
//! [`RenderedTable`]: header cells, one formatted cell per column per row,
//! and the composed class list. The structure is what the interaction layer
//! sorts and filters; [`RenderedTable::to_html`] writes it out as markup.
//!
//! Rendering never fails and never touches its input. Missing row values
//! render as empty cells; values that don't fit their column type fall back
//! to escaped text.

pub(crate) mod html;

pub use html::no_results_html;

use serde::Serialize;

use crate::formatter::format_value;
use crate::markup::sanitize_html_class;
use crate::persistence::TableStore;
use crate::types::{Align, Column, DisplayOptions, Row, TableId};

/// CSS class prefix shared by every element the renderer emits.
pub const CLASS_PREFIX: &str = "dt-";

/// Placeholder text of the search box.
pub const SEARCH_PLACEHOLDER: &str = "Search table...";

/// Returned by [`render_directive`] for an unknown table.
pub const INVALID_ID_COMMENT: &str = "<!-- Data Table: Invalid ID -->";

/// Returned by [`render_directive`] for a table with an empty schema.
pub const NO_COLUMNS_COMMENT: &str = "<!-- Data Table: No columns defined -->";

/// One header cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    pub align: Align,
    /// Width hint, if the column has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
}

/// One body cell: formatted markup plus its visible text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedCell {
    pub html: String,
    pub text: String,
    pub align: Align,
}

/// One body row, cells in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRow {
    pub cells: Vec<RenderedCell>,
}

impl RenderedRow {
    /// Visible text of the whole row (cell texts back to back).
    pub fn text(&self) -> String {
        self.cells.iter().map(|c| c.text.as_str()).collect()
    }

    /// Visible text of one cell, trimmed; `""` past the last cell.
    pub fn cell_text(&self, col: usize) -> &str {
        self.cells.get(col).map_or("", |c| c.text.trim())
    }
}

/// Static table structure produced by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedTable {
    pub table_id: TableId,
    /// Table-level classes, in order
    pub classes: Vec<String>,
    pub responsive: bool,
    pub searchable: bool,
    pub sortable: bool,
    /// Header cells; `None` when the header row is disabled
    pub header: Option<Vec<HeaderCell>>,
    pub rows: Vec<RenderedRow>,
    /// Number of schema columns
    pub column_count: usize,
}

impl RenderedTable {
    /// The `class` attribute value.
    pub fn class_attr(&self) -> String {
        self.classes.join(" ")
    }
}

fn class(name: &str) -> String {
    format!("{CLASS_PREFIX}{name}")
}

fn table_classes(options: &DisplayOptions, extra_class: Option<&str>) -> Vec<String> {
    let mut classes = vec![class("table")];
    let flags = [
        (options.striped, "striped"),
        (options.hover, "hover"),
        (options.sortable, "sortable"),
        (options.searchable, "searchable"),
    ];
    classes.extend(flags.iter().filter(|(on, _)| *on).map(|(_, name)| class(name)));
    for custom in [Some(options.custom_class.as_str()), extra_class]
        .into_iter()
        .flatten()
    {
        let sanitized = sanitize_html_class(custom);
        if !sanitized.is_empty() {
            classes.push(sanitized);
        }
    }
    classes
}

/// Render schema + rows with the given display options.
///
/// `extra_class` is the caller-supplied override class (sanitized like the
/// table's own custom class).
pub fn render_table(
    columns: &[Column],
    rows: &[Row],
    options: &DisplayOptions,
    table_id: TableId,
    extra_class: Option<&str>,
) -> RenderedTable {
    let header = options.has_header.then(|| {
        columns
            .iter()
            .map(|c| HeaderCell {
                key: c.key.clone(),
                label: c.label.clone(),
                align: c.align,
                width: c.width_hint().map(str::to_string),
            })
            .collect()
    });

    let rows = rows
        .iter()
        .map(|row| RenderedRow {
            cells: columns
                .iter()
                .map(|c| {
                    let formatted = format_value(row.get(&c.key), c.col_type);
                    RenderedCell {
                        html: formatted.html,
                        text: formatted.text,
                        align: c.align,
                    }
                })
                .collect(),
        })
        .collect();

    RenderedTable {
        table_id,
        classes: table_classes(options, extra_class),
        responsive: options.responsive,
        searchable: options.searchable,
        sortable: options.sortable,
        header,
        rows,
        column_count: columns.len(),
    }
}

/// Resolve an embedded table reference to markup.
///
/// Unknown tables and tables without columns render as an HTML comment
/// instead of failing.
pub fn render_directive(store: &impl TableStore, id: TableId, class: Option<&str>) -> String {
    let table = match store.load(id) {
        Ok(table) => table,
        Err(e) => {
            tracing::debug!(%id, error = %e, "render directive: table unavailable");
            return INVALID_ID_COMMENT.to_string();
        }
    };
    if table.columns.is_empty() {
        return NO_COLUMNS_COMMENT.to_string();
    }
    render_table(&table.columns, &table.rows, &table.options, id, class).to_html()
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
    use crate::types::{ColumnType, Table};

    fn columns() -> Vec<Column> {
        vec![
            Column::text("name", "Name"),
            Column {
                align: Align::Right,
                width: "80px".into(),
                ..Column::new("price", "Price", ColumnType::Currency)
            },
        ]
    }

    fn rows() -> Vec<Row> {
        vec![
            [("name", "Widget"), ("price", "1234.5")].into_iter().collect(),
            [("name", "Gadget")].into_iter().collect(),
        ]
    }

    #[test]
    fn test_cells_are_formatted_in_column_order() {
        let t = render_table(&columns(), &rows(), &DisplayOptions::default(), TableId(1), None);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0].cells[1].html, "$1,234.50");
        assert_eq!(t.rows[0].cells[1].align, Align::Right);
        // Missing value renders empty.
        assert_eq!(t.rows[1].cells[1].html, "");
        assert_eq!(t.rows[0].text(), "Widget$1,234.50");
    }

    #[test]
    fn test_header_toggle_and_width() {
        let t = render_table(&columns(), &rows(), &DisplayOptions::default(), TableId(1), None);
        let header = t.header.unwrap();
        assert_eq!(header[1].width.as_deref(), Some("80px"));
        assert!(header[0].width.is_none());

        let options = DisplayOptions {
            has_header: false,
            ..Default::default()
        };
        let t = render_table(&columns(), &rows(), &options, TableId(1), None);
        assert!(t.header.is_none());
    }

    #[test]
    fn test_class_composition() {
        let options = DisplayOptions {
            striped: false,
            sortable: true,
            searchable: true,
            custom_class: "my table!".into(),
            ..Default::default()
        };
        let t = render_table(&columns(), &[], &options, TableId(1), Some("extra"));
        assert_eq!(
            t.class_attr(),
            "dt-table dt-hover dt-sortable dt-searchable mytable extra"
        );
    }

    #[test]
    fn test_empty_custom_class_skipped() {
        let options = DisplayOptions {
            custom_class: "!!!".into(),
            ..Default::default()
        };
        let t = render_table(&columns(), &[], &options, TableId(1), Some(""));
        assert_eq!(t.class_attr(), "dt-table dt-striped dt-hover");
    }

    #[test]
    fn test_render_does_not_mutate_rows() {
        let rows = rows();
        let before = rows.clone();
        let _ = render_table(&columns(), &rows, &DisplayOptions::default(), TableId(1), None);
        assert_eq!(rows, before);
    }

    #[test]
    fn test_directive_fallbacks() {
        let mut store = MemoryStore::new();
        assert_eq!(render_directive(&store, TableId(1), None), INVALID_ID_COMMENT);
        store.insert(TableId(1), Table::default());
        assert_eq!(render_directive(&store, TableId(1), None), NO_COLUMNS_COMMENT);
        store.insert(TableId(2), Table::new(columns(), rows()));
        let html = render_directive(&store, TableId(2), Some("wide"));
        assert!(html.contains(r#"data-table-id="2""#));
        assert!(html.contains("wide"));
    }
}
