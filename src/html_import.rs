//! HTML table importer.
//!
//! Scans the first `<table>` of a pasted fragment and builds a schema from
//! its header cells and rows from its data cells. Markup inside cells is
//! discarded; only text content is kept.
//!
//! # Header precedence
//! 1. `<th>` cells inside `<thead>` (all of them, in order).
//! 2. Otherwise the first `<tr>` that has any `<th>` cell; that row is not
//!    used as data.
//!
//! Every other `<tr>` with at least one `<td>` becomes a data row made of its
//! `<td>` cells.

use quick_xml::events::Event;

use crate::error::{DataTableError, Result};
use crate::slug::keys_for_labels;
use crate::types::{Column, ImportedTable, Row};
use crate::xml_helpers::{decode_text, escape_stray_lt, html_reader, start_name, tag_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Header,
    Data,
}

/// One `<tr>` as scanned.
#[derive(Debug, Default)]
struct RawRow {
    in_thead: bool,
    headers: Vec<String>,
    data: Vec<String>,
}

/// Scanner state for the first table.
#[derive(Debug, Default)]
struct TableScan {
    found: bool,
    /// Nesting depth of `<table>` elements inside the first table
    nested: usize,
    in_thead: bool,
    row: Option<RawRow>,
    cell: Option<(CellKind, String)>,
    rows: Vec<RawRow>,
}

impl TableScan {
    fn close_cell(&mut self) {
        let Some((kind, text)) = self.cell.take() else {
            return;
        };
        let row = self.row.get_or_insert_with(|| RawRow {
            in_thead: self.in_thead,
            ..RawRow::default()
        });
        let text = text.trim().to_string();
        match kind {
            CellKind::Header => row.headers.push(text),
            CellKind::Data => row.data.push(text),
        }
    }

    fn close_row(&mut self) {
        self.close_cell();
        if let Some(row) = self.row.take() {
            self.rows.push(row);
        }
    }

    fn open_row(&mut self) {
        self.close_row();
        self.row = Some(RawRow {
            in_thead: self.in_thead,
            ..RawRow::default()
        });
    }

    fn open_cell(&mut self, kind: CellKind) {
        self.close_cell();
        self.cell = Some((kind, String::new()));
    }

    fn push_text(&mut self, text: &str) {
        if self.nested > 0 {
            return;
        }
        if let Some((_, buf)) = self.cell.as_mut() {
            buf.push_str(text);
        }
    }

    /// Handle an opening tag inside the first table.
    fn start(&mut self, name: &str) {
        if self.nested > 0 {
            if name == "table" {
                self.nested += 1;
            }
            return;
        }
        match name {
            "table" => self.nested += 1,
            "thead" => {
                self.close_row();
                self.in_thead = true;
            }
            "tbody" | "tfoot" => {
                self.close_row();
                self.in_thead = false;
            }
            "tr" => self.open_row(),
            "th" => self.open_cell(CellKind::Header),
            "td" => self.open_cell(CellKind::Data),
            _ => {}
        }
    }

    /// Handle a closing tag. Returns `true` once the first table has ended.
    fn end(&mut self, name: &str) -> bool {
        if self.nested > 0 {
            if name == "table" {
                self.nested -= 1;
            }
            return false;
        }
        match name {
            "table" => {
                self.close_row();
                return true;
            }
            "thead" => {
                self.close_row();
                self.in_thead = false;
            }
            "tbody" | "tfoot" | "tr" => self.close_row(),
            "th" | "td" => self.close_cell(),
            _ => {}
        }
        false
    }
}

fn scan_first_table(html: &str) -> TableScan {
    let prepared = escape_stray_lt(html);
    let mut reader = html_reader(&prepared);
    let mut scan = TableScan::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = start_name(&e);
                if !scan.found {
                    scan.found = name == "table";
                    continue;
                }
                scan.start(&name);
            }
            Ok(Event::Empty(e)) => {
                let name = start_name(&e);
                if !scan.found {
                    if name == "table" {
                        // <table/>: a table with no rows
                        scan.found = true;
                        break;
                    }
                    continue;
                }
                scan.start(&name);
                if scan.end(&name) {
                    break;
                }
            }
            Ok(Event::End(e)) => {
                if scan.found && scan.end(&tag_name(e.local_name().as_ref())) {
                    break;
                }
            }
            Ok(Event::Text(e)) => {
                if scan.found {
                    scan.push_text(&decode_text(&e));
                }
            }
            Ok(Event::CData(e)) => {
                if scan.found {
                    scan.push_text(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                tracing::debug!(error = %err, "html import stopped on malformed markup");
                break;
            }
            _ => {}
        }
    }
    if scan.found {
        scan.close_row();
    }
    scan
}

/// Import the first `<table>` of an HTML fragment.
///
/// # Errors
/// - [`DataTableError::NoTableFound`] when there is no `<table>` element.
/// - [`DataTableError::NoHeaderOrData`] when no header row can be found or
///   no data row remains.
pub fn import_html(html: &str) -> Result<ImportedTable> {
    let scan = scan_first_table(html);
    if !scan.found {
        tracing::warn!("html import rejected: no <table> element");
        return Err(DataTableError::NoTableFound);
    }

    let thead_labels: Vec<String> = scan
        .rows
        .iter()
        .filter(|r| r.in_thead)
        .flat_map(|r| r.headers.iter().cloned())
        .collect();

    let (labels, header_row) = if thead_labels.is_empty() {
        match scan.rows.iter().position(|r| !r.headers.is_empty()) {
            Some(idx) => (
                scan.rows
                    .get(idx)
                    .map(|r| r.headers.clone())
                    .unwrap_or_default(),
                Some(idx),
            ),
            None => (Vec::new(), None),
        }
    } else {
        (thead_labels, None)
    };

    let data_rows: Vec<&RawRow> = scan
        .rows
        .iter()
        .enumerate()
        .filter(|(idx, r)| Some(*idx) != header_row && !r.data.is_empty())
        .map(|(_, r)| r)
        .collect();

    if labels.is_empty() || data_rows.is_empty() {
        tracing::warn!(
            labels = labels.len(),
            rows = data_rows.len(),
            "html import rejected: missing header or data"
        );
        return Err(DataTableError::NoHeaderOrData);
    }

    let keys = keys_for_labels(&labels);
    let columns: Vec<Column> = keys
        .into_iter()
        .zip(labels)
        .map(|(key, label)| Column::text(key, label))
        .collect();

    let rows: Vec<Row> = data_rows
        .into_iter()
        .map(|raw| {
            columns
                .iter()
                .enumerate()
                .map(|(idx, col)| {
                    let value = raw.data.get(idx).cloned().unwrap_or_default();
                    (col.key.clone(), value)
                })
                .collect()
        })
        .collect();

    tracing::debug!(columns = columns.len(), rows = rows.len(), "html import");
    Ok(ImportedTable { columns, rows })
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

    fn keys(t: &ImportedTable) -> Vec<&str> {
        t.columns.iter().map(|c| c.key.as_str()).collect()
    }

    #[test]
    fn test_thead_header() {
        let t = import_html(
            "<table><thead><tr><th>Name</th><th>Age</th></tr></thead>\
             <tbody><tr><td>Ann</td><td>30</td></tr></tbody></table>",
        )
        .unwrap();
        assert_eq!(keys(&t), vec!["name", "age"]);
        assert_eq!(t.rows.len(), 1);
        assert_eq!(t.rows[0].get("name"), "Ann");
        assert_eq!(t.rows[0].get("age"), "30");
    }

    #[test]
    fn test_first_th_row_is_header_without_thead() {
        let t = import_html(
            "<table><tr><td>ignored?</td></tr><tr><th>A</th><th>B</th></tr>\
             <tr><td>1</td><td>2</td></tr></table>",
        )
        .unwrap();
        assert_eq!(keys(&t), vec!["a", "b"]);
        // The pre-header row still has <td> cells, so it is data.
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0].get("a"), "ignored?");
        assert_eq!(t.rows[1].get("b"), "2");
    }

    #[test]
    fn test_cell_markup_discarded() {
        let t = import_html(
            "<table><tr><th><b>Product</b> Name</th></tr>\
             <tr><td> <a href='/x'>Widget</a> <em>XL</em> </td></tr></table>",
        )
        .unwrap();
        assert_eq!(t.columns[0].label, "Product Name");
        assert_eq!(t.rows[0].get("product-name"), "Widget XL");
    }

    #[test]
    fn test_missing_trailing_cells_are_empty() {
        let t = import_html("<table><tr><th>A</th><th>B</th><th>C</th></tr><tr><td>1</td></tr></table>")
            .unwrap();
        assert_eq!(t.rows[0].get("a"), "1");
        assert_eq!(t.rows[0].get("c"), "");
    }

    #[test]
    fn test_unclosed_cells_and_rows() {
        let t = import_html(
            "<TABLE><TR><TH>Name<TH>City\n<TR><TD>Ann<TD>Oslo\n<TR><TD>Bob<TD>Rome</TABLE>",
        )
        .unwrap();
        assert_eq!(keys(&t), vec!["name", "city"]);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[1].get("city"), "Rome");
    }

    #[test]
    fn test_only_first_table_used() {
        let t = import_html(
            "<p>intro</p><table><tr><th>X</th></tr><tr><td>1</td></tr></table>\
             <table><tr><th>Y</th></tr><tr><td>2</td></tr></table>",
        )
        .unwrap();
        assert_eq!(keys(&t), vec!["x"]);
        assert_eq!(t.rows.len(), 1);
    }

    #[test]
    fn test_entities_decoded() {
        let t = import_html("<table><tr><th>Q&amp;A</th></tr><tr><td>a&nbsp;b</td></tr></table>")
            .unwrap();
        assert_eq!(t.columns[0].label, "Q&A");
        assert_eq!(t.columns[0].key, "q-a");
        assert_eq!(t.rows[0].get("q-a"), "a\u{a0}b");
    }

    #[test]
    fn test_stray_lt_kept_in_cell_text() {
        let t = import_html(
            "<table><tr><th>Expr</th><th>Note</th></tr>\
             <tr><td>1 < 2</td><td>x</td></tr><tr><td>a<b</td><td>y</td></tr></table>",
        )
        .unwrap();
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0].get("expr"), "1 < 2");
        assert_eq!(t.rows[0].get("note"), "x");
        assert_eq!(t.rows[1].get("expr"), "a<b");
        assert_eq!(t.rows[1].get("note"), "y");
    }

    #[test]
    fn test_no_table() {
        assert!(matches!(
            import_html("<div><p>hello</p></div>"),
            Err(DataTableError::NoTableFound)
        ));
        assert!(matches!(import_html(""), Err(DataTableError::NoTableFound)));
    }

    #[test]
    fn test_no_header() {
        assert!(matches!(
            import_html("<table><tr><td>1</td></tr></table>"),
            Err(DataTableError::NoHeaderOrData)
        ));
    }

    #[test]
    fn test_no_data() {
        assert!(matches!(
            import_html("<table><thead><tr><th>A</th></tr></thead></table>"),
            Err(DataTableError::NoHeaderOrData)
        ));
    }
}
