//! Minimal CSV importer that produces a fresh schema plus rows.
//!
//! The input is handled line by line: quoted fields may contain commas and
//! doubled quotes, but not line breaks.

use crate::error::{DataTableError, Result};
use crate::slug::keys_for_labels;
use crate::types::{Column, ImportedTable, Row};

/// Import CSV text. The first non-blank line is the header.
///
/// Data rows shorter than the header are padded with empty values; extra
/// trailing fields are ignored.
///
/// # Errors
/// [`DataTableError::EmptyInput`] when fewer than two non-blank lines remain.
pub fn import_csv(text: &str) -> Result<ImportedTable> {
    let lines = logical_lines(text);
    let Some((header, data)) = lines.split_first() else {
        return Err(DataTableError::EmptyInput);
    };
    if data.is_empty() {
        tracing::warn!("csv import rejected: header without data rows");
        return Err(DataTableError::EmptyInput);
    }

    let labels: Vec<String> = split_csv_line(header, ',')
        .into_iter()
        .map(|l| l.trim().to_string())
        .collect();
    let keys = keys_for_labels(&labels);
    let columns: Vec<Column> = keys
        .into_iter()
        .zip(labels)
        .map(|(key, label)| Column::text(key, label))
        .collect();

    let rows: Vec<Row> = data
        .iter()
        .map(|line| {
            let fields = split_csv_line(line, ',');
            columns
                .iter()
                .enumerate()
                .map(|(idx, col)| {
                    let value = fields.get(idx).map_or("", |f| f.trim());
                    (col.key.clone(), value.to_string())
                })
                .collect()
        })
        .collect();

    tracing::debug!(columns = columns.len(), rows = rows.len(), "csv import");
    Ok(ImportedTable { columns, rows })
}

/// Split on any line ending and drop blank lines.
fn logical_lines(text: &str) -> Vec<&str> {
    text.split(['\n', '\r'])
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// Split a CSV line respecting quoted fields.
pub(crate) fn split_csv_line(line: &str, sep: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    // "" inside quotes
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == sep {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    fields.push(current);
    fields
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
    use test_case::test_case;

    #[test]
    fn test_import_csv_basic() {
        let table = import_csv("Name,Age,City\nAlice,30,NYC\nBob,25,LA").unwrap();
        let keys: Vec<&str> = table.columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["name", "age", "city"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].get("city"), "LA");
    }

    #[test]
    fn test_import_csv_crlf_and_blank_lines() {
        let table = import_csv("A,B\r\n\r\n1,2\r\n\r\n3,4\r\n").unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].get("b"), "2");
        assert_eq!(table.rows[1].get("a"), "3");
    }

    #[test]
    fn test_quoted_csv() {
        let fields = split_csv_line("\"Hello, World\",42,\"She said \"\"hi\"\"\"", ',');
        assert_eq!(fields, vec!["Hello, World", "42", "She said \"hi\""]);
    }

    #[test]
    fn test_short_rows_padded_long_rows_truncated() {
        let table = import_csv("a,b,c\n1\n1,2,3,4").unwrap();
        assert_eq!(table.rows[0].get("b"), "");
        assert_eq!(table.rows[0].get("c"), "");
        assert_eq!(table.rows[0].len(), 3);
        assert_eq!(table.rows[1].get("c"), "3");
        assert_eq!(table.rows[1].len(), 3);
    }

    #[test]
    fn test_values_and_labels_trimmed() {
        let table = import_csv(" Full Name , Score \n  Ann  ,  9 ").unwrap();
        assert_eq!(table.columns[0].label, "Full Name");
        assert_eq!(table.columns[0].key, "full-name");
        assert_eq!(table.rows[0].get("score"), "9");
    }

    #[test]
    fn test_unslugifiable_header_gets_positional_key() {
        let table = import_csv("Name,,$$\nA,B,C").unwrap();
        let keys: Vec<&str> = table.columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["name", "col_2", "col_3"]);
        assert_eq!(table.rows[0].get("col_3"), "C");
    }

    #[test_case("" ; "empty")]
    #[test_case("\n\n\r\n" ; "only blank lines")]
    #[test_case("Name,Age" ; "header only")]
    #[test_case("Name,Age\n   \n" ; "header plus whitespace line")]
    fn test_empty_input(text: &str) {
        assert!(matches!(import_csv(text), Err(DataTableError::EmptyInput)));
    }
}
