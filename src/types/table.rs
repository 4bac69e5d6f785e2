use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::Column;

/// Identifier of a stored table.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TableId(pub u64);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One data row: column key -> raw string value.
///
/// Keys missing from the map read as the empty string. Keys that are not in
/// the schema are kept (and persisted) but never rendered.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, String>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// A row holding an empty string for every column key.
    pub fn empty_for(columns: &[Column]) -> Self {
        Self(
            columns
                .iter()
                .map(|c| (c.key.clone(), String::new()))
                .collect(),
        )
    }

    /// Raw value for `key`, or `""` when absent.
    pub fn get(&self, key: &str) -> &str {
        self.0.get(key).map_or("", String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Presentation flags. Any combination is valid.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayOptions {
    /// Render a header row
    pub has_header: bool,
    /// Alternate row shading
    pub striped: bool,
    /// Row hover highlight
    pub hover: bool,
    /// Wrap in a horizontally scrolling container
    pub responsive: bool,
    /// Clickable header sorting
    pub sortable: bool,
    /// Search box above the table
    pub searchable: bool,
    /// Extra CSS class (sanitized at render time)
    pub custom_class: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            striped: true,
            hover: true,
            responsive: true,
            sortable: false,
            searchable: false,
            custom_class: String::new(),
        }
    }
}

/// A complete table: schema, rows and presentation flags.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Table {
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub options: DisplayOptions,
}

impl Table {
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows,
            options: DisplayOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DisplayOptions) -> Self {
        self.options = options;
        self
    }
}

/// Immutable copy of an edit session's schema and rows, handed to a store.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct TableSnapshot {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

/// Result of a CSV or HTML import: a fresh schema plus its rows.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ImportedTable {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl ImportedTable {
    /// Human-readable result line shown after an import.
    pub fn summary(&self) -> String {
        format!(
            "Imported {} columns and {} rows",
            self.columns.len(),
            self.rows.len()
        )
    }

    pub fn into_table(self) -> Table {
        Table::new(self.columns, self.rows)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_row_missing_key_reads_empty() {
        let row: Row = [("name", "Ann")].into_iter().collect();
        assert_eq!(row.get("name"), "Ann");
        assert_eq!(row.get("age"), "");
    }

    #[test]
    fn test_row_serializes_as_plain_object() {
        let row: Row = [("age", "30"), ("name", "Ann")].into_iter().collect();
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"age":"30","name":"Ann"}"#
        );
    }

    #[test]
    fn test_display_options_defaults_fill_missing_fields() {
        let opts: DisplayOptions = serde_json::from_str(r#"{"sortable":true}"#).unwrap();
        assert!(opts.sortable);
        assert!(opts.has_header);
        assert!(opts.striped);
        assert!(!opts.searchable);
    }

    #[test]
    fn test_import_summary() {
        let imported = ImportedTable {
            columns: vec![Column::text("a", "A"), Column::text("b", "B")],
            rows: vec![Row::new()],
        };
        assert_eq!(imported.summary(), "Imported 2 columns and 1 rows");
    }
}
