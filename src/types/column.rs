use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared content type of a column; drives display formatting only.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Grouped integer display
    Number,
    /// Grouped, two decimals, currency prefix
    Currency,
    /// One decimal, `%` suffix
    Percent,
    /// Absolute URL rendered as a hyperlink labelled with its host
    Link,
    /// Absolute URL rendered as an image
    Image,
    /// Sanitized markup
    Html,
    /// Plain text, escaped (also the fallback for unknown type names)
    #[default]
    #[serde(other)]
    Text,
}

impl ColumnType {
    pub const ALL: [ColumnType; 7] = [
        ColumnType::Text,
        ColumnType::Number,
        ColumnType::Currency,
        ColumnType::Percent,
        ColumnType::Link,
        ColumnType::Image,
        ColumnType::Html,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Number => "number",
            ColumnType::Currency => "currency",
            ColumnType::Percent => "percent",
            ColumnType::Link => "link",
            ColumnType::Image => "image",
            ColumnType::Html => "html",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a type name. Never fails: unknown names become [`ColumnType::Text`].
impl FromStr for ColumnType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Ok(ColumnType::ALL
            .into_iter()
            .find(|t| t.as_str() == lowered)
            .unwrap_or_default())
    }
}

/// Horizontal alignment of a column's cells.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Center,
    Right,
    #[default]
    #[serde(other)]
    Left,
}

impl Align {
    pub const fn as_str(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

impl FromStr for Align {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "center" => Align::Center,
            "right" => Align::Right,
            _ => Align::Left,
        })
    }
}

/// A column definition. Column order in a schema is display order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Column {
    /// Unique, slug-safe, non-empty key used to address row values
    pub key: String,
    /// Header text
    pub label: String,
    #[serde(rename = "type", default)]
    pub col_type: ColumnType,
    #[serde(default)]
    pub align: Align,
    /// CSS width hint; empty means automatic
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub width: String,
}

impl Column {
    /// A left-aligned column of the given type with no width hint.
    pub fn new(key: impl Into<String>, label: impl Into<String>, col_type: ColumnType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            col_type,
            align: Align::Left,
            width: String::new(),
        }
    }

    /// A plain `text` column, as produced by the importers.
    pub fn text(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, ColumnType::Text)
    }

    /// Width hint, if one is set.
    pub fn width_hint(&self) -> Option<&str> {
        let w = self.width.trim();
        (!w.is_empty()).then_some(w)
    }
}

/// Partial update for an existing column; `None` fields are left unchanged.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ColumnPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub col_type: Option<ColumnType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
}

impl ColumnPatch {
    pub(crate) fn apply(self, column: &mut Column) {
        if let Some(label) = self.label {
            column.label = label;
        }
        if let Some(col_type) = self.col_type {
            column.col_type = col_type;
        }
        if let Some(align) = self.align {
            column.align = align;
        }
        if let Some(width) = self.width {
            column.width = width;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_column_type_from_str_is_lenient() {
        assert_eq!("currency".parse::<ColumnType>().unwrap(), ColumnType::Currency);
        assert_eq!(" HTML ".parse::<ColumnType>().unwrap(), ColumnType::Html);
        assert_eq!("date".parse::<ColumnType>().unwrap(), ColumnType::Text);
    }

    #[test]
    fn test_column_deserialize_defaults() {
        let col: Column = serde_json::from_str(r#"{"key":"age","label":"Age"}"#).unwrap();
        assert_eq!(col.col_type, ColumnType::Text);
        assert_eq!(col.align, Align::Left);
        assert!(col.width_hint().is_none());
    }

    #[test]
    fn test_column_unknown_type_falls_back_to_text() {
        let col: Column =
            serde_json::from_str(r#"{"key":"d","label":"D","type":"date","align":"middle"}"#)
                .unwrap();
        assert_eq!(col.col_type, ColumnType::Text);
        assert_eq!(col.align, Align::Left);
    }

    #[test]
    fn test_known_names_round_trip_through_json() {
        for t in ColumnType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
            assert_eq!(serde_json::from_str::<ColumnType>(&json).unwrap(), t);
        }
        assert_eq!(serde_json::from_str::<Align>(r#""right""#).unwrap(), Align::Right);
        assert_eq!(serde_json::from_str::<Align>(r#""left""#).unwrap(), Align::Left);
    }

    #[test]
    fn test_column_serializes_type_field() {
        let col = Column::new("price", "Price", ColumnType::Currency);
        let json = serde_json::to_value(&col).unwrap();
        assert_eq!(json["type"], "currency");
        assert_eq!(json["align"], "left");
        assert!(json.get("width").is_none());
    }

    #[test]
    fn test_patch_only_touches_given_fields() {
        let mut col = Column::text("name", "Name");
        ColumnPatch {
            align: Some(Align::Right),
            width: Some("120px".into()),
            ..Default::default()
        }
        .apply(&mut col);
        assert_eq!(col.label, "Name");
        assert_eq!(col.align, Align::Right);
        assert_eq!(col.width_hint(), Some("120px"));
    }
}
