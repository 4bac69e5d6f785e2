//! Value formatting by declared column type.
//!
//! `format_value` never fails. Anything that does not fit its column type is
//! shown as escaped raw text.

use serde::Serialize;

use crate::hyperlinks::{image_html, link_html};
use crate::markup::escape_html;
use crate::numfmt::{format_with_thousands, parse_numeric};
use crate::sanitize::sanitize_html;
use crate::types::ColumnType;

/// Prefix for `currency` columns.
pub const CURRENCY_SYMBOL: &str = "$";

/// Result of formatting a value: markup for embedding plus the text a
/// reader sees (used for sorting and searching rendered rows).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FormattedValue {
    /// Markup fragment, safe to embed
    pub html: String,
    /// Visible text content of `html`
    pub text: String,
}

impl FormattedValue {
    /// Plain text, escaped for embedding.
    pub fn plain(text: String) -> Self {
        Self {
            html: escape_html(&text),
            text,
        }
    }
}

/// Format a raw value for display in a column of type `col_type`.
pub fn format_value(value: &str, col_type: ColumnType) -> FormattedValue {
    match col_type {
        ColumnType::Number => numeric(value, |n| format_with_thousands(n, 0)),
        ColumnType::Currency => numeric(value, |n| {
            format!("{CURRENCY_SYMBOL}{}", format_with_thousands(n, 2))
        }),
        ColumnType::Percent => numeric(value, |n| format!("{}%", format_with_thousands(n, 1))),
        ColumnType::Link => match link_html(value) {
            Some((html, text)) => FormattedValue { html, text },
            None => FormattedValue::plain(value.to_string()),
        },
        ColumnType::Image => match image_html(value) {
            Some(html) => FormattedValue {
                html,
                text: String::new(),
            },
            None => FormattedValue::plain(value.to_string()),
        },
        ColumnType::Html => {
            let sanitized = sanitize_html(value);
            FormattedValue {
                html: sanitized.html,
                text: sanitized.text,
            }
        }
        ColumnType::Text => FormattedValue::plain(value.to_string()),
    }
}

/// Shorthand returning only the markup.
pub fn format_html(value: &str, col_type: ColumnType) -> String {
    format_value(value, col_type).html
}

fn numeric(value: &str, fmt: impl FnOnce(f64) -> String) -> FormattedValue {
    match parse_numeric(value) {
        Some(n) => FormattedValue::plain(fmt(n)),
        None => FormattedValue::plain(value.to_string()),
    }
}
