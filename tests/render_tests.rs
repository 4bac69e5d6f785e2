//! Integration tests for value formatting and table rendering.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use datatable::formatter::format_html;
use datatable::render::{INVALID_ID_COMMENT, NO_COLUMNS_COMMENT};
use datatable::{
    format_value, render_directive, render_table, ColumnType, DisplayOptions, MemoryStore, Table,
    TableId,
};
use test_case::test_case;

#[test_case("1234.5", ColumnType::Currency, "$1,234.50" ; "currency")]
#[test_case("abc", ColumnType::Number, "abc" ; "number passthrough")]
#[test_case("50", ColumnType::Percent, "50.0%" ; "percent")]
#[test_case("  -1234567.5 ", ColumnType::Number, "-1,234,568" ; "negative number rounds away")]
#[test_case("0.125", ColumnType::Percent, "0.1%" ; "percent one decimal")]
#[test_case("1e3", ColumnType::Number, "1,000" ; "exponent")]
#[test_case("1,000", ColumnType::Number, "1,000" ; "grouped input is not numeric")]
#[test_case("a<b", ColumnType::Currency, "a&lt;b" ; "passthrough escaped")]
fn test_format(value: &str, col_type: ColumnType, expected: &str) {
    assert_eq!(format_html(value, col_type), expected);
}

#[test]
fn test_link_and_image_fallbacks() {
    let link = format_value("https://example.org/path?q=1", ColumnType::Link);
    assert_eq!(link.text, "example.org");
    assert!(link.html.contains(r#"rel="noopener noreferrer""#));
    assert_eq!(format_html("javascript:alert(1)", ColumnType::Link), "javascript:alert(1)");
    assert_eq!(format_html("/relative.png", ColumnType::Image), "/relative.png");
}

#[test]
fn test_rendered_cells_follow_schema() {
    let table = common::product_table();
    let t = render_table(&table.columns, &table.rows, &table.options, TableId(3), None);
    assert_eq!(t.column_count, 3);
    let first: Vec<&str> = t.rows[0].cells.iter().map(|c| c.html.as_str()).collect();
    assert_eq!(first, vec!["Widget", "$10.00", "1,500"]);
    assert_eq!(t.rows[2].cells[2].html, "");
}

#[test]
fn test_extra_keys_are_not_rendered() {
    let mut table = common::product_table();
    table.rows[0].set("internal_note", "secret");
    let html = render_table(&table.columns, &table.rows, &table.options, TableId(3), None).to_html();
    assert!(!html.contains("secret"));
}

#[test]
fn test_full_markup_for_interactive_table() {
    let table = common::interactive_product_table();
    let html = render_table(
        &table.columns,
        &table.rows,
        &table.options,
        TableId(3),
        Some("wide table"),
    )
    .to_html();
    assert!(html.starts_with(r#"<div class="dt-responsive-wrapper"><div class="dt-search-wrapper">"#));
    assert!(html.contains(
        r#"<table class="dt-table dt-striped dt-hover dt-sortable dt-searchable widetable" data-table-id="3">"#
    ));
    assert!(html.contains(
        r#"<th class="dt-align-right" data-col="price">Price<span class="dt-sort-icon"></span></th>"#
    ));
    assert!(html.contains(r#"<td class="dt-align-right">$100.00</td>"#));
    assert!(html.ends_with("</tbody></table></div>"));
}

#[test]
fn test_headerless_table() {
    let table = common::product_table().with_options(DisplayOptions {
        has_header: false,
        responsive: false,
        ..Default::default()
    });
    let html = render_table(&table.columns, &table.rows, &table.options, TableId(1), None).to_html();
    assert!(!html.contains("<thead>"));
    assert!(html.starts_with("<table"));
}

#[test]
fn test_directive() {
    let mut store = MemoryStore::new();
    assert_eq!(render_directive(&store, TableId(4), None), INVALID_ID_COMMENT);
    store.insert(TableId(4), Table::default());
    assert_eq!(render_directive(&store, TableId(4), None), NO_COLUMNS_COMMENT);
    store.insert(TableId(5), common::product_table());
    let html = render_directive(&store, TableId(5), Some("compact"));
    assert!(html.contains("compact"));
    assert!(html.contains("Doohickey"));
}
