//! Integration tests for CSV and HTML import.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use datatable::{import_csv, import_html, Align, ColumnType, DataTableError, ImportedTable};
use test_case::test_case;

fn keys(t: &ImportedTable) -> Vec<&str> {
    t.columns.iter().map(|c| c.key.as_str()).collect()
}

// ============================================================================
// CSV
// ============================================================================

#[test]
fn test_csv_shape_matches_header_and_lines() {
    let csv = "Product,Unit Price,Qty\n\
               Widget,\"1,234.50\",3\n\
               \"Gadget \"\"Pro\"\"\",9.99,1\n\
               Doohickey,0.5,12\n";
    let t = import_csv(csv).unwrap();
    assert_eq!(t.columns.len(), 3);
    assert_eq!(t.rows.len(), 3);
    assert_eq!(keys(&t), vec!["product", "unit-price", "qty"]);
    for row in &t.rows {
        let row_keys: Vec<&str> = row.keys().collect();
        let mut expected = keys(&t);
        expected.sort_unstable();
        assert_eq!(row_keys, expected);
    }
    assert_eq!(t.rows[0].get("unit-price"), "1,234.50");
    assert_eq!(t.rows[1].get("product"), "Gadget \"Pro\"");
}

#[test]
fn test_csv_columns_default_to_text_left() {
    let t = import_csv("A,B\n1,2").unwrap();
    assert!(t
        .columns
        .iter()
        .all(|c| c.col_type == ColumnType::Text && c.align == Align::Left && c.width.is_empty()));
}

#[test_case("" ; "empty")]
#[test_case("   \n\n" ; "blank lines")]
#[test_case("Name,Age" ; "header only")]
#[test_case("\r\nName,Age\r\n\r\n" ; "header only crlf")]
fn test_csv_needs_two_lines(input: &str) {
    assert!(matches!(import_csv(input), Err(DataTableError::EmptyInput)));
}

#[test]
fn test_csv_mixed_line_endings_and_blank_lines() {
    let t = import_csv("a,b\r\n\r\n1,2\r3,4\n\n5,6").unwrap();
    assert_eq!(common::column_values(&t.rows, "a"), vec!["1", "3", "5"]);
}

#[test]
fn test_csv_short_and_long_rows() {
    let t = import_csv("a,b,c\n1\n1,2,3,4,5").unwrap();
    assert_eq!(t.rows[0].get("b"), "");
    assert_eq!(t.rows[0].get("c"), "");
    assert_eq!(t.rows[1].get("c"), "3");
    assert_eq!(t.rows[1].len(), 3);
}

#[test]
fn test_csv_fallback_and_duplicate_keys() {
    let t = import_csv("Name,,Name,$$$\n1,2,3,4").unwrap();
    assert_eq!(keys(&t), vec!["name", "col_2", "name-2", "col_4"]);
    assert_eq!(t.columns[1].label, "");
    assert_eq!(t.rows[0].get("name-2"), "3");
}

#[test]
fn test_csv_import_is_deterministic() {
    let csv = "x,y\n1,2\n3,4";
    assert_eq!(import_csv(csv).unwrap(), import_csv(csv).unwrap());
}

#[test]
fn test_summary_line() {
    let t = import_csv("a,b\n1,2\n3,4").unwrap();
    assert_eq!(t.summary(), "Imported 2 columns and 2 rows");
}

// ============================================================================
// HTML
// ============================================================================

#[test]
fn test_html_end_to_end() {
    let t = import_html(
        "<table><thead><tr><th>Name</th><th>Age</th></tr></thead>\
         <tbody><tr><td>Ann</td><td>30</td></tr></tbody></table>",
    )
    .unwrap();
    assert_eq!(keys(&t), vec!["name", "age"]);
    assert_eq!(t.columns[0].label, "Name");
    assert_eq!(t.rows.len(), 1);
    assert_eq!(t.rows[0], common::row(&[("name", "Ann"), ("age", "30")]));
}

#[test]
fn test_html_in_surrounding_page() {
    let html = r#"<!DOCTYPE html>
<html><head><meta charset="utf-8"><title>Prices</title></head>
<body>
  <h1>Price list</h1>
  <table class="prices" border=1>
    <caption>2024</caption>
    <tr><th>Item</th><th>Price</th></tr>
    <tr><td>Tea</td><td>$3.00</td></tr>
    <tr><td>Coffee<br>large</td><td>$4.50</td></tr>
  </table>
</body></html>"#;
    let t = import_html(html).unwrap();
    assert_eq!(keys(&t), vec!["item", "price"]);
    assert_eq!(t.rows.len(), 2);
    assert_eq!(t.rows[1].get("item"), "Coffeelarge");
    assert_eq!(t.rows[1].get("price"), "$4.50");
}

#[test]
fn test_html_errors() {
    assert!(matches!(
        import_html("just text"),
        Err(DataTableError::NoTableFound)
    ));
    assert!(matches!(
        import_html("<table><tr><th>Only header</th></tr></table>"),
        Err(DataTableError::NoHeaderOrData)
    ));
    assert!(matches!(
        import_html("<table><tr><td>no</td><td>header</td></tr></table>"),
        Err(DataTableError::NoHeaderOrData)
    ));
}

#[test]
fn test_html_fallback_keys() {
    let t = import_html(
        "<table><tr><th>#</th><th>Größe</th><th>名前</th></tr><tr><td>1</td><td>XL</td><td>x</td></tr></table>",
    )
    .unwrap();
    assert_eq!(keys(&t), vec!["col_1", "große", "名前"]);
}
