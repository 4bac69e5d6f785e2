//! Shared builders for integration tests.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use datatable::{Column, ColumnType, DisplayOptions, Row, Table};

/// Build a row from `(key, value)` pairs.
pub fn row(pairs: &[(&str, &str)]) -> Row {
    pairs.iter().copied().collect()
}

/// A product table: name (text), price (currency, right), stock (number).
pub fn product_table() -> Table {
    let columns = vec![
        Column::text("name", "Name"),
        Column {
            align: datatable::Align::Right,
            ..Column::new("price", "Price", ColumnType::Currency)
        },
        Column::new("stock", "Stock", ColumnType::Number),
    ];
    let rows = vec![
        row(&[("name", "Widget"), ("price", "10"), ("stock", "1500")]),
        row(&[("name", "Gadget"), ("price", "2"), ("stock", "30")]),
        row(&[("name", "Doohickey"), ("price", "100"), ("stock", "")]),
    ];
    Table::new(columns, rows)
}

/// Product table with sorting and searching switched on.
pub fn interactive_product_table() -> Table {
    product_table().with_options(DisplayOptions {
        sortable: true,
        searchable: true,
        ..Default::default()
    })
}

/// Values of `key` in row order.
pub fn column_values<'a>(rows: &'a [Row], key: &str) -> Vec<&'a str> {
    rows.iter().map(|r| r.get(key)).collect()
}
