//! Integration tests for client-side sort and search.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use common::row;
use datatable::viewer::{SortDirection, SEARCH_DEBOUNCE_MS};
use datatable::{render_table, Column, ColumnType, DisplayOptions, Table, TableId, TableView};

fn view_of(table: &Table) -> TableView {
    TableView::new(render_table(
        &table.columns,
        &table.rows,
        &table.options,
        TableId(1),
        None,
    ))
}

fn first_column(view: &TableView) -> Vec<String> {
    view.visible_rows()
        .iter()
        .map(|r| r.cell_text(0).to_string())
        .collect()
}

fn sortable(columns: Vec<Column>, rows: &[&[(&str, &str)]]) -> Table {
    Table::new(columns, rows.iter().map(|r| row(r)).collect()).with_options(DisplayOptions {
        sortable: true,
        searchable: true,
        ..Default::default()
    })
}

#[test]
fn test_currency_text_sorts_numerically() {
    // Values already carry the symbol, so they are stored in a text column.
    let table = sortable(
        vec![Column::text("amount", "Amount")],
        &[&[("amount", "$10")], &[("amount", "$2")], &[("amount", "$100")]],
    );
    let mut view = view_of(&table);
    assert_eq!(view.click_header(0), Some(SortDirection::Ascending));
    assert_eq!(first_column(&view), vec!["$2", "$10", "$100"]);
    assert_eq!(view.click_header(0), Some(SortDirection::Descending));
    assert_eq!(first_column(&view), vec!["$100", "$10", "$2"]);
}

#[test]
fn test_sort_uses_displayed_text() {
    // A number column displays grouped values; sorting strips the grouping.
    let table = sortable(
        vec![Column::new("n", "N", ColumnType::Number)],
        &[&[("n", "1500")], &[("n", "200")], &[("n", "30000")]],
    );
    let mut view = view_of(&table);
    view.click_header(0);
    assert_eq!(first_column(&view), vec!["200", "1,500", "30,000"]);
}

#[test]
fn test_sort_is_stable_for_equal_keys() {
    let table = sortable(
        vec![Column::text("k", "K"), Column::text("id", "Id")],
        &[
            &[("k", "b"), ("id", "1")],
            &[("k", "a"), ("id", "2")],
            &[("k", "B"), ("id", "3")],
            &[("k", "a"), ("id", "4")],
        ],
    );
    let mut view = view_of(&table);
    view.click_header(0);
    let ids: Vec<&str> = view.visible_rows().iter().map(|r| r.cell_text(1)).collect();
    assert_eq!(ids, vec!["2", "4", "1", "3"]);
}

#[test]
fn test_switching_columns_resets_indicators() {
    let table = common::interactive_product_table();
    let mut view = view_of(&table);
    view.click_header(1);
    view.click_header(1);
    assert_eq!(view.sort_indicator(1), Some(SortDirection::Descending));
    assert_eq!(view.click_header(2), Some(SortDirection::Ascending));
    assert_eq!(view.sort_indicator(1), None);
    assert_eq!(view.sort_indicator(0), None);
}

#[test]
fn test_search_requires_every_term() {
    let table = sortable(
        vec![Column::text("a", "A"), Column::text("b", "B")],
        &[
            &[("a", "Foo"), ("b", "Bar")],
            &[("a", "foo"), ("b", "baz")],
            &[("a", "xbarx"), ("b", "FOOD")],
        ],
    );
    let mut view = view_of(&table);
    view.apply_search("foo bar");
    assert_eq!(first_column(&view), vec!["Foo", "xbarx"]);
    view.apply_search("");
    assert_eq!(first_column(&view).len(), 3);
    assert!(view.no_results().is_none());
}

#[test]
fn test_no_results_row_appears_and_disappears() {
    let table = common::interactive_product_table();
    let mut view = view_of(&table);
    view.apply_search("<none>");
    let html = view.to_html();
    assert!(html.contains(
        r#"<tr class="dt-no-results-row"><td colspan="3" class="dt-no-results">No results found for "&lt;none&gt;"</td></tr>"#
    ));
    view.apply_search("widget");
    assert!(!view.to_html().contains("dt-no-results-row"));
    assert_eq!(first_column(&view), vec!["Widget"]);
}

#[test]
fn test_filter_keeps_sorted_order() {
    let table = common::interactive_product_table();
    let mut view = view_of(&table);
    view.click_header(1); // price ascending: Gadget, Widget, Doohickey
    view.apply_search("dg"); // Gadget, Widget
    assert_eq!(first_column(&view), vec!["Gadget", "Widget"]);
    view.click_header(1); // descending, filter still applied
    assert_eq!(first_column(&view), vec!["Widget", "Gadget"]);
}

#[test]
fn test_only_latest_keystroke_filters() {
    let table = common::interactive_product_table();
    let mut view = view_of(&table);
    view.search_input("w", 1_000.0);
    view.search_input("wi", 1_050.0);
    view.search_input("gad", 1_120.0);
    assert!(!view.tick(1_000.0 + SEARCH_DEBOUNCE_MS));
    assert_eq!(first_column(&view).len(), 3);
    assert!(view.tick(1_120.0 + SEARCH_DEBOUNCE_MS));
    assert_eq!(first_column(&view), vec!["Gadget"]);
    assert!(!view.tick(5_000.0));
}
