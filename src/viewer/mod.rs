//! Interaction Layer: live sort and search over a rendered table.
//!
//! [`TableView`] holds a [`RenderedTable`] plus the view state the browser
//! would otherwise keep in the DOM:
//! - the current row order (changed by header clicks)
//! - which rows are hidden by the search filter
//! - the active sort column and direction
//! - the pending (debounced) search query
//!
//! The underlying rows are never modified, and filtering never reorders.

pub mod search;
pub mod sort;

pub use search::{filter_rows, search_terms, Debouncer, SearchOutcome, SEARCH_DEBOUNCE_MS};
pub use sort::{compare_cell_text, sort_rows, SortDirection, SortState};

use crate::render::html::{write_table, BodyView};
use crate::render::{RenderedRow, RenderedTable};

/// Sortable, searchable view over a rendered table.
#[derive(Debug, Clone)]
pub struct TableView {
    table: RenderedTable,
    /// Display order as indices into `table.rows`
    order: Vec<usize>,
    /// Indexed like `table.rows`
    hidden: Vec<bool>,
    sort: SortState,
    query: String,
    no_results: Option<String>,
    debounce: Debouncer,
}

impl TableView {
    pub fn new(table: RenderedTable) -> Self {
        let len = table.rows.len();
        Self {
            table,
            order: (0..len).collect(),
            hidden: vec![false; len],
            sort: SortState::new(),
            query: String::new(),
            no_results: None,
            debounce: Debouncer::default(),
        }
    }

    pub fn table(&self) -> &RenderedTable {
        &self.table
    }

    /// Current display order (indices into the rendered rows).
    pub fn row_order(&self) -> &[usize] {
        &self.order
    }

    pub fn is_hidden(&self, row: usize) -> bool {
        self.hidden.get(row).copied().unwrap_or(false)
    }

    /// Visible rows in display order.
    pub fn visible_rows(&self) -> Vec<&RenderedRow> {
        self.order
            .iter()
            .filter(|&&idx| !self.is_hidden(idx))
            .filter_map(|&idx| self.table.rows.get(idx))
            .collect()
    }

    // ---- sort --------------------------------------------------------------

    /// Handle a click on header `col`. Returns the direction applied, or
    /// `None` when the table isn't sortable or has no such header.
    pub fn click_header(&mut self, col: usize) -> Option<SortDirection> {
        let header_len = self.table.header.as_ref().map_or(0, Vec::len);
        if !self.table.sortable || col >= header_len {
            return None;
        }
        let direction = self.sort.click(col);
        sort_rows(&self.table.rows, &mut self.order, col, direction);
        tracing::debug!(col, ?direction, "table sorted");
        Some(direction)
    }

    /// Sort indicator shown on header `col`.
    pub fn sort_indicator(&self, col: usize) -> Option<SortDirection> {
        self.sort.indicator(col)
    }

    // ---- search ------------------------------------------------------------

    /// Record a keystroke in the search box at `now_ms`. The filter runs on
    /// the first [`Self::tick`] after the debounce delay.
    pub fn search_input(&mut self, query: impl Into<String>, now_ms: f64) {
        self.debounce.input(query, now_ms);
    }

    /// Run the pending search if it is due. Returns whether a filter ran.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        match self.debounce.poll(now_ms) {
            Some(query) => {
                self.apply_search(&query);
                true
            }
            None => false,
        }
    }

    /// When the pending search becomes due.
    pub fn search_due_at(&self) -> Option<f64> {
        self.debounce.due_at()
    }

    /// Filter immediately, superseding any pending keystroke.
    pub fn apply_search(&mut self, query: &str) {
        self.debounce.cancel();
        let SearchOutcome {
            hidden, no_results, ..
        } = filter_rows(&self.table.rows, query);
        self.hidden = hidden;
        self.no_results = no_results;
        self.query = query.to_string();
    }

    /// Query of the last filter pass.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Query shown in the no-results row, if that row is present.
    pub fn no_results(&self) -> Option<&str> {
        self.no_results.as_deref()
    }

    /// Markup of the current view.
    pub fn to_html(&self) -> String {
        let view = BodyView {
            rows: self
                .order
                .iter()
                .filter_map(|&idx| self.table.rows.get(idx).map(|r| (r, self.is_hidden(idx))))
                .collect(),
            sorted: self.sort.active().map(|(col, dir)| (col, dir.css_class())),
            no_results: self.no_results.as_deref(),
        };
        write_table(&self.table, &view)
    }
}

// ============================================================================
// WASM32 bindings
// ============================================================================

#[cfg(target_arch = "wasm32")]
pub use bindings::TableViewer;

#[cfg(target_arch = "wasm32")]
mod bindings {
    use wasm_bindgen::prelude::*;

    use super::{SortDirection, TableView};
    use crate::render::render_table;
    use crate::types::{Table, TableId};

    fn now_ms() -> f64 {
        js_sys::Date::now()
    }

    fn direction_name(direction: SortDirection) -> String {
        match direction {
            SortDirection::Ascending => "ascending".into(),
            SortDirection::Descending => "descending".into(),
        }
    }

    /// Live table exported to JavaScript.
    #[wasm_bindgen]
    pub struct TableViewer {
        view: TableView,
    }

    #[wasm_bindgen]
    impl TableViewer {
        /// Render a stored table (`{columns, rows, options}`).
        #[wasm_bindgen(constructor)]
        pub fn new(table: JsValue, table_id: u32, class: Option<String>) -> Result<TableViewer, JsValue> {
            console_error_panic_hook::set_once();
            let table: Table = serde_wasm_bindgen::from_value(table)?;
            let rendered = render_table(
                &table.columns,
                &table.rows,
                &table.options,
                TableId(u64::from(table_id)),
                class.as_deref(),
            );
            Ok(TableViewer {
                view: TableView::new(rendered),
            })
        }

        /// Header click; returns `"ascending"`, `"descending"` or nothing.
        #[wasm_bindgen]
        pub fn click_header(&mut self, col: usize) -> Option<String> {
            self.view.click_header(col).map(direction_name)
        }

        #[wasm_bindgen]
        pub fn sort_indicator(&self, col: usize) -> Option<String> {
            self.view.sort_indicator(col).map(direction_name)
        }

        /// Search box keystroke. Returns the time (ms) at which `tick` should
        /// be called.
        #[wasm_bindgen]
        pub fn search_input(&mut self, query: String) -> f64 {
            let now = now_ms();
            self.view.search_input(query, now);
            self.view.search_due_at().unwrap_or(now)
        }

        /// Run the pending search if due. Returns whether the view changed.
        #[wasm_bindgen]
        pub fn tick(&mut self) -> bool {
            self.view.tick(now_ms())
        }

        #[wasm_bindgen]
        pub fn search(&mut self, query: &str) {
            self.view.apply_search(query);
        }

        #[wasm_bindgen]
        pub fn row_order(&self) -> Vec<usize> {
            self.view.row_order().to_vec()
        }

        #[wasm_bindgen]
        pub fn html(&self) -> String {
            self.view.to_html()
        }
    }
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
    use crate::render::render_table;
    use crate::types::{Column, ColumnType, DisplayOptions, Row, TableId};

    fn view(sortable: bool) -> TableView {
        let columns = vec![
            Column::text("name", "Name"),
            Column::new("price", "Price", ColumnType::Currency),
        ];
        let rows: Vec<Row> = [("Widget", "10"), ("Gadget", "2"), ("Doohickey", "100")]
            .into_iter()
            .map(|(n, p)| [("name", n), ("price", p)].into_iter().collect())
            .collect();
        let options = DisplayOptions {
            sortable,
            searchable: true,
            ..Default::default()
        };
        TableView::new(render_table(&columns, &rows, &options, TableId(1), None))
    }

    fn names(v: &TableView) -> Vec<String> {
        v.visible_rows()
            .iter()
            .map(|r| r.cell_text(0).to_string())
            .collect()
    }

    #[test]
    fn test_sort_by_currency_then_toggle() {
        let mut v = view(true);
        assert_eq!(v.click_header(1), Some(SortDirection::Ascending));
        assert_eq!(names(&v), vec!["Gadget", "Widget", "Doohickey"]);
        assert_eq!(v.click_header(1), Some(SortDirection::Descending));
        assert_eq!(names(&v), vec!["Doohickey", "Widget", "Gadget"]);
        assert_eq!(v.click_header(0), Some(SortDirection::Ascending));
        assert_eq!(v.sort_indicator(1), None);
        assert_eq!(names(&v), vec!["Doohickey", "Gadget", "Widget"]);
    }

    #[test]
    fn test_sort_disabled() {
        let mut v = view(false);
        assert_eq!(v.click_header(0), None);
        assert_eq!(v.row_order(), &[0, 1, 2]);
    }

    #[test]
    fn test_search_hides_without_reordering() {
        let mut v = view(true);
        v.click_header(1);
        v.apply_search("g");
        // Gadget and Widget contain "g"; Doohickey doesn't.
        assert_eq!(names(&v), vec!["Gadget", "Widget"]);
        assert_eq!(v.row_order(), &[1, 0, 2]);
        assert!(v.is_hidden(2));
    }

    #[test]
    fn test_no_results_placeholder_lifecycle() {
        let mut v = view(true);
        v.apply_search("nothing here");
        assert_eq!(v.no_results(), Some("nothing here"));
        assert!(v.to_html().contains(r#"No results found for "nothing here""#));
        v.apply_search("");
        assert_eq!(v.no_results(), None);
        assert_eq!(names(&v).len(), 3);
        assert!(!v.to_html().contains("dt-no-results"));
    }

    #[test]
    fn test_debounced_search_runs_latest_query() {
        let mut v = view(true);
        v.search_input("wid", 0.0);
        v.search_input("gad", 150.0);
        assert!(!v.tick(300.0));
        assert_eq!(names(&v).len(), 3);
        assert!(v.tick(350.0));
        assert_eq!(names(&v), vec!["Gadget"]);
        assert_eq!(v.query(), "gad");
    }

    #[test]
    fn test_view_html_marks_sorted_header_and_hidden_rows() {
        let mut v = view(true);
        v.click_header(1);
        v.apply_search("widget");
        let html = v.to_html();
        assert!(html.contains(r#"<th class="dt-align-left dt-sort-asc" data-col="price">"#));
        assert_eq!(html.matches(r#"<tr style="display: none;">"#).count(), 2);
    }
}
