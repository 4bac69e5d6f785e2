//! Markup writer for rendered tables.

use std::fmt::Write;

use super::{class, RenderedRow, RenderedTable, SEARCH_PLACEHOLDER};
use crate::markup::escape_html;
use crate::types::Align;

/// Body layout to write: rows in display order with their hidden flag, the
/// sorted header (index and class) and an optional no-results query.
pub(crate) struct BodyView<'a> {
    pub rows: Vec<(&'a RenderedRow, bool)>,
    pub sorted: Option<(usize, &'static str)>,
    pub no_results: Option<&'a str>,
}

fn align_class(align: Align) -> String {
    class(&format!("align-{}", align.as_str()))
}

/// The row shown when a search matches nothing.
pub fn no_results_html(query: &str, colspan: usize) -> String {
    format!(
        r#"<tr class="{}"><td colspan="{}" class="{}">No results found for "{}"</td></tr>"#,
        class("no-results-row"),
        colspan.max(1),
        class("no-results"),
        escape_html(query)
    )
}

impl RenderedTable {
    /// Markup for the table as rendered (original row order, nothing hidden).
    pub fn to_html(&self) -> String {
        let view = BodyView {
            rows: self.rows.iter().map(|r| (r, false)).collect(),
            sorted: None,
            no_results: None,
        };
        write_table(self, &view)
    }
}

pub(crate) fn write_table(table: &RenderedTable, view: &BodyView<'_>) -> String {
    let mut out = String::new();

    if table.responsive {
        let _ = write!(out, r#"<div class="{}">"#, class("responsive-wrapper"));
    }
    if table.searchable {
        let _ = write!(
            out,
            r#"<div class="{}"><input type="text" class="{}" placeholder="{}"></div>"#,
            class("search-wrapper"),
            class("search"),
            escape_html(SEARCH_PLACEHOLDER)
        );
    }

    let _ = write!(
        out,
        r#"<table class="{}" data-table-id="{}">"#,
        escape_html(&table.class_attr()),
        table.table_id
    );

    if let Some(header) = &table.header {
        out.push_str("<thead><tr>");
        for (idx, cell) in header.iter().enumerate() {
            let mut classes = align_class(cell.align);
            if let Some((_, sort_class)) = view.sorted.filter(|(col, _)| *col == idx) {
                classes.push(' ');
                classes.push_str(sort_class);
            }
            let _ = write!(out, r#"<th class="{classes}""#);
            if let Some(width) = &cell.width {
                let _ = write!(out, r#" style="width: {};""#, escape_html(width));
            }
            let _ = write!(
                out,
                r#" data-col="{}">{}"#,
                escape_html(&cell.key),
                escape_html(&cell.label)
            );
            if table.sortable {
                let _ = write!(out, r#"<span class="{}"></span>"#, class("sort-icon"));
            }
            out.push_str("</th>");
        }
        out.push_str("</tr></thead>");
    }

    out.push_str("<tbody>");
    for (row, hidden) in &view.rows {
        if *hidden {
            out.push_str(r#"<tr style="display: none;">"#);
        } else {
            out.push_str("<tr>");
        }
        for cell in &row.cells {
            let _ = write!(out, r#"<td class="{}">{}</td>"#, align_class(cell.align), cell.html);
        }
        out.push_str("</tr>");
    }
    if let Some(query) = view.no_results {
        out.push_str(&no_results_html(query, table.column_count));
    }
    out.push_str("</tbody></table>");

    if table.responsive {
        out.push_str("</div>");
    }
    out
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::super::render_table;
    use crate::types::{Column, ColumnType, DisplayOptions, Row, TableId};

    fn html(options: &DisplayOptions) -> String {
        let columns = vec![
            Column::text("name", "Name <1>"),
            Column {
                width: "25%".into(),
                ..Column::new("share", "Share", ColumnType::Percent)
            },
        ];
        let rows: Vec<Row> = vec![[("name", "A & B"), ("share", "12.34")].into_iter().collect()];
        render_table(&columns, &rows, options, TableId(5), None).to_html()
    }

    #[test]
    fn test_default_markup() {
        let out = html(&DisplayOptions::default());
        assert_eq!(
            out,
            concat!(
                r#"<div class="dt-responsive-wrapper">"#,
                r#"<table class="dt-table dt-striped dt-hover" data-table-id="5">"#,
                r#"<thead><tr>"#,
                r#"<th class="dt-align-left" data-col="name">Name &lt;1&gt;</th>"#,
                r#"<th class="dt-align-left" style="width: 25%;" data-col="share">Share</th>"#,
                r#"</tr></thead>"#,
                r#"<tbody><tr>"#,
                r#"<td class="dt-align-left">A &amp; B</td>"#,
                r#"<td class="dt-align-left">12.3%</td>"#,
                r#"</tr></tbody></table></div>"#,
            )
        );
    }

    #[test]
    fn test_search_box_and_sort_icons() {
        let options = DisplayOptions {
            responsive: false,
            sortable: true,
            searchable: true,
            ..Default::default()
        };
        let out = html(&options);
        assert!(out.starts_with(
            r#"<div class="dt-search-wrapper"><input type="text" class="dt-search" placeholder="Search table..."></div><table"#
        ));
        assert_eq!(out.matches(r#"<span class="dt-sort-icon"></span>"#).count(), 2);
        assert!(out.ends_with("</table>"));
    }

    #[test]
    fn test_no_results_row_escapes_query() {
        assert_eq!(
            super::no_results_html("<x>", 3),
            r#"<tr class="dt-no-results-row"><td colspan="3" class="dt-no-results">No results found for "&lt;x&gt;"</td></tr>"#
        );
    }
}
