//! Debounced row search.

use crate::render::RenderedRow;

/// Delay between the last keystroke and the filter pass, in milliseconds.
pub const SEARCH_DEBOUNCE_MS: f64 = 200.0;

/// Lowercased search terms of a query (split on whitespace).
pub fn search_terms(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

/// Whether every term occurs in `text`, case-insensitively.
pub fn text_matches(text: &str, terms: &[String]) -> bool {
    let haystack = text.to_lowercase();
    terms.iter().all(|t| haystack.contains(t.as_str()))
}

/// Result of filtering a set of rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchOutcome {
    /// Hidden flag per row, indexed like the input rows
    pub hidden: Vec<bool>,
    /// Number of visible rows
    pub matches: usize,
    /// Query to show in the no-results row, when one is needed
    pub no_results: Option<String>,
}

/// Filter rows by `query`. Rows are only hidden, never reordered; an empty
/// query shows everything.
pub fn filter_rows(rows: &[RenderedRow], query: &str) -> SearchOutcome {
    let terms = search_terms(query);
    let hidden: Vec<bool> = rows
        .iter()
        .map(|r| !text_matches(&r.text(), &terms))
        .collect();
    let matches = hidden.iter().filter(|h| !**h).count();
    let no_results = (matches == 0 && !terms.is_empty()).then(|| query.to_string());
    tracing::debug!(terms = terms.len(), matches, "search filter applied");
    SearchOutcome {
        hidden,
        matches,
        no_results,
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Pending {
    query: String,
    due_ms: f64,
}

/// Trailing-edge debounce for search input.
///
/// Timestamps are supplied by the caller (milliseconds, any epoch), so the
/// same logic runs against `Date.now()` in the browser and fixed values in
/// tests. A newer input always supersedes a pending one.
#[derive(Debug, Clone, PartialEq)]
pub struct Debouncer {
    delay_ms: f64,
    pending: Option<Pending>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE_MS)
    }
}

impl Debouncer {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    /// Record a keystroke; the filter for `query` becomes due `delay` later.
    pub fn input(&mut self, query: impl Into<String>, now_ms: f64) {
        self.pending = Some(Pending {
            query: query.into(),
            due_ms: now_ms + self.delay_ms,
        });
    }

    /// Take the pending query if its delay has elapsed.
    pub fn poll(&mut self, now_ms: f64) -> Option<String> {
        let due = self.pending.as_ref().is_some_and(|p| now_ms >= p.due_ms);
        if due {
            self.pending.take().map(|p| p.query)
        } else {
            None
        }
    }

    /// When the pending query becomes due.
    pub fn due_at(&self) -> Option<f64> {
        self.pending.as_ref().map(|p| p.due_ms)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::render::RenderedCell;
    use crate::types::Align;

    fn row(cells: &[&str]) -> RenderedRow {
        RenderedRow {
            cells: cells
                .iter()
                .map(|c| RenderedCell {
                    html: (*c).to_string(),
                    text: (*c).to_string(),
                    align: Align::Left,
                })
                .collect(),
        }
    }

    #[test]
    fn test_all_terms_must_match() {
        let rows = vec![
            row(&["Foo", "Bar"]),
            row(&["foo only"]),
            row(&["BARFOO"]),
        ];
        let out = filter_rows(&rows, "foo bar");
        assert_eq!(out.hidden, vec![false, true, false]);
        assert_eq!(out.matches, 2);
        assert!(out.no_results.is_none());
    }

    #[test]
    fn test_no_results_then_cleared() {
        let rows = vec![row(&["a"]), row(&["b"])];
        let out = filter_rows(&rows, "zzz");
        assert_eq!(out.hidden, vec![true, true]);
        assert_eq!(out.no_results.as_deref(), Some("zzz"));

        let out = filter_rows(&rows, "   ");
        assert_eq!(out.hidden, vec![false, false]);
        assert!(out.no_results.is_none());
    }

    #[test]
    fn test_debounce_supersedes() {
        let mut d = Debouncer::default();
        d.input("f", 0.0);
        d.input("fo", 100.0);
        assert_eq!(d.poll(250.0), None);
        assert_eq!(d.due_at(), Some(300.0));
        assert_eq!(d.poll(300.0).as_deref(), Some("fo"));
        assert!(!d.is_pending());
        assert_eq!(d.poll(1000.0), None);
    }

    #[test]
    fn test_debounce_cancel() {
        let mut d = Debouncer::new(50.0);
        d.input("x", 0.0);
        d.cancel();
        assert_eq!(d.poll(100.0), None);
    }
}
