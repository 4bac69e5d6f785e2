//! Header-click sorting of rendered rows.
//!
//! Sorting works on the visible cell text, so a numeric-looking value in a
//! `text` column sorts the same way it displays. Cells whose text parses as a
//! number once currency symbols, grouping commas, `%` and whitespace are
//! stripped compare numerically; the rest compare case-insensitively with
//! accents folded. In a mixed column every numeric cell orders before every
//! textual one, which keeps the order total (and the sort stable).

use std::cmp::Ordering;

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::numfmt::parse_sort_number;
use crate::render::RenderedRow;

/// Direction of the active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub const fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Class put on the sorted header cell.
    pub const fn css_class(self) -> &'static str {
        match self {
            SortDirection::Ascending => "dt-sort-asc",
            SortDirection::Descending => "dt-sort-desc",
        }
    }
}

/// Which column is sorted, and how. Every other header shows no indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    active: Option<(usize, SortDirection)>,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a click on header `col` and return the direction to sort by.
    ///
    /// The same header toggles ascending/descending; a different header
    /// starts at ascending.
    pub fn click(&mut self, col: usize) -> SortDirection {
        let direction = match self.active {
            Some((current, dir)) if current == col => dir.toggled(),
            _ => SortDirection::Ascending,
        };
        self.active = Some((col, direction));
        direction
    }

    /// Indicator for header `col` (`None` means unsorted).
    pub fn indicator(&self, col: usize) -> Option<SortDirection> {
        self.active
            .and_then(|(current, dir)| (current == col).then_some(dir))
    }

    pub fn active(&self) -> Option<(usize, SortDirection)> {
        self.active
    }

    pub fn reset(&mut self) {
        self.active = None;
    }
}

/// Lowercased, accent-folded text used for textual comparison.
fn collation_key(text: &str) -> String {
    text.nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Sort key of one cell, computed once per row.
enum CellKey {
    Number(f64),
    Text { folded: String, lower: String },
}

impl CellKey {
    fn new(text: &str) -> Self {
        match parse_sort_number(text) {
            Some(n) => CellKey::Number(n),
            None => CellKey::Text {
                folded: collation_key(text),
                lower: text.to_lowercase(),
            },
        }
    }

    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellKey::Number(a), CellKey::Number(b)) => a.total_cmp(b),
            (CellKey::Number(_), CellKey::Text { .. }) => Ordering::Less,
            (CellKey::Text { .. }, CellKey::Number(_)) => Ordering::Greater,
            (
                CellKey::Text { folded: a, lower: al },
                CellKey::Text { folded: b, lower: bl },
            ) => a.cmp(b).then_with(|| al.cmp(bl)),
        }
    }
}

/// Compare two cell texts in ascending order.
pub fn compare_cell_text(a: &str, b: &str) -> Ordering {
    CellKey::new(a.trim()).cmp(&CellKey::new(b.trim()))
}

/// Reorder `order` (indices into `rows`) by the text of column `col`.
/// Equal keys keep their current relative order.
pub fn sort_rows(rows: &[RenderedRow], order: &mut [usize], col: usize, direction: SortDirection) {
    let keys: Vec<CellKey> = rows
        .iter()
        .map(|r| CellKey::new(r.cell_text(col)))
        .collect();
    let key = |idx: usize| keys.get(idx);
    order.sort_by(|&a, &b| {
        let ord = match (key(a), key(b)) {
            (Some(ka), Some(kb)) => ka.cmp(kb),
            _ => a.cmp(&b),
        };
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
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
    use crate::render::RenderedCell;
    use crate::types::Align;
    use test_case::test_case;

    fn rows(values: &[&str]) -> Vec<RenderedRow> {
        values
            .iter()
            .map(|v| RenderedRow {
                cells: vec![RenderedCell {
                    html: (*v).to_string(),
                    text: (*v).to_string(),
                    align: Align::Left,
                }],
            })
            .collect()
    }

    fn sorted(values: &[&str], direction: SortDirection) -> Vec<String> {
        let rows = rows(values);
        let mut order: Vec<usize> = (0..rows.len()).collect();
        sort_rows(&rows, &mut order, 0, direction);
        order.iter().map(|&i| values[i].to_string()).collect()
    }

    #[test]
    fn test_currency_sorts_numerically() {
        assert_eq!(
            sorted(&["$10", "$2", "$100"], SortDirection::Ascending),
            vec!["$2", "$10", "$100"]
        );
        assert_eq!(
            sorted(&["$10", "$2", "$100"], SortDirection::Descending),
            vec!["$100", "$10", "$2"]
        );
    }

    #[test]
    fn test_text_is_case_insensitive() {
        assert_eq!(
            sorted(&["banana", "Apple", "cherry"], SortDirection::Ascending),
            vec!["Apple", "banana", "cherry"]
        );
    }

    #[test]
    fn test_accents_fold() {
        assert_eq!(
            sorted(&["Zoe", "Émile", "Eve"], SortDirection::Ascending),
            vec!["Émile", "Eve", "Zoe"]
        );
    }

    #[test]
    fn test_stable_on_ties() {
        let values = ["b", "A", "a", "B"];
        let rows = rows(&values);
        let mut order: Vec<usize> = (0..4).collect();
        sort_rows(&rows, &mut order, 0, SortDirection::Ascending);
        // A and a tie, as do b and B
        assert_eq!(order, vec![1, 2, 0, 3]);
        sort_rows(&rows, &mut order, 0, SortDirection::Descending);
        assert_eq!(order, vec![0, 3, 1, 2]);
    }

    #[test]
    fn test_mixed_column_numbers_first() {
        assert_eq!(
            sorted(&["n/a", "5%", "1,200", "-3"], SortDirection::Ascending),
            vec!["-3", "5%", "1,200", "n/a"]
        );
    }

    #[test_case("1,000", "999", Ordering::Greater ; "grouped")]
    #[test_case(" 12 ", "12.0", Ordering::Equal ; "whitespace")]
    #[test_case("10abc", "9abc", Ordering::Less ; "prefix numbers are text")]
    #[test_case("€5", "£4", Ordering::Greater ; "other currencies")]
    fn test_compare_cell_text(a: &str, b: &str, expected: Ordering) {
        assert_eq!(compare_cell_text(a, b), expected);
    }

    #[test]
    fn test_click_cycle() {
        let mut state = SortState::new();
        assert_eq!(state.indicator(0), None);
        assert_eq!(state.click(0), SortDirection::Ascending);
        assert_eq!(state.click(0), SortDirection::Descending);
        assert_eq!(state.click(0), SortDirection::Ascending);
        assert_eq!(state.click(2), SortDirection::Ascending);
        assert_eq!(state.indicator(0), None);
        assert_eq!(state.indicator(2), Some(SortDirection::Ascending));
    }
}
