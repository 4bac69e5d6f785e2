//! Key derivation from free-text labels.
//!
//! Imported columns use `-` as separator (`"First Name"` -> `first-name`);
//! keys suggested for manually added columns use `_` (`first_name`).
//! Diacritics are folded away before filtering, so `Café` -> `cafe`. Other
//! letters and digits are kept lowercased whatever their script
//! (`Größe` -> `große`, `名前` -> `名前`).

use unicode_normalization::UnicodeNormalization;

/// Separator used for imported column keys.
pub const IMPORT_SEPARATOR: char = '-';
/// Separator used for suggested manual column keys.
pub const SUGGEST_SEPARATOR: char = '_';

/// Slugify with the import separator.
pub fn slugify(text: &str) -> String {
    slugify_with(text, IMPORT_SEPARATOR)
}

/// Advisory key for a manually added column. The caller may override it;
/// `GridModel::add_column` performs no slugification of its own.
pub fn suggest_key(label: &str) -> String {
    slugify_with(label, SUGGEST_SEPARATOR)
}

/// Lowercase, fold accents, collapse every run of non-alphanumeric
/// characters into one `sep`, and drop leading/trailing separators.
pub fn slugify_with(text: &str, sep: char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_sep = false;

    for ch in text
        .nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
    {
        if ch.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push(sep);
            }
            pending_sep = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Positional fallback key (`col_1`, `col_2`, ...), 1-based.
pub fn fallback_key(index: usize) -> String {
    format!("col_{}", index + 1)
}

/// Derive unique keys for a list of labels.
///
/// Labels that slugify to nothing get their positional key; collisions get a
/// numeric suffix (`name`, `name-2`, `name-3`).
pub fn keys_for_labels<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::with_capacity(labels.len());
    for (index, label) in labels.iter().enumerate() {
        let mut key = slugify(label.as_ref());
        if key.is_empty() {
            key = fallback_key(index);
        }
        if keys.contains(&key) {
            let base = key;
            let mut n = 2;
            loop {
                let candidate = format!("{base}{IMPORT_SEPARATOR}{n}");
                if !keys.contains(&candidate) {
                    key = candidate;
                    break;
                }
                n += 1;
            }
        }
        keys.push(key);
    }
    keys
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Name", "name" ; "single word")]
    #[test_case("First Name", "first-name" ; "space")]
    #[test_case("  Unit Price ($) ", "unit-price" ; "symbols trimmed")]
    #[test_case("a -- b", "a-b" ; "runs collapse")]
    #[test_case("Café Crème", "cafe-creme" ; "accents folded")]
    #[test_case("Größe", "große" ; "sharp s kept")]
    #[test_case("名前 (JP)", "名前-jp" ; "non latin kept")]
    #[test_case("Имя Фамилия", "имя-фамилия" ; "cyrillic lowercased")]
    #[test_case("%%%", "" ; "nothing usable")]
    #[test_case("", "" ; "empty")]
    fn test_slugify(input: &str, expected: &str) {
        assert_eq!(slugify(input), expected);
    }

    #[test_case("first-name")]
    #[test_case("col_3")]
    #[test_case("a1-b2-c3")]
    #[test_case("Straße 名前")]
    fn test_slugify_is_idempotent(input: &str) {
        let once = slugify(input);
        assert_eq!(slugify(&once), once);
    }

    #[test]
    fn test_suggest_key_uses_underscores() {
        assert_eq!(suggest_key("Unit Price"), "unit_price");
        assert_eq!(suggest_key("_Total_"), "total");
        let k = suggest_key("Year over Year %");
        assert_eq!(suggest_key(&k), k);
    }

    #[test]
    fn test_keys_for_labels_fallback_and_dedupe() {
        let keys = keys_for_labels(&["Name", "", "Name", "???", "Name"]);
        assert_eq!(keys, vec!["name", "col_2", "name-2", "col_4", "name-3"]);
    }
}
