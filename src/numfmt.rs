//! Numeric parsing and fixed-decimal formatting.
//!
//! Two different numeric tests live here:
//! - [`parse_numeric`] is strict and used for display formatting: currency
//!   symbols, grouping separators and `%` make a value non-numeric.
//! - [`parse_sort_number`] is loose and used when ordering rendered cells:
//!   those decorations are stripped before parsing.

/// Symbols removed from rendered text before a numeric sort comparison.
const SORT_STRIP: [char; 6] = ['$', '€', '£', '¥', ',', '%'];

/// Strict numeric test: surrounding whitespace is ignored, the rest must be
/// a finite decimal or exponent number.
pub fn parse_numeric(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    // Rust accepts "inf"/"nan" spellings; only digits-based forms count.
    if !trimmed.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Loose numeric extraction from displayed text (`"$1,234.50"` -> 1234.5).
pub fn parse_sort_number(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && !SORT_STRIP.contains(c))
        .collect();
    parse_numeric(&cleaned)
}

/// Round a non-negative finite value half away from zero at `decimals`
/// places, working on its shortest decimal form so `1.005` rounds up.
/// Returns the integer digits and exactly `decimals` fraction digits.
fn round_decimal(abs_value: f64, decimals: usize) -> (String, String) {
    let repr = abs_value.to_string();
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(decimals))
        .collect();

    if frac_part.as_bytes().get(decimals).is_some_and(|d| *d >= b'5') {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let frac = digits.split_off(digits.len().saturating_sub(decimals));
    (
        String::from_utf8_lossy(&digits).into_owned(),
        String::from_utf8_lossy(&frac).into_owned(),
    )
}

/// Format with `,` thousands separators and exactly `decimals` places.
pub fn format_with_thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let (int_part, dec_part) = round_decimal(value.abs(), decimals);

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let is_zero = !int_part.bytes().chain(dec_part.bytes()).any(|d| d != b'0');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    if dec_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{dec_part}")
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("42", Some(42.0) ; "integer")]
    #[test_case("  -3.5 ", Some(-3.5) ; "trimmed negative")]
    #[test_case(".5", Some(0.5) ; "leading dot")]
    #[test_case("1e3", Some(1000.0) ; "exponent")]
    #[test_case("$5", None ; "currency symbol")]
    #[test_case("50%", None ; "percent sign")]
    #[test_case("1,000", None ; "grouping")]
    #[test_case("inf", None ; "infinity spelling")]
    #[test_case("NaN", None ; "nan spelling")]
    #[test_case("", None ; "empty")]
    #[test_case("abc", None ; "text")]
    fn test_parse_numeric(input: &str, expected: Option<f64>) {
        assert_eq!(parse_numeric(input), expected);
    }

    #[test_case("$1,234.50", Some(1234.5) ; "currency")]
    #[test_case("12.5%", Some(12.5) ; "percent")]
    #[test_case("€ 3", Some(3.0) ; "euro with space")]
    #[test_case("£-2", Some(-2.0) ; "pound negative")]
    #[test_case("¥1 000", Some(1000.0) ; "yen spaced")]
    #[test_case("N/A", None ; "not a number")]
    #[test_case("", None ; "empty")]
    fn test_parse_sort_number(input: &str, expected: Option<f64>) {
        assert_eq!(parse_sort_number(input), expected);
    }

    #[test_case(1234.5, 0, "1,235" ; "half rounds away")]
    #[test_case(1234.5, 2, "1,234.50" ; "two places")]
    #[test_case(999.0, 0, "999" ; "no separator")]
    #[test_case(1_000_000.0, 0, "1,000,000" ; "millions")]
    #[test_case(-1234.567, 1, "-1,234.6" ; "negative")]
    #[test_case(-0.4, 0, "0" ; "negative zero")]
    #[test_case(50.0, 1, "50.0" ; "one place")]
    #[test_case(1.005, 2, "1.01" ; "decimal half rounds up")]
    #[test_case(9.995, 2, "10.00" ; "carry into integer")]
    #[test_case(999_999.5, 0, "1,000,000" ; "carry adds a group")]
    #[test_case(1e20, 2, "100,000,000,000,000,000,000.00" ; "large")]
    #[test_case(0.000_000_1, 1, "0.0" ; "tiny")]
    fn test_format_with_thousands(value: f64, decimals: usize, expected: &str) {
        assert_eq!(format_with_thousands(value, decimals), expected);
    }

    #[test]
    fn test_format_near_max_stays_finite() {
        let out = format_with_thousands(1e308, 2);
        assert!(out.starts_with("100,000,"));
        assert!(out.ends_with(",000.00"));
        assert_eq!(out.matches(',').count(), 102);
    }
}
