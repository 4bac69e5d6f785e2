//! Escaping helpers for embedding values in markup.

/// Escape text for safe embedding in element content or attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Reduce a user-supplied class name to `[A-Za-z0-9_-]`.
///
/// Percent-encoded octets are removed first, so `a%20b` becomes `ab`.
pub fn sanitize_html_class(class: &str) -> String {
    let bytes = class.as_bytes();
    let mut out = String::with_capacity(class.len());
    let mut i = 0;
    while let Some(&b) = bytes.get(i) {
        let is_octet = b == b'%'
            && bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
            && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit);
        if is_octet {
            i += 3;
            continue;
        }
        if b.is_ascii_alphanumeric() || b == b'_' || b == b'-' {
            out.push(char::from(b));
        }
        i += 1;
    }
    out
}

/// Escape a URL for an `href`/`src` attribute, dropping characters that
/// can never appear in a URL.
pub fn escape_url(url: &str) -> String {
    let cleaned: String = url
        .chars()
        .filter(|c| !c.is_control() && !c.is_whitespace() && !matches!(c, '<' | '>' | '"' | '\\' | '`'))
        .collect();
    escape_html(&cleaned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#039;Jerry&#039;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test_case("my-table", "my-table" ; "already clean")]
    #[test_case("my table", "mytable" ; "space removed")]
    #[test_case("a%20b", "ab" ; "octet removed")]
    #[test_case("x\"><script>", "xscript" ; "markup removed")]
    #[test_case("100%", "100" ; "bare percent")]
    fn test_sanitize_html_class(input: &str, expected: &str) {
        assert_eq!(sanitize_html_class(input), expected);
    }

    #[test]
    fn test_escape_url() {
        assert_eq!(
            escape_url("https://example.com/?a=1&b=\"2\""),
            "https://example.com/?a=1&amp;b=2"
        );
    }
}
