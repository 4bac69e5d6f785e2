//! Shared helpers for reading HTML fragments with quick-xml.
//!
//! quick-xml is an XML reader; these helpers make it tolerant enough for
//! hand-pasted HTML: end-tag names are not checked, tag names are compared
//! case-insensitively, HTML named entities resolve, stray `<` characters
//! stay text, and undecodable text is kept verbatim instead of failing.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, BytesText};
use quick_xml::Reader;

/// Elements that never have content or an end tag in HTML.
pub const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Escape every `<` that cannot open a tag, comment or declaration.
///
/// quick-xml treats any `<` as markup, while HTML keeps a stray one as text
/// (`1 < 2`, `a<b`). Feed the result to [`html_reader`].
pub fn escape_stray_lt(input: &str) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    let mut out: Option<String> = None;
    let mut last = 0;
    for (i, _) in input.match_indices('<') {
        if opens_markup(bytes.get(i + 1..).unwrap_or_default()) {
            continue;
        }
        let buf = out.get_or_insert_with(|| String::with_capacity(input.len() + 8));
        buf.push_str(input.get(last..i).unwrap_or_default());
        buf.push_str("&lt;");
        last = i + 1;
    }
    match out {
        Some(mut buf) => {
            buf.push_str(input.get(last..).unwrap_or_default());
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(input),
    }
}

/// Whether the bytes after a `<` start markup.
fn opens_markup(rest: &[u8]) -> bool {
    match rest.first() {
        Some(b'!' | b'?') => true,
        Some(b'/') => is_tag_name(rest.get(1..).unwrap_or_default()),
        _ => is_tag_name(rest),
    }
}

/// A letter, then letters, digits or `-`, ended by whitespace, `/` or `>`.
fn is_tag_name(rest: &[u8]) -> bool {
    if !rest.first().is_some_and(u8::is_ascii_alphabetic) {
        return false;
    }
    rest.iter()
        .find(|b| !(b.is_ascii_alphanumeric() || **b == b'-'))
        .is_some_and(|b| b.is_ascii_whitespace() || matches!(b, b'/' | b'>'))
}

/// A reader configured for loosely-formed HTML.
///
/// Pass input through [`escape_stray_lt`] first.
pub fn html_reader(input: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(input);
    reader.trim_text(false);
    reader.check_end_names(false);
    reader.expand_empty_elements(false);
    reader
}

/// Lowercased local element name.
#[inline]
pub fn tag_name(local: &[u8]) -> String {
    String::from_utf8_lossy(local).to_ascii_lowercase()
}

/// Lowercased local name of a start/empty tag.
#[inline]
pub fn start_name(e: &BytesStart) -> String {
    tag_name(e.local_name().as_ref())
}

pub fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Decode a text node, resolving XML and common HTML entities.
///
/// Falls back to the raw text when decoding fails (a stray `&`, an unknown
/// entity).
pub fn decode_text(e: &BytesText) -> String {
    match e.unescape_with(html_entity) {
        Ok(text) => text.into_owned(),
        Err(_) => String::from_utf8_lossy(e).into_owned(),
    }
}

/// All attributes as lowercase-name/value pairs, skipping malformed ones.
///
/// Unquoted and valueless HTML attributes are accepted.
pub fn attributes(e: &BytesStart) -> Vec<(String, String)> {
    e.html_attributes()
        .flatten()
        .map(|attr| {
            let name = tag_name(attr.key.local_name().as_ref());
            let value = match attr.unescape_value() {
                Ok(v) => v.into_owned(),
                Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
            };
            (name, value)
        })
        .collect()
}

/// Named HTML entities beyond the five XML ones.
pub fn html_entity(name: &str) -> Option<&'static str> {
    Some(match name {
        "nbsp" => "\u{a0}",
        "copy" => "\u{a9}",
        "reg" => "\u{ae}",
        "trade" => "\u{2122}",
        "hellip" => "\u{2026}",
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "laquo" => "\u{ab}",
        "raquo" => "\u{bb}",
        "middot" => "\u{b7}",
        "bull" => "\u{2022}",
        "deg" => "\u{b0}",
        "times" => "\u{d7}",
        "divide" => "\u{f7}",
        "euro" => "\u{20ac}",
        "pound" => "\u{a3}",
        "yen" => "\u{a5}",
        "cent" => "\u{a2}",
        "sect" => "\u{a7}",
        "para" => "\u{b6}",
        _ => return None,
    })
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
    use quick_xml::events::Event;

    fn first_start(html: &str) -> BytesStart<'_> {
        let mut reader = html_reader(html);
        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => return e,
                Ok(Event::Eof) | Err(_) => panic!("no start tag in {html}"),
                _ => {}
            }
        }
    }

    fn first_text(html: &str) -> String {
        let mut reader = html_reader(html);
        loop {
            match reader.read_event() {
                Ok(Event::Text(e)) => return decode_text(&e),
                Ok(Event::Eof) | Err(_) => panic!("no text in {html}"),
                _ => {}
            }
        }
    }

    #[test]
    fn test_start_name_lowercased() {
        assert_eq!(start_name(&first_start("<TD class=x>")), "td");
    }

    #[test]
    fn test_unquoted_and_bare_attributes() {
        let e = first_start("<a HREF=https://x.y title=\"A &amp; B\" download>");
        let attrs = attributes(&e);
        let names: Vec<&str> = attrs.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["href", "title", "download"]);
        assert_eq!(attrs[0].1, "https://x.y");
        assert_eq!(attrs[1].1, "A & B");
    }

    #[test]
    fn test_decode_text_entities() {
        assert_eq!(first_text("<p>Fish &amp; Chips</p>"), "Fish & Chips");
        assert_eq!(first_text("<p>a&nbsp;b</p>"), "a\u{a0}b");
        assert_eq!(first_text("<p>&#36;5</p>"), "$5");
    }

    #[test]
    fn test_decode_text_keeps_stray_ampersand() {
        assert_eq!(first_text("<p>Tom & Jerry</p>"), "Tom & Jerry");
    }

    #[test]
    fn test_stray_lt_escaped() {
        assert_eq!(escape_stray_lt("1 < 2"), "1 &lt; 2");
        assert_eq!(escape_stray_lt("a<b</td>"), "a&lt;b</td>");
        assert_eq!(escape_stray_lt("x <3"), "x &lt;3");
        assert_eq!(escape_stray_lt("trailing <"), "trailing &lt;");
    }

    #[test]
    fn test_real_markup_untouched() {
        let html = "<TD class=x><br/><!-- c --></td><h1>t</h1><my-tag>";
        assert!(matches!(escape_stray_lt(html), Cow::Borrowed(_)));
    }

    #[test]
    fn test_decoded_stray_lt_is_text() {
        let prepared = escape_stray_lt("<p>1 < 2</p>");
        assert_eq!(first_text(&prepared), "1 < 2");
    }

    #[test]
    fn test_void_elements() {
        assert!(is_void("br"));
        assert!(is_void("img"));
        assert!(!is_void("td"));
    }
}
