//! Allow-list markup sanitizer for `html` columns.
//!
//! Allowed elements are re-emitted with only their allowed attributes;
//! disallowed elements are unwrapped (their text survives) except for
//! script-like elements, whose content is dropped entirely. Unclosed allowed
//! elements are closed at the end of the fragment, so the output is always
//! balanced.

use quick_xml::events::{BytesStart, Event};

use crate::markup::{escape_html, escape_url};
use crate::xml_helpers::{
    attributes, decode_text, escape_stray_lt, html_reader, is_void, start_name, tag_name,
};

/// Attributes allowed on every allowed element.
const GLOBAL_ATTRS: [&str; 4] = ["class", "title", "lang", "dir"];

/// Allowed elements and their element-specific attributes.
const ALLOWED: &[(&str, &[&str])] = &[
    ("a", &["href", "target", "rel"]),
    ("abbr", &[]),
    ("b", &[]),
    ("blockquote", &["cite"]),
    ("br", &[]),
    ("cite", &[]),
    ("code", &[]),
    ("del", &["datetime"]),
    ("div", &[]),
    ("em", &[]),
    ("h1", &[]),
    ("h2", &[]),
    ("h3", &[]),
    ("h4", &[]),
    ("h5", &[]),
    ("h6", &[]),
    ("hr", &[]),
    ("i", &[]),
    ("img", &["src", "alt", "width", "height"]),
    ("ins", &["datetime"]),
    ("kbd", &[]),
    ("li", &[]),
    ("mark", &[]),
    ("ol", &["start", "reversed"]),
    ("p", &[]),
    ("pre", &[]),
    ("q", &["cite"]),
    ("s", &[]),
    ("small", &[]),
    ("span", &[]),
    ("strong", &[]),
    ("sub", &[]),
    ("sup", &[]),
    ("u", &[]),
    ("ul", &[]),
];

/// Elements removed together with everything inside them.
const DROP_CONTENT: [&str; 7] = [
    "script", "style", "iframe", "object", "template", "noscript", "textarea",
];

/// URL schemes allowed in `href`/`src`/`cite`.
const ALLOWED_SCHEMES: [&str; 5] = ["http", "https", "mailto", "tel", "ftp"];

const URL_ATTRS: [&str; 3] = ["href", "src", "cite"];

/// Sanitized markup plus its visible text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sanitized {
    pub html: String,
    pub text: String,
}

fn allowed(name: &str) -> Option<(&'static str, &'static [&'static str])> {
    ALLOWED.iter().find(|(tag, _)| *tag == name).copied()
}

/// Whether a URL attribute value is relative or uses an allowed scheme.
fn is_safe_url(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    let scheme_end = compact.find(':');
    let path_start = compact.find(['/', '?', '#']);
    match (scheme_end, path_start) {
        (Some(colon), Some(slash)) if slash < colon => true,
        (Some(colon), _) => {
            let scheme = compact.get(..colon).unwrap_or_default();
            ALLOWED_SCHEMES
                .iter()
                .any(|s| s.eq_ignore_ascii_case(scheme))
        }
        (None, _) => true,
    }
}

fn push_open_tag(out: &mut String, tag: &str, extra: &[&str], e: &BytesStart) {
    out.push('<');
    out.push_str(tag);
    for (name, value) in attributes(e) {
        let name = name.as_str();
        if !GLOBAL_ATTRS.contains(&name) && !extra.contains(&name) {
            continue;
        }
        let escaped = if URL_ATTRS.contains(&name) {
            if !is_safe_url(&value) {
                continue;
            }
            escape_url(&value)
        } else {
            escape_html(&value)
        };
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escaped);
        out.push('"');
    }
    out.push('>');
}

/// Sanitize an HTML fragment against the built-in allow-list.
pub fn sanitize_html(input: &str) -> Sanitized {
    let prepared = escape_stray_lt(input);
    let mut reader = html_reader(&prepared);
    let mut out = Sanitized::default();
    let mut open: Vec<&'static str> = Vec::new();
    // (element name, nesting depth) while inside a dropped element
    let mut skipping: Option<(String, usize)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = start_name(&e);
                if let Some((skip, depth)) = skipping.as_mut() {
                    if *skip == name {
                        *depth += 1;
                    }
                    continue;
                }
                if DROP_CONTENT.contains(&name.as_str()) {
                    skipping = Some((name, 1));
                    continue;
                }
                if let Some((tag, extra)) = allowed(&name) {
                    push_open_tag(&mut out.html, tag, extra, &e);
                    if !is_void(tag) {
                        open.push(tag);
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                if skipping.is_some() {
                    continue;
                }
                let name = start_name(&e);
                if let Some((tag, extra)) = allowed(&name) {
                    push_open_tag(&mut out.html, tag, extra, &e);
                    if !is_void(tag) {
                        out.html.push_str("</");
                        out.html.push_str(tag);
                        out.html.push('>');
                    }
                }
            }
            Ok(Event::End(e)) => {
                let name = tag_name(e.local_name().as_ref());
                if let Some((skip, depth)) = skipping.as_mut() {
                    if *skip == name {
                        *depth -= 1;
                        if *depth == 0 {
                            skipping = None;
                        }
                    }
                    continue;
                }
                if let Some(pos) = open.iter().rposition(|t| *t == name) {
                    for tag in open.drain(pos..).rev() {
                        out.html.push_str("</");
                        out.html.push_str(tag);
                        out.html.push('>');
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if skipping.is_none() {
                    let text = decode_text(&e);
                    out.html.push_str(&escape_html(&text));
                    out.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if skipping.is_none() {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    out.html.push_str(&escape_html(&text));
                    out.text.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                tracing::debug!(error = %err, "html sanitizer stopped on malformed markup");
                break;
            }
            _ => {}
        }
    }

    for tag in open.into_iter().rev() {
        out.html.push_str("</");
        out.html.push_str(tag);
        out.html.push('>');
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_allowed_markup_kept() {
        let s = sanitize_html("<strong>Bold</strong> and <em>em</em>");
        assert_eq!(s.html, "<strong>Bold</strong> and <em>em</em>");
        assert_eq!(s.text, "Bold and em");
    }

    #[test]
    fn test_script_removed_with_content() {
        let s = sanitize_html("Hi<script>alert(1)</script>!");
        assert_eq!(s.html, "Hi!");
        assert_eq!(s.text, "Hi!");
    }

    #[test]
    fn test_unknown_tags_unwrapped() {
        let s = sanitize_html("<blink>Look</blink> <font color=red>here</font>");
        assert_eq!(s.html, "Look here");
    }

    #[test]
    fn test_event_handler_attributes_stripped() {
        let s = sanitize_html(r#"<a href="https://x.y" onclick="evil()" class="c">x</a>"#);
        assert_eq!(s.html, r#"<a href="https://x.y" class="c">x</a>"#);
    }

    #[test_case(r#"<a href="javascript:alert(1)">x</a>"#, "<a>x</a>" ; "javascript scheme")]
    #[test_case(r#"<a href=" JaVaScRiPt:alert(1)">x</a>"#, "<a>x</a>" ; "obfuscated scheme")]
    #[test_case(r#"<img src="data:image/png;base64,AAAA">"#, "<img>" ; "data uri")]
    #[test_case(r#"<a href="/docs/a:b">x</a>"#, r#"<a href="/docs/a:b">x</a>"# ; "relative with colon")]
    #[test_case(r#"<a href="mailto:a@b.c">x</a>"#, r#"<a href="mailto:a@b.c">x</a>"# ; "mailto")]
    fn test_url_attributes(input: &str, expected: &str) {
        assert_eq!(sanitize_html(input).html, expected);
    }

    #[test]
    fn test_unclosed_tags_balanced() {
        let s = sanitize_html("<p>one<br>two<b>bold");
        assert_eq!(s.html, "<p>one<br>two<b>bold</b></p>");
    }

    #[test]
    fn test_mismatched_close_closes_inner() {
        let s = sanitize_html("<p><b>x</p>y");
        assert_eq!(s.html, "<p><b>x</b></p>y");
    }

    #[test_case("1 < 2", "1 &lt; 2", "1 < 2" ; "spaced")]
    #[test_case("a<b", "a&lt;b", "a<b" ; "unspaced")]
    #[test_case("<b>x</b> <3", "<b>x</b> &lt;3", "x <3" ; "after markup")]
    fn test_stray_lt_is_text(input: &str, html: &str, text: &str) {
        let s = sanitize_html(input);
        assert_eq!(s.html, html);
        assert_eq!(s.text, text);
    }

    #[test]
    fn test_script_with_comparison_dropped_whole() {
        let s = sanitize_html("<script>if (a<b) x()</script>ok");
        assert_eq!(s.html, "ok");
        assert_eq!(s.text, "ok");
    }

    #[test]
    fn test_text_is_escaped() {
        let s = sanitize_html("Fish &amp; Chips &quot;daily&quot;");
        assert_eq!(s.html, "Fish &amp; Chips &quot;daily&quot;");
        assert_eq!(s.text, "Fish & Chips \"daily\"");
    }
}
