//! Absolute-URL validation and link/image markup for `link` and `image`
//! columns.

use crate::markup::{escape_html, escape_url};

/// Components of a syntactically valid absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbsoluteUrl<'a> {
    /// Scheme, as written (e.g. `https`)
    pub scheme: &'a str,
    /// Host component; `None` for schemes without an authority (`mailto:`)
    pub host: Option<&'a str>,
}

/// Schemes accepted without a `//authority` part.
const OPAQUE_SCHEMES: [&str; 3] = ["mailto", "news", "tel"];

/// Parse `value` as an absolute URL.
///
/// Requires a scheme, no whitespace or control characters, and for
/// hierarchical URLs (`scheme://`) a non-empty host. Surrounding whitespace
/// is not trimmed: `" https://a.b"` is not a URL.
pub fn parse_absolute_url(value: &str) -> Option<AbsoluteUrl<'_>> {
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return None;
    }
    let (scheme, rest) = value.split_once(':')?;
    if !is_valid_scheme(scheme) {
        return None;
    }

    if let Some(after) = rest.strip_prefix("//") {
        let authority = after
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default();
        let host_port = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
        let host = strip_port(host_port)?;
        if !is_valid_host(host) {
            // file:///path has an empty host
            return (scheme.eq_ignore_ascii_case("file") && host.is_empty()).then_some(
                AbsoluteUrl {
                    scheme,
                    host: None,
                },
            );
        }
        return Some(AbsoluteUrl {
            scheme,
            host: Some(host),
        });
    }

    let opaque = OPAQUE_SCHEMES
        .iter()
        .any(|s| s.eq_ignore_ascii_case(scheme));
    (opaque && !rest.is_empty()).then_some(AbsoluteUrl { scheme, host: None })
}

/// Whether `value` is a syntactically valid absolute URL.
pub fn is_absolute_url(value: &str) -> bool {
    parse_absolute_url(value).is_some()
}

fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Strip a trailing `:port`. Returns `None` for a malformed port.
fn strip_port(host_port: &str) -> Option<&str> {
    if host_port.starts_with('[') {
        // [ipv6]:port
        let end = host_port.find(']')?;
        let (host, tail) = host_port.split_at(end + 1);
        return match tail.strip_prefix(':') {
            Some(port) if !port.chars().all(|c| c.is_ascii_digit()) => None,
            _ if !tail.is_empty() && !tail.starts_with(':') => None,
            _ => Some(host),
        };
    }
    match host_port.rsplit_once(':') {
        Some((host, port)) => port.chars().all(|c| c.is_ascii_digit()).then_some(host),
        None => Some(host_port),
    }
}

fn is_valid_host(host: &str) -> bool {
    if let Some(inner) = host.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
        return !inner.is_empty() && inner.chars().all(|c| c.is_ascii_hexdigit() || c == ':' || c == '.');
    }
    !host.is_empty()
        && host.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        })
}

/// Hyperlink labelled with the URL's host (or the whole URL when there is
/// none), opening in a new browsing context without an opener reference.
///
/// Returns `None` when `value` is not an absolute URL.
pub fn link_html(value: &str) -> Option<(String, String)> {
    let url = parse_absolute_url(value)?;
    let label = url.host.unwrap_or(value);
    let html = format!(
        r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
        escape_url(value),
        escape_html(label)
    );
    Some((html, label.to_string()))
}

/// Image reference with empty alternative text.
///
/// Returns `None` when `value` is not an absolute URL.
pub fn image_html(value: &str) -> Option<String> {
    is_absolute_url(value).then(|| {
        format!(
            r#"<img src="{}" alt="" class="dt-image">"#,
            escape_url(value)
        )
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("https://example.com", Some("example.com") ; "bare host")]
    #[test_case("http://user:pw@www.example.org:8080/a?b#c", Some("www.example.org") ; "userinfo and port")]
    #[test_case("https://[::1]:443/x", Some("[::1]") ; "ipv6")]
    #[test_case("ftp://files.example.com/pub", Some("files.example.com") ; "other scheme")]
    fn test_hosts(value: &str, host: Option<&str>) {
        assert_eq!(parse_absolute_url(value).unwrap().host, host);
    }

    #[test_case("example.com" ; "no scheme")]
    #[test_case("https://" ; "no host")]
    #[test_case("https://exa mple.com" ; "whitespace")]
    #[test_case(" https://example.com" ; "leading space")]
    #[test_case("https://example.com:80x" ; "bad port")]
    #[test_case("1http://example.com" ; "bad scheme")]
    #[test_case("javascript:alert(1)" ; "opaque script")]
    #[test_case("/relative/path" ; "relative")]
    #[test_case("" ; "empty")]
    fn test_not_urls(value: &str) {
        assert!(!is_absolute_url(value));
    }

    #[test]
    fn test_opaque_schemes() {
        let url = parse_absolute_url("mailto:ann@example.com").unwrap();
        assert_eq!(url.host, None);
        assert!(is_absolute_url("file:///tmp/x.csv"));
    }

    #[test]
    fn test_link_html_uses_host_label() {
        let (html, text) = link_html("https://example.com/page?a=1&b=2").unwrap();
        assert_eq!(
            html,
            r#"<a href="https://example.com/page?a=1&amp;b=2" target="_blank" rel="noopener noreferrer">example.com</a>"#
        );
        assert_eq!(text, "example.com");
    }

    #[test]
    fn test_link_html_without_host_uses_value() {
        let (_, text) = link_html("mailto:ann@example.com").unwrap();
        assert_eq!(text, "mailto:ann@example.com");
    }

    #[test]
    fn test_image_html() {
        assert_eq!(
            image_html("https://cdn.example.com/a.png").unwrap(),
            r#"<img src="https://cdn.example.com/a.png" alt="" class="dt-image">"#
        );
        assert!(image_html("a.png").is_none());
    }
}
