//! Small formatting helpers shared by the components.

use chrono::{DateTime, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Colour used when a collection's stored colour is not a hex colour.
pub const DEFAULT_COLOR: &str = "#0ea5e9";

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid regex"));

/// The colour if it is a `#rgb`/`#rrggbb` value, otherwise [`DEFAULT_COLOR`].
///
/// Colours end up inside inline `style` attributes, so anything else is
/// replaced rather than escaped.
#[must_use]
pub fn safe_color(color: &str) -> &str {
    if HEX_COLOR.is_match(color) {
        color
    } else {
        DEFAULT_COLOR
    }
}

/// Format a stored timestamp as `Jan 5, 2024`.
///
/// Accepts RFC 3339 (`2024-01-05T10:00:00.000Z`) and SQLite's
/// `2024-01-05 10:00:00`.
#[must_use]
pub fn format_date(timestamp: &str) -> Option<String> {
    let naive = DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S"))
        .ok()?;
    Some(naive.format("%b %-d, %Y").to_string())
}

/// Host part of a URL, without a leading `www.`.
#[must_use]
pub fn url_host(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

/// The URL if it is safe to put in an `href`: `http` or `https` only.
///
/// Stored URLs only have to parse, so `javascript:` and `data:` links are
/// rendered as plain text.
#[must_use]
pub fn safe_href(url: &str) -> Option<&str> {
    let parsed = url::Url::parse(url).ok()?;
    matches!(parsed.scheme(), "http" | "https").then_some(url)
}

/// Shorten text to at most `max` characters, appending an ellipsis.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}\u{2026}", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_color() {
        assert_eq!(safe_color("#ff0000"), "#ff0000");
        assert_eq!(safe_color("#ABC"), "#ABC");
        assert_eq!(safe_color("red"), DEFAULT_COLOR);
        assert_eq!(safe_color("#ff0000; background: url(x)"), DEFAULT_COLOR);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-01-05T10:00:00.000Z").as_deref(), Some("Jan 5, 2024"));
        assert_eq!(format_date("2023-12-25 23:59:59").as_deref(), Some("Dec 25, 2023"));
        assert_eq!(format_date("yesterday"), None);
    }

    #[test]
    fn test_url_host() {
        assert_eq!(url_host("https://www.example.com/a?b").as_deref(), Some("example.com"));
        assert_eq!(url_host("not a url"), None);
    }

    #[test]
    fn test_safe_href() {
        assert_eq!(safe_href("https://example.com/a"), Some("https://example.com/a"));
        assert_eq!(safe_href("HTTP://example.com"), Some("HTTP://example.com"));
        assert_eq!(safe_href("javascript:alert(1)"), None);
        assert_eq!(safe_href("JavaScript:alert(1)"), None);
        assert_eq!(safe_href("data:text/html,hi"), None);
        assert_eq!(safe_href("ftp://files.example.com"), None);
        assert_eq!(safe_href("not a url"), None);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd\u{2026}");
    }
}
