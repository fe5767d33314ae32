//! Per-browser display preferences.
//!
//! Sort order and view mode are taken from the query string when present and
//! remembered in long-lived cookies, falling back to the stored cookie and then
//! the defaults.

use axum::http::HeaderMap;

use crate::auth::cookie_value;
use crate::db::{Sort, ViewMode};

pub const SORT_COOKIE: &str = "sortBy";
pub const VIEW_COOKIE: &str = "viewMode";

const ONE_YEAR_SECS: u64 = 60 * 60 * 24 * 365;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    pub sort: Sort,
    pub view_mode: ViewMode,
    sort_from_query: bool,
    view_from_query: bool,
}

impl Preferences {
    /// Resolve preferences from `?sort=` / `?view=` and the request cookies.
    #[must_use]
    pub fn resolve(sort: Option<&str>, view: Option<&str>, headers: &HeaderMap) -> Self {
        let sort_query = sort.filter(|s| !s.trim().is_empty());
        let view_query = view.filter(|s| !s.trim().is_empty());

        let sort = sort_query.map_or_else(
            || {
                cookie_value(headers, SORT_COOKIE)
                    .map(|v| Sort::parse_lenient(&v))
                    .unwrap_or_default()
            },
            Sort::parse_lenient,
        );
        let view_mode = view_query.map_or_else(
            || {
                cookie_value(headers, VIEW_COOKIE)
                    .map(|v| ViewMode::parse_lenient(&v))
                    .unwrap_or_default()
            },
            ViewMode::parse_lenient,
        );

        Self {
            sort,
            view_mode,
            sort_from_query: sort_query.is_some(),
            view_from_query: view_query.is_some(),
        }
    }

    /// `Set-Cookie` values for the preferences that came from the query string.
    #[must_use]
    pub fn set_cookies(&self) -> Vec<String> {
        let mut cookies = Vec::new();
        if self.sort_from_query {
            cookies.push(preference_cookie(SORT_COOKIE, &self.sort.as_number().to_string()));
        }
        if self.view_from_query {
            cookies.push(preference_cookie(VIEW_COOKIE, self.view_mode.as_str()));
        }
        cookies
    }
}

fn preference_cookie(name: &str, value: &str) -> String {
    format!("{name}={value}; Path=/; Max-Age={ONE_YEAR_SECS}; SameSite=Lax")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderValue};

    fn cookies(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_defaults() {
        let prefs = Preferences::resolve(None, None, &HeaderMap::new());
        assert_eq!(prefs.sort, Sort::DateNewestFirst);
        assert_eq!(prefs.view_mode, ViewMode::Card);
        assert!(prefs.set_cookies().is_empty());
    }

    #[test]
    fn test_cookie_fallback() {
        let prefs = Preferences::resolve(None, None, &cookies("sortBy=3; viewMode=list"));
        assert_eq!(prefs.sort, Sort::NameZA);
        assert_eq!(prefs.view_mode, ViewMode::List);
        assert!(prefs.set_cookies().is_empty());
    }

    #[test]
    fn test_query_wins_and_is_written_back() {
        let prefs = Preferences::resolve(
            Some("2"),
            Some("masonry"),
            &cookies("sortBy=3; viewMode=list"),
        );
        assert_eq!(prefs.sort, Sort::NameAZ);
        assert_eq!(prefs.view_mode, ViewMode::Masonry);
        assert_eq!(
            prefs.set_cookies(),
            vec![
                "sortBy=2; Path=/; Max-Age=31536000; SameSite=Lax".to_string(),
                "viewMode=masonry; Path=/; Max-Age=31536000; SameSite=Lax".to_string(),
            ]
        );
    }

    #[test]
    fn test_garbage_falls_back() {
        let prefs = Preferences::resolve(Some("banana"), Some("grid"), &HeaderMap::new());
        assert_eq!(prefs.sort, Sort::DateNewestFirst);
        assert_eq!(prefs.view_mode, ViewMode::Card);
        assert_eq!(prefs.set_cookies()[0], "sortBy=0; Path=/; Max-Age=31536000; SameSite=Lax");
    }
}
