//! Base layout components for the web UI.
//!
//! This module provides the HTML skeleton, the navigation bar and the footer
//! shared by every page.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::db::User;

/// Applies a theme chosen in the browser before the body renders. Pages for
/// logged-in viewers already carry the account theme and are left alone.
const THEME_INIT_SCRIPT: &str = r"(function() {
    var root = document.documentElement;
    var theme = localStorage.getItem('theme');
    if (theme && !root.hasAttribute('data-theme-account')) {
        root.setAttribute('data-theme', theme);
    }
})();";

/// Endpoint the theme toggle saves the account theme to.
const THEME_ENDPOINT: &str = "/api/v1/users/me/theme";

/// Base page layout builder.
///
/// The viewer is required so the navigation always reflects whether someone
/// is logged in. Pass `None` for anonymous visitors.
///
/// # Example
///
/// ```ignore
/// use maud::html;
/// use crate::components::BaseLayout;
///
/// let content = html! { h1 { "Hello" } };
/// let page = BaseLayout::new("Reading list", viewer.as_ref()).render(content);
/// ```
#[derive(Debug, Clone)]
pub struct BaseLayout<'a> {
    title: &'a str,
    viewer: Option<&'a User>,
    body_style: Option<String>,
}

impl<'a> BaseLayout<'a> {
    #[must_use]
    pub fn new(title: &'a str, viewer: Option<&'a User>) -> Self {
        Self {
            title,
            viewer,
            body_style: None,
        }
    }

    /// Inline style for the page body, e.g. a collection-coloured gradient.
    #[must_use]
    pub fn with_body_style(mut self, style: impl Into<String>) -> Self {
        self.body_style = Some(style.into());
        self
    }

    fn theme(&self) -> &'static str {
        if self.viewer.is_some_and(User::prefers_dark) {
            "dark"
        } else {
            "light"
        }
    }

    /// Render the complete HTML page with `content` inside `<main>`.
    #[must_use]
    pub fn render(self, content: Markup) -> Markup {
        let full_title = format!("{} | Linkwarden", self.title);

        html! {
            (DOCTYPE)
            html lang="en" data-theme=(self.theme()) data-theme-account[self.viewer.is_some()] {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    meta name="color-scheme" content="light dark";
                    title { (full_title) }
                    meta property="og:title" content=(full_title);
                    link rel="stylesheet" href="/static/css/style.css";
                    link rel="icon" href="/static/icon.png";
                    script { (PreEscaped(THEME_INIT_SCRIPT)) }
                }
                body style=[self.body_style.as_deref()] {
                    (self.render_header())
                    main class="container" {
                        (content)
                    }
                    (Self::render_footer())
                    script src="/static/js/theme.js" {}
                    script src="/static/js/link-actions.js" {}
                }
            }
        }
    }

    fn render_header(&self) -> Markup {
        html! {
            header class="container" {
                nav {
                    ul {
                        li { a href="/dashboard" { strong class="site-logo" { "Linkwarden" } } }
                    }
                    ul {
                        @if let Some(user) = self.viewer {
                            li { a href="/dashboard" { "Dashboard" } }
                            li { span class="viewer-name" { (user.name) } }
                            li {
                                button class="outline" data-action="/api/v1/session" data-method="DELETE" data-reload="true" {
                                    "Log out"
                                }
                            }
                        } @else {
                            li { a href="/dashboard" { "Login" } }
                        }
                        li {
                            button id="theme-toggle" class="theme-toggle" title="Toggle dark mode" aria-label="Toggle dark mode"
                                data-save=[self.viewer.map(|_| THEME_ENDPOINT)] {
                                "\u{1F313}"
                            }
                        }
                    }
                }
            }
        }
    }

    fn render_footer() -> Markup {
        html! {
            footer class="container" {
                small {
                    "Created with "
                    a href="https://linkwarden.app/" target="_blank" rel="noopener noreferrer" { "Linkwarden" }
                }
            }
        }
    }
}
