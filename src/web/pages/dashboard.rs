//! Dashboard: the viewer's collections and pinned links, or a login form for
//! anonymous visitors.

use maud::{html, Markup};

use crate::components::{safe_color, BaseLayout, CompactLinkCard};
use crate::db::{Collection, LinkWithTags, User};

#[derive(Debug, Clone)]
pub struct DashboardView<'a> {
    pub viewer: &'a User,
    pub collections: &'a [Collection],
    pub pinned: &'a [LinkWithTags],
}

#[must_use]
pub fn render_dashboard(view: &DashboardView<'_>) -> Markup {
    let content = html! {
        h1 { "Dashboard" }
        section class="dashboard-collections" {
            h2 { "Collections" }
            @if view.collections.is_empty() {
                p class="empty" { "No collections yet." }
            } @else {
                ul class="collection-list" {
                    @for c in view.collections {
                        li {
                            span class="collection-dot"
                                style=(format!("background-color: {}", safe_color(&c.color))) {}
                            @if c.is_public {
                                a href=(format!("/public/collections/{}", c.id)) { (c.name) }
                            } @else {
                                (c.name)
                            }
                        }
                    }
                }
            }
        }
        section class="dashboard-pinned" {
            h2 { "Pinned Links" }
            @if view.pinned.is_empty() {
                p class="empty" { "Pin your favorite links here." }
            } @else {
                div class="compact-links" {
                    @for (count, link) in view.pinned.iter().enumerate() {
                        (CompactLinkCard::new(link, count, view.collections, Some(view.viewer)))
                    }
                }
            }
        }
    };

    BaseLayout::new("Dashboard", Some(view.viewer)).render(content)
}

#[must_use]
pub fn render_login(error: Option<&str>) -> Markup {
    let content = html! {
        article class="login-card" {
            h1 { "Login" }
            @if let Some(message) = error {
                p class="error" role="alert" { (message) }
            }
            form method="post" action="/login" {
                label {
                    "Username"
                    input type="text" name="username" required autocomplete="username";
                }
                label {
                    "Password"
                    input type="password" name="password" required autocomplete="current-password";
                }
                button type="submit" { "Login" }
            }
        }
    };

    BaseLayout::new("Login", None).render(content)
}
