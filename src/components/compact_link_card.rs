//! One-line link summary used in numbered lists.

use maud::{html, Markup, Render};

use super::dropdown::{Dropdown, DropdownItem};
use super::format::{format_date, safe_color, safe_href};
use crate::db::{Collection, LinkWithTags, User};

/// Favicon lookup service; the link's origin is appended as the `url` parameter.
const FAVICON_ENDPOINT: &str =
    "https://t2.gstatic.com/faviconV2?client=SOCIAL&type=FAVICON&fallback_opts=TYPE,SIZE,URL";

/// Favicon URL for a link, or `None` when the URL has no usable origin.
#[must_use]
pub fn favicon_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let origin = parsed.origin();
    if !origin.is_tuple() {
        return None;
    }
    Some(format!(
        "{FAVICON_ENDPOINT}&url={}&size=32",
        origin.ascii_serialization()
    ))
}

/// Compact card for a link at position `count` (zero-based) in a list.
///
/// Everything shown is passed in: the owning collection is looked up in
/// `collections` by the link's collection id, and the pin state comes from
/// the link itself. Action menus are only rendered for logged-in viewers.
#[derive(Debug, Clone)]
pub struct CompactLinkCard<'a> {
    link: &'a LinkWithTags,
    count: usize,
    collection: Option<&'a Collection>,
    viewer: Option<&'a User>,
}

impl<'a> CompactLinkCard<'a> {
    #[must_use]
    pub fn new(
        link: &'a LinkWithTags,
        count: usize,
        collections: &'a [Collection],
        viewer: Option<&'a User>,
    ) -> Self {
        let collection = collections.iter().find(|c| c.id == link.link.collection_id);
        Self {
            link,
            count,
            collection,
            viewer,
        }
    }

    /// The menu offered to logged-in viewers.
    #[must_use]
    pub fn actions(&self) -> Dropdown {
        let id = self.link.link.id;
        let pin = if self.link.pinned {
            DropdownItem::request("Unpin", "DELETE", format!("/api/v1/links/{id}/pin"))
        } else {
            DropdownItem::request("Pin to Dashboard", "PUT", format!("/api/v1/links/{id}/pin"))
        };

        Dropdown::new()
            .item(pin)
            .item(DropdownItem::dialog("Edit", edit_dialog_id(id)))
            .item(
                DropdownItem::request("Delete", "DELETE", format!("/api/v1/links/{id}"))
                    .confirm("Delete this link?"),
            )
    }

    fn render_edit_dialog(&self) -> Markup {
        let link = &self.link.link;
        html! {
            dialog id=(edit_dialog_id(link.id)) class="edit-link" {
                form data-action=(format!("/api/v1/links/{}", link.id)) data-method="PUT" {
                    h3 { "Edit Link" }
                    label {
                        "Name"
                        input type="text" name="name" value=(link.name);
                    }
                    label {
                        "URL"
                        input type="url" name="url" value=[link.url.as_deref()];
                    }
                    label {
                        "Description"
                        textarea name="description" rows="3" { (link.description) }
                    }
                    div class="dialog-actions" {
                        button type="button" class="secondary" data-close-dialog { "Cancel" }
                        button type="submit" { "Save Changes" }
                    }
                }
            }
        }
    }
}

fn edit_dialog_id(link_id: i64) -> String {
    format!("edit-link-{link_id}")
}

impl Render for CompactLinkCard<'_> {
    fn render(&self) -> Markup {
        let link = &self.link.link;
        let url = link.url.as_deref();
        let favicon = url.and_then(favicon_url);
        let title = if link.name.is_empty() {
            url.unwrap_or("Untitled")
        } else {
            link.name.as_str()
        };

        html! {
            div class="compact-link-card" id=(format!("link-{}", link.id)) {
                span class="link-count" { (self.count + 1) "." }
                @if let Some(src) = favicon {
                    img class="favicon" src=(src) width="32" height="32" alt="" loading="lazy";
                }
                div class="link-body" {
                    @if let Some(href) = url.and_then(safe_href) {
                        a class="link-name" href=(href) target="_blank" rel="noopener noreferrer" { (title) }
                    } @else {
                        span class="link-name" { (title) }
                    }
                    div class="link-meta" {
                        @if let Some(collection) = self.collection {
                            span class="link-collection" {
                                span class="collection-dot"
                                    style=(format!("background-color: {}", safe_color(&collection.color))) {}
                                (collection.name)
                            }
                        }
                        @if let Some(date) = format_date(&link.created_at) {
                            time datetime=(link.created_at) { (date) }
                        }
                    }
                }
                @if self.viewer.is_some() {
                    (self.actions())
                    (self.render_edit_dialog())
                }
            }
        }
    }
}
