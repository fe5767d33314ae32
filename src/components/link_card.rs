//! Link views for the public collection page.
//!
//! One [`LinkCard`] per link, laid out by [`LinkGrid`] according to the
//! selected [`ViewMode`].

use maud::{html, Markup, Render};

use super::format::{format_date, safe_color, safe_href, truncate, url_host};
use crate::db::{Collection, LinkWithTags, ViewMode};

/// A single link rendered for one of the three view modes.
#[derive(Debug, Clone)]
pub struct LinkCard<'a> {
    pub link: &'a LinkWithTags,
    pub collection: &'a Collection,
    pub mode: ViewMode,
}

impl Render for LinkCard<'_> {
    fn render(&self) -> Markup {
        let link = &self.link.link;
        let url = link.url.as_deref();
        let host = url.and_then(url_host);
        let title = if link.name.is_empty() {
            url.unwrap_or("Untitled")
        } else {
            link.name.as_str()
        };

        html! {
            article class=(format!("link-card link-{}", self.mode.as_str())) id=(format!("link-{}", link.id)) {
                h3 class="link-title" {
                    @if let Some(href) = url.and_then(safe_href) {
                        a href=(href) target="_blank" rel="noopener noreferrer" { (title) }
                    } @else {
                        (title)
                    }
                }
                @if let Some(host) = &host {
                    span class="link-host" { (host) }
                }
                @match self.mode {
                    ViewMode::List => {}
                    ViewMode::Card => {
                        @if !link.description.is_empty() {
                            p class="link-description" { (truncate(&link.description, 160)) }
                        }
                    }
                    ViewMode::Masonry => {
                        @if !link.description.is_empty() {
                            p class="link-description" { (link.description) }
                        }
                    }
                }
                @if !self.link.tags.is_empty() && self.mode != ViewMode::List {
                    ul class="link-tags" {
                        @for tag in &self.link.tags {
                            li { "#" (tag.name) }
                        }
                    }
                }
                footer class="link-meta" {
                    span class="link-collection" {
                        span class="collection-dot"
                            style=(format!("background-color: {}", safe_color(&self.collection.color))) {}
                        (self.collection.name)
                    }
                    @if let Some(date) = format_date(&link.created_at) {
                        time datetime=(link.created_at) { (date) }
                    }
                }
            }
        }
    }
}

/// All links of a collection in the chosen layout.
#[derive(Debug, Clone)]
pub struct LinkGrid<'a> {
    pub links: &'a [LinkWithTags],
    pub collection: &'a Collection,
    pub mode: ViewMode,
}

impl Render for LinkGrid<'_> {
    fn render(&self) -> Markup {
        html! {
            div class=(format!("links links-{}", self.mode.as_str())) {
                @for link in self.links {
                    (LinkCard { link, collection: self.collection, mode: self.mode })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Link, Tag};

    fn collection() -> Collection {
        Collection {
            id: 1,
            name: "Reading".to_string(),
            description: String::new(),
            color: "#123456".to_string(),
            owner_id: 1,
            is_public: true,
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    fn link(description: &str) -> LinkWithTags {
        LinkWithTags {
            link: Link {
                id: 7,
                name: "Rust book".to_string(),
                url: Some("https://www.rust-lang.org/learn".to_string()),
                description: description.to_string(),
                collection_id: 1,
                image: None,
                pdf: None,
                readable: None,
                monolith: None,
                preview: None,
                text_content: None,
                last_preserved: None,
                index_version: None,
                created_at: "2024-03-09T12:00:00.000Z".to_string(),
            },
            tags: vec![Tag {
                id: 1,
                name: "rust".to_string(),
                owner_id: 1,
            }],
            pinned: false,
        }
    }

    #[test]
    fn test_card_mode() {
        let c = collection();
        let l = link("A long description");
        let html = LinkCard { link: &l, collection: &c, mode: ViewMode::Card }
            .render()
            .into_string();

        assert!(html.contains("link-card link-card"));
        assert!(html.contains(r#"href="https://www.rust-lang.org/learn""#));
        assert!(html.contains("rust-lang.org"));
        assert!(html.contains("A long description"));
        assert!(html.contains("#rust"));
        assert!(html.contains("background-color: #123456"));
        assert!(html.contains("Mar 9, 2024"));
    }

    #[test]
    fn test_list_mode_hides_description_and_tags() {
        let c = collection();
        let l = link("hidden text");
        let html = LinkCard { link: &l, collection: &c, mode: ViewMode::List }
            .render()
            .into_string();
        assert!(!html.contains("hidden text"));
        assert!(!html.contains("#rust"));
    }

    #[test]
    fn test_script_url_is_not_linked() {
        let c = collection();
        let mut l = link("");
        l.link.url = Some("javascript:fetch('/api/v1/links/1',{method:'DELETE'})".to_string());
        let html = LinkCard { link: &l, collection: &c, mode: ViewMode::Card }
            .render()
            .into_string();
        assert!(!html.contains("href="));
        assert!(!html.contains("javascript:"));
        assert!(html.contains("Rust book"));
    }

    #[test]
    fn test_grid_layout_class() {
        let c = collection();
        let links = vec![link("")];
        let html = LinkGrid { links: &links, collection: &c, mode: ViewMode::Masonry }
            .render()
            .into_string();
        assert!(html.starts_with(r#"<div class="links links-masonry">"#));
        assert!(!html.contains("link-description"));
    }
}
