use maud::{html, Markup, Render};

use crate::db::Tag;

/// Distinct tag names, sorted alphabetically ignoring case.
///
/// Tags with the same name owned by different users collapse into one entry.
#[must_use]
pub fn distinct_tag_names(tags: &[Tag]) -> Vec<String> {
    let mut names: Vec<String> = tags.iter().map(|t| t.name.clone()).collect();
    names.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
    names.dedup();
    names
}

/// Horizontal bar of tag filters linking to `?q={tag}`.
///
/// Renders nothing when there are no tags.
#[derive(Debug, Clone)]
pub struct TagFilterBar<'a> {
    names: Vec<String>,
    active: Option<&'a str>,
    base_path: &'a str,
}

impl<'a> TagFilterBar<'a> {
    #[must_use]
    pub fn new(tags: &[Tag], active: Option<&'a str>, base_path: &'a str) -> Self {
        Self {
            names: distinct_tag_names(tags),
            active: active.filter(|q| !q.is_empty()),
            base_path,
        }
    }
}

impl Render for TagFilterBar<'_> {
    fn render(&self) -> Markup {
        if self.names.is_empty() {
            return html! {};
        }

        html! {
            nav class="tag-bar" aria-label="Tags" {
                a href=(self.base_path)
                    class=(if self.active.is_none() { "tag-filter active" } else { "tag-filter" }) {
                    "All Links"
                }
                @for name in &self.names {
                    @let active = self.active == Some(name.as_str());
                    a href=(format!("{}?q={}", self.base_path, urlencoding::encode(name)))
                        class=(if active { "tag-filter active" } else { "tag-filter" }) {
                        "#" (name)
                    }
                }
            }
        }
    }
}
