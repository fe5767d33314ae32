//! Compact variant of the public collection page: a numbered list of
//! [`CompactLinkCard`]s under a centred heading card.

use maud::{html, Markup};

use crate::components::{BaseLayout, CompactLinkCard};
use crate::db::{Collection, LinkWithTags, SearchFilter, Sort, User};

#[derive(Debug, Clone)]
pub struct CompactCollectionView<'a> {
    pub collection: &'a Collection,
    pub links: &'a [LinkWithTags],
    pub search: Option<&'a str>,
    pub filter: SearchFilter,
    pub sort: Sort,
    pub viewer: Option<&'a User>,
}

#[must_use]
pub fn render_compact_collection(view: &CompactCollectionView<'_>) -> Markup {
    let collection = view.collection;
    let collections = std::slice::from_ref(collection);
    let page_path = format!("/public/collections/{}/compact", collection.id);

    let content = html! {
        div class="compact-collection" {
            article class="collection-card" {
                h1 { (collection.name) }
                @if !collection.description.is_empty() {
                    p { (collection.description) }
                }
            }
            (render_search_form(view, &page_path))
            @if view.links.is_empty() {
                p class="nothing-found" { "Nothing found." }
            } @else {
                div class="compact-links" {
                    @for (count, link) in view.links.iter().enumerate() {
                        (CompactLinkCard::new(link, count, collections, view.viewer))
                    }
                }
            }
        }
    };

    BaseLayout::new(&collection.name, view.viewer).render(content)
}

fn render_search_form(view: &CompactCollectionView<'_>, page_path: &str) -> Markup {
    let toggles = [
        ("name", "Name", view.filter.name),
        ("url", "Link", view.filter.url),
        ("description", "Description", view.filter.description),
        ("textContent", "Full Content", view.filter.text_content),
        ("tags", "Tags", view.filter.tags),
    ];

    html! {
        form class="compact-search" method="get" action=(page_path) {
            input type="search" name="q" placeholder="Search for Links" value=[view.search];
            select name="sort" aria-label="Sort by" {
                @for sort in Sort::ALL {
                    option value=(sort.as_number()) selected[sort == view.sort] { (sort.label()) }
                }
            }
            fieldset class="search-filter" {
                legend { "Search in" }
                // Unchecked boxes are not submitted; this marks their absence as "off".
                input type="hidden" name="filters" value="1";
                @for (name, label, on) in toggles {
                    label {
                        input type="checkbox" name=(name) value="true" checked[on];
                        (label)
                    }
                }
            }
            button type="submit" { "Search" }
        }
    }
}
