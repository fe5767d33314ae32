//! Public collection page.

use maud::{html, Markup, Render};

use crate::components::{
    safe_color, BaseLayout, LinkGrid, MoreMembers, ProfilePhoto, TagFilterBar,
};
use crate::db::{CollectionWithMembers, LinkWithTags, MemberWithUser, PublicUser, Sort, Tag, User, ViewMode};
use crate::web::preferences::Preferences;

/// Member avatars shown before collapsing the rest into a `+N` bubble.
const VISIBLE_MEMBERS: usize = 3;

/// Everything the public collection page shows, loaded up front.
#[derive(Debug, Clone)]
pub struct PublicCollectionView<'a> {
    pub collection: &'a CollectionWithMembers,
    pub owner: Option<&'a PublicUser>,
    pub links: &'a [LinkWithTags],
    pub tags: &'a [Tag],
    pub search: Option<&'a str>,
    pub preferences: Preferences,
    pub viewer: Option<&'a User>,
    /// Absolute URL of this page, shown in the sharing panel.
    pub share_url: String,
    pub show_sharing: bool,
}

/// `By {owner}`, followed by how many members share the collection.
#[must_use]
pub fn byline(owner_name: &str, member_count: usize) -> String {
    match member_count {
        0 => format!("By {owner_name}"),
        1 => format!("By {owner_name} and 1 other"),
        n => format!("By {owner_name} and {n} others"),
    }
}

#[must_use]
pub fn search_placeholder(link_count: i64) -> String {
    if link_count == 1 {
        "Search 1 Link".to_string()
    } else {
        format!("Search {link_count} Links")
    }
}

/// Page background fading from the collection colour into the theme colours.
#[must_use]
pub fn background_gradient(color: &str, dark: bool) -> String {
    let (middle, end) = if dark {
        ("#262626", "#171717")
    } else {
        ("#f3f4f6", "#ffffff")
    };
    format!(
        "background-image: linear-gradient({}30 10%, {middle} 13rem, {end} 100%)",
        safe_color(color)
    )
}

/// The first members by user id, and how many are left over.
#[must_use]
pub fn visible_members(members: &[MemberWithUser]) -> (Vec<&MemberWithUser>, usize) {
    let mut sorted: Vec<&MemberWithUser> = members.iter().collect();
    sorted.sort_by_key(|m| m.member.user_id);
    let rest = sorted.len().saturating_sub(VISIBLE_MEMBERS);
    sorted.truncate(VISIBLE_MEMBERS);
    (sorted, rest)
}

#[must_use]
pub fn render_public_collection(view: &PublicCollectionView<'_>) -> Markup {
    let collection = &view.collection.collection;
    let page_path = format!("/public/collections/{}", collection.id);
    let dark = view.viewer.is_some_and(User::prefers_dark);

    let content = html! {
        div class="public-collection" {
            (render_header(view, &page_path))
            @if view.show_sharing {
                (render_sharing_panel(view, &page_path))
            }
            hr;
            (TagFilterBar::new(view.tags, view.search, &page_path))
            (render_toolbar(view, &page_path))
            @if view.links.is_empty() {
                p class="nothing-found" { "Nothing found." }
            } @else {
                (LinkGrid {
                    links: view.links,
                    collection,
                    mode: view.preferences.view_mode,
                })
            }
        }
    };

    BaseLayout::new(&collection.name, view.viewer)
        .with_body_style(background_gradient(&collection.color, dark))
        .render(content)
}

fn render_header(view: &PublicCollectionView<'_>, page_path: &str) -> Markup {
    let collection = &view.collection.collection;
    let (members, rest) = visible_members(&view.collection.members);

    html! {
        header class="collection-header" {
            div class="collection-title-row" {
                h1 { (collection.name) }
                div class="collection-tools" {
                    a class="rss-link" href=(format!("{page_path}/rss")) title="RSS feed" { "RSS" }
                    @if view.show_sharing {
                        a class="share-link" href=(page_path) { "Close" }
                    } @else {
                        a class="share-link" href=(format!("{page_path}?share=1")) { "Share" }
                    }
                }
            }
            div class="collection-people" {
                div class="avatars" {
                    @if let Some(owner) = view.owner {
                        (ProfilePhoto::new(owner.image.as_deref(), &owner.name).large())
                    }
                    @for m in &members {
                        (ProfilePhoto::new(m.user.image.as_deref(), &m.user.name))
                    }
                    (MoreMembers(rest))
                }
                @if let Some(owner) = view.owner {
                    p class="byline" { (byline(&owner.name, view.collection.members.len())) }
                }
            }
            @if !collection.description.is_empty() {
                p class="collection-description" { (collection.description) }
            }
        }
    }
}

fn render_sharing_panel(view: &PublicCollectionView<'_>, page_path: &str) -> Markup {
    let mut members: Vec<&MemberWithUser> = view.collection.members.iter().collect();
    members.sort_by_key(|m| m.member.user_id);

    html! {
        section class="sharing-panel" {
            h2 { "Team and Sharing" }
            label {
                "Public link"
                input type="text" readonly value=(view.share_url);
            }
            table {
                thead {
                    tr { th { "Name" } th { "Create" } th { "Update" } th { "Delete" } }
                }
                tbody {
                    @if let Some(owner) = view.owner {
                        tr class="owner-row" {
                            td { (ProfilePhoto::new(owner.image.as_deref(), &owner.name)) " " (owner.name) " (Owner)" }
                            td { "\u{2713}" } td { "\u{2713}" } td { "\u{2713}" }
                        }
                    }
                    @for m in &members {
                        tr {
                            td { (ProfilePhoto::new(m.user.image.as_deref(), &m.user.name)) " " (m.user.name) }
                            td { (flag(m.member.can_create)) }
                            td { (flag(m.member.can_update)) }
                            td { (flag(m.member.can_delete)) }
                        }
                    }
                }
            }
            a href=(page_path) { "Done" }
        }
    }
}

fn flag(on: bool) -> &'static str {
    if on {
        "\u{2713}"
    } else {
        "\u{2717}"
    }
}

fn render_toolbar(view: &PublicCollectionView<'_>, page_path: &str) -> Markup {
    html! {
        form class="collection-toolbar" method="get" action=(page_path) {
            input type="search" name="q"
                placeholder=(search_placeholder(view.collection.link_count))
                value=[view.search];
            select name="sort" aria-label="Sort by" {
                @for sort in Sort::ALL {
                    option value=(sort.as_number()) selected[sort == view.preferences.sort] {
                        (sort.label())
                    }
                }
            }
            select name="view" aria-label="View" {
                @for mode in ViewMode::ALL {
                    option value=(mode.as_str()) selected[mode == view.preferences.view_mode] {
                        (view_label(mode))
                    }
                }
            }
            button type="submit" { "Apply" }
        }
    }
}

const fn view_label(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::Card => "Card",
        ViewMode::List => "List",
        ViewMode::Masonry => "Masonry",
    }
}

impl Render for PublicCollectionView<'_> {
    fn render(&self) -> Markup {
        render_public_collection(self)
    }
}
