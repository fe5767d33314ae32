//! Maud HTML components for the web UI.
//!
//! Components receive already-loaded data and never touch the database, so
//! they can be rendered and inspected in unit tests.
//!
//! - `layout`: Base page layout and navigation
//! - `avatar`: Profile photos and the `+N` member bubble
//! - `link_card`: Link views for the card, list and masonry layouts
//! - `compact_link_card`: Numbered one-line link summary with an action menu
//! - `tag_bar`: Tag filter bar
//! - `dropdown`: Action menus
//! - `format`: Date, colour and URL helpers
//!
//! # Example
//!
//! ```ignore
//! use maud::html;
//! use crate::components::{BaseLayout, CompactLinkCard};
//!
//! let content = html! {
//!     @for (i, link) in links.iter().enumerate() {
//!         (CompactLinkCard::new(link, i, &collections, viewer))
//!     }
//! };
//! BaseLayout::new("Pinned", viewer).render(content)
//! ```

pub mod avatar;
pub mod compact_link_card;
pub mod dropdown;
pub mod format;
pub mod layout;
pub mod link_card;
pub mod tag_bar;

pub use avatar::{MoreMembers, ProfilePhoto};
pub use compact_link_card::{favicon_url, CompactLinkCard};
pub use dropdown::{Dropdown, DropdownItem};
pub use format::{format_date, safe_color, safe_href, truncate, url_host, DEFAULT_COLOR};
pub use layout::BaseLayout;
pub use link_card::{LinkCard, LinkGrid};
pub use tag_bar::{distinct_tag_names, TagFilterBar};
