//! Full pages rendered with maud.
//!
//! Each page takes a view struct holding everything it displays and returns
//! the complete HTML document.

pub mod compact_collection;
pub mod dashboard;
pub mod public_collection;

pub use compact_collection::{render_compact_collection, CompactCollectionView};
pub use dashboard::{render_dashboard, render_login, DashboardView};
pub use public_collection::{
    background_gradient, byline, render_public_collection, search_placeholder, visible_members,
    PublicCollectionView,
};
