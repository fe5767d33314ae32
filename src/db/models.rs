use serde::{Deserialize, Serialize};

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub image: Option<String>,
    pub theme: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
}

impl User {
    #[must_use]
    pub fn prefers_dark(&self) -> bool {
        self.theme == "dark"
    }
}

/// The subset of a user that may be shown on public pages.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub image: Option<String>,
}

/// A login session. The token doubles as a bearer token for API clients.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub expires_at: String,
    pub created_at: String,
    pub last_used_at: Option<String>,
}

/// A user-owned, optionally shared folder of links.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub color: String,
    pub owner_id: i64,
    pub is_public: bool,
    pub created_at: String,
}

/// Per-user permission bits on a collection, distinct from ownership.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CollectionMember {
    pub user_id: i64,
    pub collection_id: i64,
    pub can_create: bool,
    pub can_update: bool,
    pub can_delete: bool,
}

/// A member row joined with the member's public profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberWithUser {
    #[serde(flatten)]
    pub member: CollectionMember,
    pub user: PublicUser,
}

/// A collection with its members and link count, as served to public pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionWithMembers {
    #[serde(flatten)]
    pub collection: Collection,
    pub members: Vec<MemberWithUser>,
    pub link_count: i64,
}

/// A bookmarked URL plus its cached archive artifacts.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: i64,
    pub name: String,
    pub url: Option<String>,
    pub description: String,
    pub collection_id: i64,
    pub image: Option<String>,
    pub pdf: Option<String>,
    pub readable: Option<String>,
    pub monolith: Option<String>,
    pub preview: Option<String>,
    pub text_content: Option<String>,
    pub last_preserved: Option<String>,
    pub index_version: Option<i64>,
    pub created_at: String,
}

impl Link {
    /// Whether every artifact reference and the preservation timestamp is cleared.
    #[must_use]
    pub fn awaiting_preservation(&self) -> bool {
        self.image.is_none()
            && self.pdf.is_none()
            && self.readable.is_none()
            && self.monolith.is_none()
            && self.preview.is_none()
            && self.last_preserved.is_none()
    }
}

/// A label attached to links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
}

/// A link with its tags and the viewer's pin state, ready for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkWithTags {
    #[serde(flatten)]
    pub link: Link,
    pub tags: Vec<Tag>,
    pub pinned: bool,
}

/// Data for inserting a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub name: String,
    pub url: Option<String>,
    pub description: String,
    pub collection_id: i64,
}

/// Data for inserting a new collection.
#[derive(Debug, Clone)]
pub struct NewCollection {
    pub name: String,
    pub description: String,
    pub color: String,
    pub owner_id: i64,
    pub is_public: bool,
}

/// Partial update applied to a link by its editors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
}

/// Ordering of link listings. Numeric values match what clients persist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sort {
    #[default]
    DateNewestFirst,
    DateOldestFirst,
    NameAZ,
    NameZA,
    DescriptionAZ,
    DescriptionZA,
}

impl Sort {
    #[must_use]
    pub fn from_number(n: i64) -> Option<Self> {
        match n {
            0 => Some(Self::DateNewestFirst),
            1 => Some(Self::DateOldestFirst),
            2 => Some(Self::NameAZ),
            3 => Some(Self::NameZA),
            4 => Some(Self::DescriptionAZ),
            5 => Some(Self::DescriptionZA),
            _ => None,
        }
    }

    /// Parse a persisted value, falling back to newest-first.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        value
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(Self::from_number)
            .unwrap_or_default()
    }

    #[must_use]
    pub const fn as_number(self) -> i64 {
        match self {
            Self::DateNewestFirst => 0,
            Self::DateOldestFirst => 1,
            Self::NameAZ => 2,
            Self::NameZA => 3,
            Self::DescriptionAZ => 4,
            Self::DescriptionZA => 5,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DateNewestFirst => "Date (Newest First)",
            Self::DateOldestFirst => "Date (Oldest First)",
            Self::NameAZ => "Name (A-Z)",
            Self::NameZA => "Name (Z-A)",
            Self::DescriptionAZ => "Description (A-Z)",
            Self::DescriptionZA => "Description (Z-A)",
        }
    }

    pub(crate) const fn order_by(self) -> &'static str {
        match self {
            Self::DateNewestFirst => "l.created_at DESC, l.id DESC",
            Self::DateOldestFirst => "l.created_at ASC, l.id ASC",
            Self::NameAZ => "l.name COLLATE NOCASE ASC, l.id ASC",
            Self::NameZA => "l.name COLLATE NOCASE DESC, l.id DESC",
            Self::DescriptionAZ => "l.description COLLATE NOCASE ASC, l.id ASC",
            Self::DescriptionZA => "l.description COLLATE NOCASE DESC, l.id DESC",
        }
    }

    /// Column compared when resuming after a cursor, and whether it runs descending.
    /// Ties are broken by `l.id` in the same direction, matching [`Self::order_by`].
    pub(crate) const fn keyset(self) -> (&'static str, bool) {
        match self {
            Self::DateNewestFirst => ("l.created_at", true),
            Self::DateOldestFirst => ("l.created_at", false),
            Self::NameAZ => ("l.name COLLATE NOCASE", false),
            Self::NameZA => ("l.name COLLATE NOCASE", true),
            Self::DescriptionAZ => ("l.description COLLATE NOCASE", false),
            Self::DescriptionZA => ("l.description COLLATE NOCASE", true),
        }
    }

    /// The value of the sort column for `link`.
    pub(crate) fn key_of(self, link: &Link) -> &str {
        match self {
            Self::DateNewestFirst | Self::DateOldestFirst => &link.created_at,
            Self::NameAZ | Self::NameZA => &link.name,
            Self::DescriptionAZ | Self::DescriptionZA => &link.description,
        }
    }

    pub const ALL: [Self; 6] = [
        Self::DateNewestFirst,
        Self::DateOldestFirst,
        Self::NameAZ,
        Self::NameZA,
        Self::DescriptionAZ,
        Self::DescriptionZA,
    ];
}

/// Layout used to render a list of links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Card,
    List,
    Masonry,
}

impl ViewMode {
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim() {
            "list" => Self::List,
            "masonry" => Self::Masonry,
            _ => Self::Card,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::List => "list",
            Self::Masonry => "masonry",
        }
    }

    pub const ALL: [Self; 3] = [Self::Card, Self::List, Self::Masonry];
}

/// Which link fields a search query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchFilter {
    pub name: bool,
    pub url: bool,
    pub description: bool,
    pub text_content: bool,
    pub tags: bool,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            name: true,
            url: true,
            description: true,
            text_content: true,
            tags: true,
        }
    }
}

/// Parameters for listing the links of one collection.
#[derive(Debug, Clone, Default)]
pub struct LinkQuery {
    pub collection_id: i64,
    pub sort: Sort,
    pub search: Option<String>,
    pub filter: SearchFilter,
    /// Return links after this id in sort order (cursor pagination).
    pub cursor: Option<i64>,
    pub limit: Option<i64>,
    /// Used to mark links the viewer pinned.
    pub viewer_id: Option<i64>,
}
