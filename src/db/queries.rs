use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::collections::{HashMap, HashSet};

use super::models::{
    Collection, CollectionMember, CollectionWithMembers, Link, LinkQuery, LinkUpdate,
    LinkWithTags, MemberWithUser, NewCollection, NewLink, PublicUser, SearchFilter, Session, Tag,
    User,
};

// ========== Search Helpers ==========

/// A search condition with its SQL clause and bind values.
struct SearchClause {
    /// SQL WHERE clause fragment, e.g. "(l.name LIKE ? ESCAPE '\' OR ...)"
    sql: String,
    /// Values to bind in order
    values: Vec<String>,
}

/// Build the `OR`ed match over the fields enabled in `filter`.
fn search_clause(query: &str, filter: SearchFilter) -> SearchClause {
    let pattern = format!("%{}%", escape_like(query.trim()));
    let mut parts = Vec::new();

    if filter.name {
        parts.push(r"l.name LIKE ? ESCAPE '\'");
    }
    if filter.url {
        parts.push(r"l.url LIKE ? ESCAPE '\'");
    }
    if filter.description {
        parts.push(r"l.description LIKE ? ESCAPE '\'");
    }
    if filter.text_content {
        parts.push(r"l.text_content LIKE ? ESCAPE '\'");
    }
    if filter.tags {
        parts.push(
            r"EXISTS (SELECT 1 FROM link_tags lt JOIN tags t ON t.id = lt.tag_id
                      WHERE lt.link_id = l.id AND t.name LIKE ? ESCAPE '\')",
        );
    }

    if parts.is_empty() {
        // Nothing to match against.
        return SearchClause {
            sql: "0".to_string(),
            values: Vec::new(),
        };
    }

    SearchClause {
        sql: format!("({})", parts.join(" OR ")),
        values: vec![pattern; parts.len()],
    }
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

// ========== Users ==========

/// Create a user and return its id.
pub async fn create_user(
    pool: &SqlitePool,
    name: &str,
    username: &str,
    password_hash: &str,
) -> Result<i64> {
    let result = sqlx::query(
        r"
        INSERT INTO users (name, username, password_hash)
        VALUES (?, ?, ?)
        ",
    )
    .bind(name)
    .bind(username)
    .bind(password_hash)
    .execute(pool)
    .await
    .context("Failed to create user")?;

    Ok(result.last_insert_rowid())
}

/// Get a user by id.
pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>> {
    sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch user by id")
}

/// Get a user by username.
pub async fn get_user_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    sqlx::query_as("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch user by username")
}

/// Get the publicly visible profile of a user.
pub async fn get_public_user(pool: &SqlitePool, id: i64) -> Result<Option<PublicUser>> {
    sqlx::query_as("SELECT id, name, username, image FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch public user")
}

/// Set a user's theme preference (`light` or `dark`).
pub async fn update_user_theme(pool: &SqlitePool, id: i64, theme: &str) -> Result<()> {
    sqlx::query("UPDATE users SET theme = ? WHERE id = ?")
        .bind(theme)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update user theme")?;
    Ok(())
}

// ========== Sessions ==========

/// Store a new session.
pub async fn create_session(
    pool: &SqlitePool,
    user_id: i64,
    token: &str,
    expires_at: &str,
) -> Result<i64> {
    let result = sqlx::query(
        r"
        INSERT INTO sessions (user_id, token, expires_at)
        VALUES (?, ?, ?)
        ",
    )
    .bind(user_id)
    .bind(token)
    .bind(expires_at)
    .execute(pool)
    .await
    .context("Failed to create session")?;

    Ok(result.last_insert_rowid())
}

/// Get a session by token.
pub async fn get_session_by_token(pool: &SqlitePool, token: &str) -> Result<Option<Session>> {
    sqlx::query_as("SELECT * FROM sessions WHERE token = ?")
        .bind(token)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch session by token")
}

/// Update session last_used_at.
pub async fn update_session_last_used(pool: &SqlitePool, session_id: i64) -> Result<()> {
    sqlx::query("UPDATE sessions SET last_used_at = datetime('now') WHERE id = ?")
        .bind(session_id)
        .execute(pool)
        .await
        .context("Failed to update session last_used")?;
    Ok(())
}

/// Delete a session.
pub async fn delete_session(pool: &SqlitePool, token: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await
        .context("Failed to delete session")?;
    Ok(())
}

/// Delete every session that expired before `now` (RFC 3339). Returns how many went.
pub async fn delete_expired_sessions(pool: &SqlitePool, now: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to delete expired sessions")?;
    Ok(result.rows_affected())
}

// ========== Collections ==========

/// Create a collection and return its id.
pub async fn create_collection(pool: &SqlitePool, collection: &NewCollection) -> Result<i64> {
    let result = sqlx::query(
        r"
        INSERT INTO collections (name, description, color, owner_id, is_public)
        VALUES (?, ?, ?, ?, ?)
        ",
    )
    .bind(&collection.name)
    .bind(&collection.description)
    .bind(&collection.color)
    .bind(collection.owner_id)
    .bind(collection.is_public)
    .execute(pool)
    .await
    .context("Failed to create collection")?;

    Ok(result.last_insert_rowid())
}

/// Get a collection by id regardless of visibility.
pub async fn get_collection(pool: &SqlitePool, id: i64) -> Result<Option<Collection>> {
    sqlx::query_as("SELECT * FROM collections WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch collection")
}

/// Collections the user owns or is a member of, by name.
pub async fn get_collections_for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Collection>> {
    sqlx::query_as(
        r"
        SELECT c.* FROM collections c
        WHERE c.owner_id = ?
           OR EXISTS (SELECT 1 FROM users_and_collections uc
                      WHERE uc.collection_id = c.id AND uc.user_id = ?)
        ORDER BY c.name COLLATE NOCASE, c.id
        ",
    )
    .bind(user_id)
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to fetch collections for user")
}

/// Add a member to a collection, replacing any existing permission row.
pub async fn upsert_collection_member(pool: &SqlitePool, member: &CollectionMember) -> Result<()> {
    sqlx::query(
        r"
        INSERT INTO users_and_collections (user_id, collection_id, can_create, can_update, can_delete)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT (user_id, collection_id) DO UPDATE SET
            can_create = excluded.can_create,
            can_update = excluded.can_update,
            can_delete = excluded.can_delete
        ",
    )
    .bind(member.user_id)
    .bind(member.collection_id)
    .bind(member.can_create)
    .bind(member.can_update)
    .bind(member.can_delete)
    .execute(pool)
    .await
    .context("Failed to upsert collection member")?;
    Ok(())
}

/// Permission rows of a collection, ordered by user id.
pub async fn get_collection_members(
    pool: &SqlitePool,
    collection_id: i64,
) -> Result<Vec<CollectionMember>> {
    sqlx::query_as(
        r"
        SELECT user_id, collection_id, can_create, can_update, can_delete
        FROM users_and_collections
        WHERE collection_id = ?
        ORDER BY user_id
        ",
    )
    .bind(collection_id)
    .fetch_all(pool)
    .await
    .context("Failed to fetch collection members")
}

/// Members of a collection joined with their public profiles, ordered by user id.
pub async fn get_collection_members_with_users(
    pool: &SqlitePool,
    collection_id: i64,
) -> Result<Vec<MemberWithUser>> {
    let rows: Vec<(i64, bool, bool, bool, String, String, Option<String>)> = sqlx::query_as(
        r"
        SELECT uc.user_id, uc.can_create, uc.can_update, uc.can_delete,
               u.name, u.username, u.image
        FROM users_and_collections uc
        JOIN users u ON u.id = uc.user_id
        WHERE uc.collection_id = ?
        ORDER BY uc.user_id
        ",
    )
    .bind(collection_id)
    .fetch_all(pool)
    .await
    .context("Failed to fetch collection members with users")?;

    Ok(rows
        .into_iter()
        .map(
            |(user_id, can_create, can_update, can_delete, name, username, image)| MemberWithUser {
                member: CollectionMember {
                    user_id,
                    collection_id,
                    can_create,
                    can_update,
                    can_delete,
                },
                user: PublicUser {
                    id: user_id,
                    name,
                    username,
                    image,
                },
            },
        )
        .collect())
}

/// Count the links in a collection.
pub async fn count_links_in_collection(pool: &SqlitePool, collection_id: i64) -> Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM links WHERE collection_id = ?")
        .bind(collection_id)
        .fetch_one(pool)
        .await
        .context("Failed to count links in collection")?;
    Ok(row.0)
}

/// Get a collection with members and link count, only if it is public.
pub async fn get_public_collection(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<CollectionWithMembers>> {
    let collection = match get_collection(pool, id).await? {
        Some(c) if c.is_public => c,
        _ => return Ok(None),
    };

    let members = get_collection_members_with_users(pool, id).await?;
    let link_count = count_links_in_collection(pool, id).await?;

    Ok(Some(CollectionWithMembers {
        collection,
        members,
        link_count,
    }))
}

// ========== Links ==========

/// Insert a link and return its id.
pub async fn insert_link(pool: &SqlitePool, link: &NewLink) -> Result<i64> {
    let result = sqlx::query(
        r"
        INSERT INTO links (name, url, description, collection_id)
        VALUES (?, ?, ?, ?)
        ",
    )
    .bind(&link.name)
    .bind(&link.url)
    .bind(&link.description)
    .bind(link.collection_id)
    .execute(pool)
    .await
    .context("Failed to insert link")?;

    Ok(result.last_insert_rowid())
}

/// Get a link by id.
pub async fn get_link(pool: &SqlitePool, id: i64) -> Result<Option<Link>> {
    sqlx::query_as("SELECT * FROM links WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch link")
}

/// Apply a partial edit to a link and return the updated row.
pub async fn update_link(pool: &SqlitePool, id: i64, update: &LinkUpdate) -> Result<Option<Link>> {
    sqlx::query(
        r"
        UPDATE links
        SET name = COALESCE(?, name),
            description = COALESCE(?, description),
            url = COALESCE(?, url)
        WHERE id = ?
        ",
    )
    .bind(&update.name)
    .bind(&update.description)
    .bind(&update.url)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update link")?;

    get_link(pool, id).await
}

/// Delete a link. Returns whether a row was removed.
pub async fn delete_link(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM links WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete link")?;
    Ok(result.rows_affected() > 0)
}

/// Artifact references recorded once a link has been preserved.
#[derive(Debug, Clone, Default)]
pub struct LinkArtifacts {
    pub image: Option<String>,
    pub pdf: Option<String>,
    pub readable: Option<String>,
    pub monolith: Option<String>,
    pub preview: Option<String>,
    pub text_content: Option<String>,
    pub index_version: Option<i64>,
}

/// Record preserved artifacts for a link and stamp `last_preserved`.
pub async fn set_link_artifacts(
    pool: &SqlitePool,
    id: i64,
    artifacts: &LinkArtifacts,
) -> Result<()> {
    sqlx::query(
        r"
        UPDATE links
        SET image = ?,
            pdf = ?,
            readable = ?,
            monolith = ?,
            preview = ?,
            text_content = COALESCE(?, text_content),
            index_version = ?,
            last_preserved = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        ",
    )
    .bind(&artifacts.image)
    .bind(&artifacts.pdf)
    .bind(&artifacts.readable)
    .bind(&artifacts.monolith)
    .bind(&artifacts.preview)
    .bind(&artifacts.text_content)
    .bind(artifacts.index_version)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to set link artifacts")?;
    Ok(())
}

/// Clear every artifact reference and the preservation stamp so the link is
/// picked up for preservation again.
pub async fn reset_link_artifacts(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query(
        r"
        UPDATE links
        SET image = NULL,
            pdf = NULL,
            readable = NULL,
            monolith = NULL,
            preview = NULL,
            last_preserved = NULL,
            index_version = NULL
        WHERE id = ?
        ",
    )
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to reset link artifacts")?;
    Ok(())
}

/// Links with a URL that have never been preserved (or were reset), oldest first.
pub async fn links_awaiting_preservation(pool: &SqlitePool, limit: i64) -> Result<Vec<Link>> {
    sqlx::query_as(
        r"
        SELECT * FROM links
        WHERE last_preserved IS NULL AND url IS NOT NULL
        ORDER BY created_at ASC, id ASC
        LIMIT ?
        ",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
    .context("Failed to fetch links awaiting preservation")
}

/// List a collection's links with their tags, filtered, sorted and paginated.
///
/// The cursor is a link id: the page starts right after that link in the
/// chosen order. A cursor that is not a link of this collection yields an
/// empty page.
pub async fn get_links(pool: &SqlitePool, query: &LinkQuery) -> Result<Vec<LinkWithTags>> {
    let search = query
        .search
        .as_deref()
        .filter(|q| !q.trim().is_empty())
        .map(|q| search_clause(q, query.filter));

    let search_where = search
        .as_ref()
        .map_or_else(String::new, |s| format!("AND {}", s.sql));

    let cursor = match query.cursor {
        Some(id) => match get_link(pool, id).await? {
            Some(link) if link.collection_id == query.collection_id => Some(link),
            _ => return Ok(Vec::new()),
        },
        None => None,
    };

    let (column, descending) = query.sort.keyset();
    let cursor_where = if cursor.is_some() {
        let cmp = if descending { "<" } else { ">" };
        format!("AND ({column} {cmp} ? OR ({column} = ? AND l.id {cmp} ?))")
    } else {
        String::new()
    };

    let sql = format!(
        r"
        SELECT l.* FROM links l
        WHERE l.collection_id = ? {search_where} {cursor_where}
        ORDER BY {}
        LIMIT ?
        ",
        query.sort.order_by()
    );

    let mut q = sqlx::query_as::<_, Link>(&sql).bind(query.collection_id);
    if let Some(ref s) = search {
        for value in &s.values {
            q = q.bind(value);
        }
    }
    if let Some(ref c) = cursor {
        let key = query.sort.key_of(c);
        q = q.bind(key).bind(key).bind(c.id);
    }
    // SQLite treats a negative LIMIT as unbounded.
    q = q.bind(query.limit.map_or(-1, |l| l.max(0)));

    let links = q
        .fetch_all(pool)
        .await
        .context("Failed to fetch links")?;

    let ids: Vec<i64> = links.iter().map(|l| l.id).collect();
    let mut tags = get_tags_by_link(pool, &ids).await?;
    let pinned = match query.viewer_id {
        Some(user_id) => get_pinned_link_ids(pool, user_id).await?,
        None => HashSet::new(),
    };

    Ok(links
        .into_iter()
        .map(|link| LinkWithTags {
            tags: tags.remove(&link.id).unwrap_or_default(),
            pinned: pinned.contains(&link.id),
            link,
        })
        .collect())
}

// ========== Tags ==========

/// Get a tag by name for an owner, creating it if needed.
pub async fn get_or_create_tag(pool: &SqlitePool, name: &str, owner_id: i64) -> Result<i64> {
    let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM tags WHERE name = ? AND owner_id = ?")
        .bind(name)
        .bind(owner_id)
        .fetch_optional(pool)
        .await
        .context("Failed to look up tag")?;

    if let Some((id,)) = existing {
        return Ok(id);
    }

    let result = sqlx::query("INSERT INTO tags (name, owner_id) VALUES (?, ?)")
        .bind(name)
        .bind(owner_id)
        .execute(pool)
        .await
        .context("Failed to create tag")?;

    Ok(result.last_insert_rowid())
}

/// Attach a tag to a link (no-op if already attached).
pub async fn tag_link(pool: &SqlitePool, link_id: i64, tag_id: i64) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO link_tags (link_id, tag_id) VALUES (?, ?)")
        .bind(link_id)
        .bind(tag_id)
        .execute(pool)
        .await
        .context("Failed to tag link")?;
    Ok(())
}

/// Tags used by any link in a collection. Names may repeat across owners.
pub async fn get_tags_for_collection(pool: &SqlitePool, collection_id: i64) -> Result<Vec<Tag>> {
    sqlx::query_as(
        r"
        SELECT DISTINCT t.id, t.name, t.owner_id
        FROM tags t
        JOIN link_tags lt ON lt.tag_id = t.id
        JOIN links l ON l.id = lt.link_id
        WHERE l.collection_id = ?
        ORDER BY t.id
        ",
    )
    .bind(collection_id)
    .fetch_all(pool)
    .await
    .context("Failed to fetch tags for collection")
}

async fn get_tags_by_link(pool: &SqlitePool, link_ids: &[i64]) -> Result<HashMap<i64, Vec<Tag>>> {
    if link_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let placeholders = vec!["?"; link_ids.len()].join(", ");
    let sql = format!(
        r"
        SELECT lt.link_id, t.id, t.name, t.owner_id
        FROM link_tags lt
        JOIN tags t ON t.id = lt.tag_id
        WHERE lt.link_id IN ({placeholders})
        ORDER BY t.name COLLATE NOCASE
        "
    );

    let mut q = sqlx::query_as::<_, (i64, i64, String, i64)>(&sql);
    for &id in link_ids {
        q = q.bind(id);
    }
    let rows = q.fetch_all(pool).await.context("Failed to fetch link tags")?;

    let mut by_link: HashMap<i64, Vec<Tag>> = HashMap::new();
    for (link_id, id, name, owner_id) in rows {
        by_link
            .entry(link_id)
            .or_default()
            .push(Tag { id, name, owner_id });
    }
    Ok(by_link)
}

// ========== Pins ==========

/// Pin a link to a user's dashboard.
pub async fn pin_link(pool: &SqlitePool, user_id: i64, link_id: i64) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO pinned_links (user_id, link_id) VALUES (?, ?)")
        .bind(user_id)
        .bind(link_id)
        .execute(pool)
        .await
        .context("Failed to pin link")?;
    Ok(())
}

/// Remove a link from a user's dashboard.
pub async fn unpin_link(pool: &SqlitePool, user_id: i64, link_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM pinned_links WHERE user_id = ? AND link_id = ?")
        .bind(user_id)
        .bind(link_id)
        .execute(pool)
        .await
        .context("Failed to unpin link")?;
    Ok(())
}

/// Ids of the links a user has pinned.
pub async fn get_pinned_link_ids(pool: &SqlitePool, user_id: i64) -> Result<HashSet<i64>> {
    let rows: Vec<(i64,)> = sqlx::query_as("SELECT link_id FROM pinned_links WHERE user_id = ?")
        .bind(user_id)
        .fetch_all(pool)
        .await
        .context("Failed to fetch pinned links")?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Links a user has pinned, newest first.
///
/// Pins in collections the user no longer owns or belongs to are left in
/// place but not returned.
pub async fn get_pinned_links(pool: &SqlitePool, user_id: i64) -> Result<Vec<Link>> {
    sqlx::query_as(
        r"
        SELECT l.* FROM links l
        JOIN pinned_links p ON p.link_id = l.id
        JOIN collections c ON c.id = l.collection_id
        WHERE p.user_id = ?
          AND (c.owner_id = ?
               OR EXISTS (SELECT 1 FROM users_and_collections uc
                          WHERE uc.collection_id = c.id AND uc.user_id = ?))
        ORDER BY l.created_at DESC, l.id DESC
        ",
    )
    .bind(user_id)
    .bind(user_id)
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to fetch pinned links")
}
