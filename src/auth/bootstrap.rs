use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

use super::password::hash_password;
use crate::config::InitialUser;
use crate::db;

/// Create the configured initial account unless its username is taken.
///
/// Returns the new user's id, or `None` when the account already existed.
pub async fn ensure_initial_user(pool: &SqlitePool, user: &InitialUser) -> Result<Option<i64>> {
    if db::get_user_by_username(pool, &user.username).await?.is_some() {
        return Ok(None);
    }

    let hash = hash_password(&user.password)?;
    let id = db::create_user(pool, &user.username, &user.username, &hash).await?;
    info!(user_id = id, username = %user.username, "Created initial user");
    Ok(Some(id))
}
