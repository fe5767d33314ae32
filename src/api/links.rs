//! Link mutation endpoints.
//!
//! Each handler is a thin axum wrapper around a function taking the
//! application state and the authenticated user, so the permission and demo
//! gates can be exercised directly.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use tracing::{error, info};

use super::ApiError;
use crate::auth::RequireUser;
use crate::db::{self, Link, LinkUpdate, User};
use crate::permission;
use crate::web::AppState;

pub const ARCHIVE_QUEUED: &str = "Link is being archived.";
pub const LINK_PINNED: &str = "Link pinned.";
pub const LINK_UNPINNED: &str = "Link unpinned.";

/// Whether `url` parses as an absolute URL.
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    url::Url::parse(url).is_ok()
}

async fn find_link(state: &AppState, id: &str) -> Result<Link, ApiError> {
    let Ok(id) = id.parse::<i64>() else {
        return Err(ApiError::NotFound("Link"));
    };
    db::get_link(state.db.pool(), id)
        .await?
        .ok_or(ApiError::NotFound("Link"))
}

pub(super) fn ensure_writable(state: &AppState) -> Result<(), ApiError> {
    if state.config.demo_mode {
        return Err(ApiError::DemoModeDisabled);
    }
    Ok(())
}

/// Clear a link's preserved artifacts so it is archived again.
///
/// Gate order: link lookup, capability, demo mode, URL validity. Nothing is
/// written unless every gate passes.
pub async fn reset_archive(state: &AppState, user: &User, link_id: &str) -> Result<&'static str, ApiError> {
    let link = find_link(state, link_id).await?;

    let capability = permission::capability(state.db.pool(), user.id, link.collection_id).await?;
    if !capability.can_update() {
        return Err(ApiError::PermissionDenied);
    }

    ensure_writable(state)?;

    if !link.url.as_deref().is_some_and(is_valid_url) {
        return Err(ApiError::InvalidUrl);
    }

    db::reset_link_artifacts(state.db.pool(), link.id).await?;

    // The row is already reset at this point; a storage failure leaves stale
    // files behind but does not fail the request.
    if let Err(e) = state.store.remove_files(link.id, link.collection_id).await {
        error!(
            link_id = link.id,
            collection_id = link.collection_id,
            store = state.store.name(),
            "Failed to remove artifacts: {e:#}"
        );
    }

    info!(link_id = link.id, user_id = user.id, "Link queued for re-archiving");
    Ok(ARCHIVE_QUEUED)
}

/// Edit a link's name, description or URL.
pub async fn update_link(
    state: &AppState,
    user: &User,
    link_id: &str,
    update: &LinkUpdate,
) -> Result<Link, ApiError> {
    let link = find_link(state, link_id).await?;

    let capability = permission::capability(state.db.pool(), user.id, link.collection_id).await?;
    if !capability.can_update() {
        return Err(ApiError::PermissionDenied);
    }

    ensure_writable(state)?;

    // The edit form always submits the URL field; blank means "leave as is".
    let mut update = update.clone();
    if update.url.as_deref().is_some_and(|url| url.trim().is_empty()) {
        update.url = None;
    }

    if let Some(url) = update.url.as_deref() {
        if !is_valid_url(url) {
            return Err(ApiError::BadRequest("Invalid URL.".to_string()));
        }
    }

    let updated = db::update_link(state.db.pool(), link.id, &update)
        .await?
        .ok_or(ApiError::NotFound("Link"))?;

    info!(link_id = link.id, user_id = user.id, "Link updated");
    Ok(updated)
}

/// Delete a link and its stored artifacts.
pub async fn delete_link(state: &AppState, user: &User, link_id: &str) -> Result<Link, ApiError> {
    let link = find_link(state, link_id).await?;

    let can_delete = permission::resolve(state.db.pool(), user.id, link.collection_id)
        .await?
        .is_some_and(|access| access.can_delete());
    if !can_delete {
        return Err(ApiError::PermissionDenied);
    }

    ensure_writable(state)?;

    db::delete_link(state.db.pool(), link.id).await?;

    if let Err(e) = state.store.remove_files(link.id, link.collection_id).await {
        error!(
            link_id = link.id,
            collection_id = link.collection_id,
            store = state.store.name(),
            "Failed to remove artifacts of deleted link: {e:#}"
        );
    }

    info!(link_id = link.id, user_id = user.id, "Link deleted");
    Ok(link)
}

/// Pin or unpin a link on the caller's dashboard.
pub async fn set_pinned(
    state: &AppState,
    user: &User,
    link_id: &str,
    pinned: bool,
) -> Result<&'static str, ApiError> {
    let link = find_link(state, link_id).await?;

    let capability = permission::capability(state.db.pool(), user.id, link.collection_id).await?;
    if !capability.has_access() {
        return Err(ApiError::PermissionDenied);
    }

    ensure_writable(state)?;

    if pinned {
        db::pin_link(state.db.pool(), user.id, link.id).await?;
        Ok(LINK_PINNED)
    } else {
        db::unpin_link(state.db.pool(), user.id, link.id).await?;
        Ok(LINK_UNPINNED)
    }
}

// ========== Handlers ==========

/// PUT /api/v1/links/:id/archive
pub async fn archive_handler(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let message = reset_archive(&state, &user, &id).await?;
    Ok(Json(json!({ "response": message })))
}

/// PUT /api/v1/links/:id
pub async fn update_handler(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<LinkUpdate>,
) -> Result<Json<Value>, ApiError> {
    let link = update_link(&state, &user, &id, &update).await?;
    Ok(Json(json!({ "response": link })))
}

/// DELETE /api/v1/links/:id
pub async fn delete_handler(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let link = delete_link(&state, &user, &id).await?;
    Ok(Json(json!({ "response": link })))
}

/// PUT /api/v1/links/:id/pin
pub async fn pin_handler(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let message = set_pinned(&state, &user, &id, true).await?;
    Ok(Json(json!({ "response": message })))
}

/// DELETE /api/v1/links/:id/pin
pub async fn unpin_handler(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let message = set_pinned(&state, &user, &id, false).await?;
    Ok(Json(json!({ "response": message })))
}
