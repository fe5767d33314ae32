//! Settings of the logged-in account.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::links::ensure_writable;
use super::ApiError;
use crate::auth::RequireUser;
use crate::db::{self, User};
use crate::web::AppState;

pub const THEME_UPDATED: &str = "Theme updated.";

#[derive(Debug, Deserialize)]
pub struct ThemeUpdate {
    pub theme: String,
}

/// Store the theme the viewer picked so every page renders in it.
pub async fn set_theme(state: &AppState, user: &User, theme: &str) -> Result<&'static str, ApiError> {
    let theme = match theme {
        "light" => "light",
        "dark" => "dark",
        _ => return Err(ApiError::BadRequest("Invalid theme.".to_string())),
    };

    ensure_writable(state)?;

    db::update_user_theme(state.db.pool(), user.id, theme).await?;
    info!(user_id = user.id, theme, "Theme updated");
    Ok(THEME_UPDATED)
}

/// PUT /api/v1/users/me/theme
pub async fn theme_handler(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Json(update): Json<ThemeUpdate>,
) -> Result<Json<Value>, ApiError> {
    let message = set_theme(&state, &user, &update.theme).await?;
    Ok(Json(json!({ "response": message })))
}
