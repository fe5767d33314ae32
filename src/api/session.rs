//! Login and logout.

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::ApiError;
use crate::auth::{
    clear_session_cookie, expires_at, generate_session_token, request_token, session_cookie,
    verify_password,
};
use crate::db;
use crate::web::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Check credentials and open a session. Returns the new token.
pub async fn login(state: &AppState, request: &LoginRequest) -> Result<String, ApiError> {
    let Some(user) = db::get_user_by_username(state.db.pool(), request.username.trim()).await?
    else {
        warn!(username = %request.username, "Login attempt for unknown user");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(&request.password, &user.password_hash)? {
        warn!(user_id = user.id, "Login attempt with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = generate_session_token();
    let expires = expires_at(state.config.session_lifetime);
    db::create_session(state.db.pool(), user.id, &token, &expires).await?;

    info!(user_id = user.id, "User logged in");
    Ok(token)
}

/// POST /api/v1/session
pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let token = login(&state, &request).await?;
    let cookie = session_cookie(&token, state.config.session_lifetime);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "response": { "token": token } })),
    )
        .into_response())
}

/// DELETE /api/v1/session
pub async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if let Some(token) = request_token(&headers) {
        db::delete_session(state.db.pool(), &token).await?;
    }

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(json!({ "response": "Logged out." })),
    )
        .into_response())
}
