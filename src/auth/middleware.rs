use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
    response::{IntoResponse, Response},
};
use sqlx::SqlitePool;

use super::session::{is_expired, SESSION_COOKIE};
use crate::api::ApiError;
use crate::db::{self as queries, User};

/// Current authenticated user (if any).
/// Use this extractor when authentication is optional.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
    SqlitePool: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pool = SqlitePool::from_ref(state);

        let Some(token) = request_token(&parts.headers) else {
            return Ok(MaybeUser(None));
        };

        let session = match queries::get_session_by_token(&pool, &token).await {
            Ok(Some(s)) => s,
            Ok(None) => return Ok(MaybeUser(None)),
            Err(e) => return Err(ApiError::Internal(e).into_response()),
        };

        if is_expired(&session.expires_at, chrono::Utc::now()) {
            let _ = queries::delete_session(&pool, &token).await;
            return Ok(MaybeUser(None));
        }

        let user = match queries::get_user_by_id(&pool, session.user_id).await {
            Ok(u) => u,
            Err(e) => return Err(ApiError::Internal(e).into_response()),
        };

        if user.is_some() {
            let _ = queries::update_session_last_used(&pool, session.id).await;
        }

        Ok(MaybeUser(user))
    }
}

/// Current authenticated user (required).
/// Responds 401 `{"response": "You must be logged in."}` otherwise.
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
    SqlitePool: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let MaybeUser(user) = MaybeUser::from_request_parts(parts, state).await?;

        user.map(RequireUser)
            .ok_or_else(|| ApiError::Unauthenticated.into_response())
    }
}

/// Session token from `Authorization: Bearer`, falling back to the session cookie.
pub fn request_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    cookie_value(headers, SESSION_COOKIE)
}

/// Value of a named cookie on the request.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name).then(|| value.to_string())
        })
}
