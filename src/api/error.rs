use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors returned by the JSON API. Every variant renders as `{"response": message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("You must be logged in.")]
    Unauthenticated,
    #[error("{0} not found.")]
    NotFound(&'static str),
    #[error("Permission denied.")]
    PermissionDenied,
    #[error("This action is disabled because this is a read-only demo of Linkwarden.")]
    DemoModeDisabled,
    /// Sent with status 200: existing clients only inspect the message body
    /// for this case, so the status is kept for compatibility.
    #[error("Invalid URL.")]
    InvalidUrl,
    #[error("Invalid credentials.")]
    InvalidCredentials,
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated | Self::PermissionDenied | Self::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::DemoModeDisabled | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidUrl => StatusCode::OK,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Internal(e) => {
                tracing::error!("Internal error: {e:#}");
                "Internal server error.".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "response": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statuses() {
        assert_eq!(ApiError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NotFound("Link").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::PermissionDenied.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::DemoModeDisabled.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidUrl.status(), StatusCode::OK);
    }

    #[test]
    fn test_messages() {
        assert_eq!(ApiError::NotFound("Link").to_string(), "Link not found.");
        assert_eq!(ApiError::PermissionDenied.to_string(), "Permission denied.");
        assert_eq!(ApiError::InvalidUrl.to_string(), "Invalid URL.");
        assert!(ApiError::DemoModeDisabled
            .to_string()
            .starts_with("This action is disabled"));
    }
}
