//! Error types for the admin API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Outcome of a failed user directory call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("No user record found for uid: {0}")]
    NotFound(String),

    #[error("{0}")]
    Unexpected(String),
}

impl From<reqwest::Error> for DirectoryError {
    fn from(e: reqwest::Error) -> Self {
        DirectoryError::Unexpected(e.to_string())
    }
}

/// Startup failures while wiring up the directory collaborator.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Failed to read credentials file {path}: {source}")]
    ReadCredentials {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse credentials file: {0}")]
    ParseCredentials(#[from] serde_json::Error),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Invalid service account private key: {0}")]
    InvalidKey(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Errors returned by route handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "detail": self.to_string() }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = ApiError::NotFound("User not found".to_string()).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let internal = ApiError::Internal("boom".to_string()).into_response();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unexpected_keeps_raw_message() {
        let err = DirectoryError::Unexpected("quota exceeded".to_string());
        assert_eq!(err.to_string(), "quota exceeded");
    }
}
