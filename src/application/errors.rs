//! Application layer errors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to HTTP callers as `{ "error": ... }`
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("Rejected request: {}", self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Provider failures. Never leave a provider: each one is turned into a
/// sentence before the provider returns.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{0} is disabled")]
    Disabled(&'static str),

    #[error("Request failed: {0}")]
    Network(String),

    #[error("Unexpected status: {0}")]
    Status(u16),

    #[error("Malformed payload: {0}")]
    Parse(String),

    #[error("No results found")]
    Empty,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status() {
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Internal("x".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_message_prefixed() {
        assert_eq!(ApiError::Internal("boom".into()).to_string(), "Server error: boom");
        assert_eq!(ApiError::BadRequest("No command provided".into()).to_string(), "No command provided");
    }

    #[test]
    fn test_config_read_names_path() {
        let err = ConfigError::Read {
            path: PathBuf::from("kael.yaml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "Failed to read config kael.yaml: missing");
    }
}
