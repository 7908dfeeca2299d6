//! Unified error types for the page analyzer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Unified error type for the page analyzer.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// User input could not be normalized into a site URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// A row with the given id does not exist.
    #[error("{entity} with id = {id} not found")]
    NotFound {
        /// Kind of record that was looked up.
        entity: &'static str,
        /// The missing id.
        id: i64,
    },

    /// A unique constraint rejected the insert.
    #[error("duplicate entry: {0}")]
    Duplicate(String),

    /// Persistence layer failure.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// HTTP client construction error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Metrics recorder installation error.
    #[error("metrics error: {0}")]
    Metrics(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Shorthand for a missing `Url` row.
    pub fn url_not_found(id: i64) -> Self {
        AppError::NotFound { entity: "Url", id }
    }

    /// HTTP status this error maps to when it escapes a handler.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidUrl(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Duplicate(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human readable message.
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
