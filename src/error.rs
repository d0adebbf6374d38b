//! Application error taxonomy and its `IntoResponse` mapping.
//!
//! Grounded on joy-kunga `services/api/src/error.rs` (thiserror enum, status
//! map, `json!({"error": …})` body); the `MalformedPayload` variant follows
//! `dadal00-food/backend/server/src/error.rs`. Status codes are fixed by the
//! spec's §6 error taxonomy.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// The application-wide error taxonomy. Every fallible action surfaces exactly
/// one of these; none are retried and none are fatal.
#[derive(Error, Debug)]
pub enum AppError {
    /// A required form field was absent; caught before any network call.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// The incoming multipart/request payload could not be read.
    #[error("malformed payload")]
    MalformedPayload,

    /// A requested row/object does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Authentication or authorization failed.
    #[error("{0}")]
    Auth(String),

    /// Object-storage upload failed.
    #[error("upload failed: {0}")]
    Upload(String),

    /// A row read/write against the remote backend failed.
    #[error("data access failed: {0}")]
    DataAccess(String),

    /// A second submit arrived while one was already in flight.
    #[error("request already in flight")]
    Busy,
}

impl AppError {
    /// HTTP status for each variant, per the spec's error taxonomy.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingField(_) => StatusCode::BAD_REQUEST,
            AppError::MalformedPayload => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Upload(_) => StatusCode::BAD_GATEWAY,
            AppError::DataAccess(_) => StatusCode::BAD_GATEWAY,
            AppError::Busy => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
