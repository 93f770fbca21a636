//! API error taxonomy.
//!
//! Domain errors surface to the caller as a JSON object with a
//! human-readable message and a status matching the failure class.
//! Storage failures are logged server-side and surfaced as a generic 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced at the HTTP boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request fields.
    #[error("{0}")]
    Validation(String),

    /// Absent or invalid credential.
    #[error("{0}")]
    Auth(String),

    /// Referenced resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate declaration for a (student, assignment) pair.
    #[error("{0}")]
    Conflict(String),

    /// Persistence failure. The cause is logged, never surfaced.
    #[error("Internal server error")]
    Storage(#[source] StoreError),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        ApiError::Auth(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        ApiError::Conflict(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            // The store's uniqueness constraint is the authoritative
            // duplicate check; it maps to the same conflict outcome as the
            // advisory pre-check.
            StoreError::DuplicateDeclaration => {
                ApiError::conflict("Declaration already exists for this assignment")
            }
            other => ApiError::Storage(other),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Storage(ref source) = self {
            tracing::error!(error = %source, "storage failure");
        }
        let body = ErrorBody {
            message: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
