//! Handler error definitions.

use axum::http::{Method, StatusCode};
use thiserror::Error;

/// Errors a handler may return; each maps to one HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// Malformed input (missing field, bad JSON, missing query parameter).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The addressed record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request conflicts with existing state (e.g. a taken name).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The handler does not implement this verb.
    #[error("Method not allowed")]
    MethodNotAllowed { allowed: Vec<Method> },
}

impl HandlerError {
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HandlerError::NotFound(_) => StatusCode::NOT_FOUND,
            HandlerError::Conflict(_) => StatusCode::CONFLICT,
            HandlerError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

/// Result type for handler operations.
pub type HandlerResult<T> = Result<T, HandlerError>;
