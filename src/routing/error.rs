//! Route table error definitions.

use thiserror::Error;

/// Errors raised while building, resolving against, or reversing a route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// A route with this name is already registered.
    #[error("Duplicate route name: {0}")]
    DuplicateRouteName(String),

    /// The path template could not be parsed.
    #[error("Invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// No registered pattern matches the path.
    #[error("No route matches path {0:?}")]
    NoMatchingRoute(String),

    /// Reverse lookup for a name that was never registered.
    #[error("Unknown route name: {0}")]
    UnknownRouteName(String),

    /// Parameters do not satisfy the named route's captures.
    #[error("Parameter mismatch for route {name}: {reason}")]
    ParameterMismatch { name: String, reason: String },
}

impl RouteError {
    /// True for errors that can only happen while the table is being built.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            RouteError::DuplicateRouteName(_) | RouteError::InvalidPattern { .. }
        )
    }
}

/// Result type for route table operations.
pub type RouteResult<T> = Result<T, RouteError>;
