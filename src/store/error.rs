//! Error kinds returned by the store.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record is held under the requested name.
    #[error("config '{0}' not found")]
    NotFound(String),

    /// Malformed body, empty name or malformed search expression.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unexpected failure while handling a single request.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }

    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => "not_found",
            StoreError::InvalidInput(_) => "invalid_input",
            StoreError::Internal(_) => "internal",
        }
    }
}
