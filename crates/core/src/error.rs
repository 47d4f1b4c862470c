//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures (permissions,
/// transitions, validation, conflicts). Infrastructure concerns belong
/// elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Actor lacks the capability required for the requested action.
    /// Never retried; surfaced to the caller verbatim.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The requested action is not legal from the record's current state
    /// (including stale-state races caught by optimistic concurrency).
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// Malformed input, reported with field-level detail.
    #[error("validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    /// The targeted record is unknown to the store.
    #[error("not found")]
    NotFound,

    /// Concurrent modification detected (optimistic concurrency / stale
    /// version). The caller may retry with a fresh read.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        Self::InvalidTransition(msg.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
