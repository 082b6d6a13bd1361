//! Domain error types.

use common::UserId;
use thiserror::Error;

use crate::user::UserError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A validation or invalid-state error from the user aggregate.
    #[error("User error: {0}")]
    User(#[from] UserError),

    /// The referenced account does not exist in the relevant store.
    #[error("User not found: {0}")]
    NotFound(UserId),

    /// A uniqueness violation on a field that must be unique store-wide.
    #[error("{field} already in use: {value}")]
    Conflict { field: &'static str, value: String },

    /// The backing store is unreachable or failed mid-operation.
    ///
    /// Surfaced as a transient failure; never retried internally.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DomainError {
    /// Builds a conflict error for a unique field.
    pub fn conflict(field: &'static str, value: impl Into<String>) -> Self {
        DomainError::Conflict {
            field,
            value: value.into(),
        }
    }

    /// Returns true if this error is recoverable caller input
    /// (validation or invalid-state), as opposed to an infrastructure
    /// failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DomainError::User(_) | DomainError::NotFound(_) | DomainError::Conflict { .. }
        )
    }
}
