//! Projection error types.
//!
//! These errors never cross the consume boundary: the projector logs
//! them and reports a boolean, so a poison message cannot stall the
//! consumer.

use thiserror::Error;

/// Errors that can occur while projecting a change event.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// The envelope or a record snapshot could not be parsed.
    #[error("Malformed change event: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The operation requires a record snapshot that was not present.
    #[error("Change event missing '{field}' state for operation '{operation}'")]
    MissingState {
        field: &'static str,
        operation: String,
    },

    /// The read store failed mid-operation.
    #[error("Read store error: {0}")]
    Store(String),
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
