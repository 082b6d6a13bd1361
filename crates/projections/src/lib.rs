//! Read side of the user-account service.
//!
//! This crate consumes the change log of committed writes and keeps the
//! eventually-consistent read replica:
//! - [`ChangeEnvelope`] parses the CDC wire format
//! - [`UserProjector`] applies change events to a [`DocumentStore`] with
//!   idempotent upserts and in-place tombstones
//! - [`UserReadRepository`] answers specification + pagination queries
//! - [`UserDirectoryView`] is the in-memory replica implementing both
//!   ports

pub mod document;
pub mod envelope;
pub mod error;
pub mod processor;
pub mod read_model;
pub mod views;

pub use document::UserDocument;
pub use envelope::{ChangeEnvelope, ChangeSource, Operation};
pub use error::{ProjectionError, Result};
pub use processor::UserProjector;
pub use read_model::{DocumentStore, UserReadRepository};
pub use views::UserDirectoryView;
