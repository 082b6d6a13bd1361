//! Write-side repository port.

use async_trait::async_trait;
use common::UserId;

use crate::error::DomainError;
use crate::user::User;

/// Port to the authoritative, write-optimized store.
///
/// Implementations commit each call inside a single store transaction and
/// are the only callers that drain the aggregate's pending domain events,
/// strictly after the commit succeeds. Uniqueness of email and phone
/// number is enforced here, across active and soft-deleted rows alike,
/// and surfaced as [`DomainError::Conflict`].
#[async_trait]
pub trait UserWriteRepository: Send + Sync {
    /// Persists a new aggregate and returns its id.
    async fn create(&self, user: &mut User) -> Result<UserId, DomainError>;

    /// Persists the current state of an existing aggregate.
    async fn update(&self, user: &mut User) -> Result<(), DomainError>;

    /// Permanently removes the row (the admin hard-delete path, distinct
    /// from the aggregate's soft delete).
    async fn delete(&self, id: UserId) -> Result<(), DomainError>;

    /// Loads an aggregate by id, excluding soft-deleted accounts.
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Loads an aggregate by id, including soft-deleted accounts.
    ///
    /// Used by admin paths and by mutations, so that operations on a
    /// deleted account surface the aggregate's invalid-state error rather
    /// than a not-found.
    async fn get_by_id_unfiltered(&self, id: UserId) -> Result<Option<User>, DomainError>;
}
