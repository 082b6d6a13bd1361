//! Ports of the read side: the projector-facing document store and the
//! query-facing read repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{PagedResult, PaginationParams, UserId};
use domain::Specification;

use crate::document::UserDocument;
use crate::error::Result;

/// Write port of the read replica, used exclusively by the projector.
///
/// Both operations are idempotent: `upsert` is an insert-or-replace keyed
/// by id, and `mark_deleted` flips a flag in place. Duplicate delivery of
/// the same change event is therefore always safe.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts or fully replaces the document with the same id.
    async fn upsert(&self, document: UserDocument) -> Result<()>;

    /// Marks the document deleted in place, keeping it queryable.
    ///
    /// A missing document is a no-op, not an error.
    async fn mark_deleted(&self, id: UserId, deleted_at: DateTime<Utc>) -> Result<()>;
}

/// Query port of the read replica, exposed to query handlers.
///
/// Implementations translate a specification's expression form into
/// their own native filter; they never evaluate the in-memory aggregate
/// predicate.
#[async_trait]
pub trait UserReadRepository: Send + Sync {
    /// Fetches one document by id.
    async fn get_by_id(&self, id: UserId) -> Result<Option<UserDocument>>;

    /// Fetches one document by its normalized email address.
    async fn get_by_email(&self, email: &str) -> Result<Option<UserDocument>>;

    /// Returns true if any document carries this email address.
    async fn exists_by_email(&self, email: &str) -> Result<bool>;

    /// Returns true if any document carries this phone number.
    async fn exists_by_phone_number(&self, phone_number: &str) -> Result<bool>;

    /// Returns one page of documents matching the specification.
    ///
    /// The result's total count is computed over the filtered set, not
    /// the whole replica.
    async fn get_users(
        &self,
        specification: &dyn Specification,
        pagination: &PaginationParams,
    ) -> Result<PagedResult<UserDocument>>;

    /// Counts documents matching the specification.
    async fn count_users(&self, specification: &dyn Specification) -> Result<u64>;

    /// Returns true if any document matches the specification.
    async fn any_users(&self, specification: &dyn Specification) -> Result<bool>;
}
