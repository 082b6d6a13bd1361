//! In-memory write repository implementation for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::UserId;
use domain::{DomainError, User, UserWriteRepository};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::publish_committed_events;
use crate::record::UserRecord;

/// In-memory user repository.
///
/// Provides the same contract as the PostgreSQL implementation: rows keyed
/// by id, email and phone number unique across active and soft-deleted
/// rows, events drained only after the row change is in place.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    rows: Arc<RwLock<HashMap<Uuid, UserRecord>>>,
}

impl InMemoryUserRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of rows, soft-deleted included.
    pub async fn count(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Returns a copy of the persisted row for an id.
    ///
    /// Test support: this is the record a change-data-capture pipeline
    /// would observe for the most recent committed write.
    pub async fn snapshot(&self, id: UserId) -> Option<UserRecord> {
        self.rows.read().await.get(&id.as_uuid()).cloned()
    }

    /// Removes all rows.
    pub async fn clear(&self) {
        self.rows.write().await.clear();
    }

    fn check_unique(
        rows: &HashMap<Uuid, UserRecord>,
        user: &User,
    ) -> Result<(), DomainError> {
        let id = user.id().as_uuid();
        for row in rows.values() {
            if row.id == id {
                continue;
            }
            if row.email == user.email().as_str() {
                return Err(DomainError::conflict("email", user.email().as_str()));
            }
            if row.phone_number == user.phone_number().as_str() {
                return Err(DomainError::conflict(
                    "phone_number",
                    user.phone_number().as_str(),
                ));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserWriteRepository for InMemoryUserRepository {
    async fn create(&self, user: &mut User) -> Result<UserId, DomainError> {
        let mut rows = self.rows.write().await;

        if rows.contains_key(&user.id().as_uuid()) {
            return Err(DomainError::conflict("id", user.id().to_string()));
        }
        Self::check_unique(&rows, user)?;

        rows.insert(user.id().as_uuid(), UserRecord::from_user(user));
        drop(rows);

        publish_committed_events(user);
        Ok(user.id())
    }

    async fn update(&self, user: &mut User) -> Result<(), DomainError> {
        let mut rows = self.rows.write().await;

        if !rows.contains_key(&user.id().as_uuid()) {
            return Err(DomainError::NotFound(user.id()));
        }
        Self::check_unique(&rows, user)?;

        rows.insert(user.id().as_uuid(), UserRecord::from_user(user));
        drop(rows);

        publish_committed_events(user);
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<(), DomainError> {
        let mut rows = self.rows.write().await;
        rows.remove(&id.as_uuid()).ok_or(DomainError::NotFound(id))?;
        Ok(())
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let rows = self.rows.read().await;
        rows.get(&id.as_uuid())
            .filter(|row| !row.is_deleted)
            .cloned()
            .map(UserRecord::into_user)
            .transpose()
    }

    async fn get_by_id_unfiltered(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let rows = self.rows.read().await;
        rows.get(&id.as_uuid())
            .cloned()
            .map(UserRecord::into_user)
            .transpose()
    }
}
