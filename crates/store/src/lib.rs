//! Write-side storage adapters for the user-account service.
//!
//! Implements the domain's [`UserWriteRepository`] port twice: an
//! in-memory repository for tests and a PostgreSQL repository for
//! production. Both share [`UserRecord`], the persisted row shape whose
//! serde field names are also the change-log wire names.
//!
//! [`UserWriteRepository`]: domain::UserWriteRepository

pub mod memory;
pub mod postgres;
pub mod record;

pub use memory::InMemoryUserRepository;
pub use postgres::PostgresUserRepository;
pub use record::UserRecord;

use domain::{DomainEvent, User};

/// Drains an aggregate's pending events after a successful commit and
/// publishes them to the observability pipeline.
///
/// Called by every write-repository implementation, and only after the
/// store change is durable, so events are never observed for writes that
/// did not commit.
pub(crate) fn publish_committed_events(user: &mut User) {
    for event in user.drain_events() {
        tracing::debug!(
            user_id = %user.id(),
            event_type = event.event_type(),
            "domain event committed"
        );
        metrics::counter!("user_events_committed").increment(1);
    }
}
