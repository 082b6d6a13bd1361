//! The change-event projector.

use store::UserRecord;

use crate::document::UserDocument;
use crate::envelope::{ChangeEnvelope, Operation};
use crate::error::{ProjectionError, Result};
use crate::read_model::DocumentStore;

/// Outcome of applying one change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// The replica was updated.
    Applied,

    /// The event carried an operation this consumer does not handle.
    Skipped,
}

/// Projects change-log events onto the read replica.
///
/// One invocation per delivered event; no state is shared across
/// invocations beyond the replica itself. Events for the same id must be
/// delivered in commit order by the upstream transport. The projector
/// does a blind full replace and does not compare sequence positions, so
/// out-of-order delivery makes the last-delivered write win.
pub struct UserProjector<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> UserProjector<S> {
    /// Creates a projector writing to the given document store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying document store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Applies one serialized change event to the replica.
    ///
    /// Never panics and never propagates an error: malformed payloads,
    /// missing record snapshots and store failures are logged and
    /// reported as `false` so the consumer can advance past a poison
    /// message and leave retry to the transport. Unrecognized operations
    /// are logged and reported as `true`.
    #[tracing::instrument(skip(self, raw))]
    pub async fn process(&self, raw: &str) -> bool {
        match self.apply(raw).await {
            Ok(Outcome::Applied) => {
                metrics::counter!("projector_events_applied").increment(1);
                true
            }
            Ok(Outcome::Skipped) => {
                metrics::counter!("projector_events_skipped").increment(1);
                true
            }
            Err(error) => {
                tracing::warn!(%error, "change event rejected");
                metrics::counter!("projector_events_failed").increment(1);
                false
            }
        }
    }

    async fn apply(&self, raw: &str) -> Result<Outcome> {
        let envelope = ChangeEnvelope::parse(raw)?;

        match envelope.operation {
            Operation::Create | Operation::Update | Operation::Snapshot => {
                let record = required_record(envelope.after, "after", &envelope.operation)?;
                let document = UserDocument::from_record(&record);
                tracing::debug!(
                    user_id = %document.id,
                    op = %envelope.operation,
                    sequence = envelope.source.sequence,
                    "upserting read document"
                );
                self.store.upsert(document).await?;
                Ok(Outcome::Applied)
            }
            Operation::Delete => {
                let record = required_record(envelope.before, "before", &envelope.operation)?;
                let deleted_at = record.deleted_at.unwrap_or(envelope.source.timestamp);
                tracing::debug!(
                    user_id = %record.id,
                    sequence = envelope.source.sequence,
                    "marking read document deleted"
                );
                self.store.mark_deleted(record.id.into(), deleted_at).await?;
                Ok(Outcome::Applied)
            }
            Operation::Other(code) => {
                tracing::warn!(op = %code, "unrecognized change operation, skipping");
                Ok(Outcome::Skipped)
            }
        }
    }
}

fn required_record(
    state: Option<serde_json::Value>,
    field: &'static str,
    operation: &Operation,
) -> Result<UserRecord> {
    let value = state.ok_or_else(|| ProjectionError::MissingState {
        field,
        operation: operation.as_code().to_string(),
    })?;
    Ok(serde_json::from_value(value)?)
}
