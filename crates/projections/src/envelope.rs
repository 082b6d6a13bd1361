//! The change-log envelope delivered by the CDC transport.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::error::Result;

/// Change-log operation code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// `c`: a row was inserted.
    Create,

    /// `u`: a row was updated.
    Update,

    /// `d`: a row was removed from the write store.
    Delete,

    /// `r`: a read snapshot emitted during initial backfill.
    Snapshot,

    /// Any code this consumer does not recognize; treated as a no-op.
    Other(String),
}

impl Operation {
    /// Parses a wire operation code.
    pub fn parse(code: &str) -> Self {
        match code {
            "c" => Operation::Create,
            "u" => Operation::Update,
            "d" => Operation::Delete,
            "r" => Operation::Snapshot,
            other => Operation::Other(other.to_string()),
        }
    }

    /// Returns the wire code.
    pub fn as_code(&self) -> &str {
        match self {
            Operation::Create => "c",
            Operation::Update => "u",
            Operation::Delete => "d",
            Operation::Snapshot => "r",
            Operation::Other(code) => code,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

/// Provenance of a change event.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeSource {
    /// Source table name.
    pub table: String,

    /// Monotonically increasing position in the change log.
    pub sequence: i64,

    /// When the change was captured. Falls back to now when the wire
    /// value is missing or unparsable.
    pub timestamp: DateTime<Utc>,
}

/// A parsed change event.
///
/// `before` and `after` hold raw record snapshots keyed by the persisted
/// field names; the projector decides per operation which side it needs.
/// Unknown envelope fields are ignored.
#[derive(Debug, Clone)]
pub struct ChangeEnvelope {
    pub operation: Operation,
    pub before: Option<serde_json::Value>,
    pub after: Option<serde_json::Value>,
    pub source: ChangeSource,
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    op: String,
    #[serde(default)]
    before: Option<serde_json::Value>,
    #[serde(default)]
    after: Option<serde_json::Value>,
    #[serde(default)]
    source: Option<RawSource>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSource {
    #[serde(default)]
    table: Option<String>,
    #[serde(default, alias = "lsn")]
    sequence: Option<i64>,
    #[serde(default)]
    ts_ms: Option<serde_json::Value>,
}

impl ChangeEnvelope {
    /// Parses an envelope from its JSON wire form.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw: RawEnvelope = serde_json::from_str(raw)?;
        let source = raw.source.unwrap_or_default();

        Ok(Self {
            operation: Operation::parse(&raw.op),
            before: none_if_null(raw.before),
            after: none_if_null(raw.after),
            source: ChangeSource {
                table: source.table.unwrap_or_default(),
                sequence: source.sequence.unwrap_or(0),
                timestamp: source
                    .ts_ms
                    .as_ref()
                    .and_then(parse_timestamp)
                    .unwrap_or_else(Utc::now),
            },
        })
    }
}

fn none_if_null(value: Option<serde_json::Value>) -> Option<serde_json::Value> {
    value.filter(|v| !v.is_null())
}

fn parse_timestamp(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::Number(number) => number
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        serde_json::Value::String(text) => DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_create_envelope() {
        let raw = r#"{
            "op": "c",
            "before": null,
            "after": {"id": "x", "email": "alice@example.com"},
            "source": {"table": "users", "sequence": 42, "ts_ms": 1700000000000}
        }"#;

        let envelope = ChangeEnvelope::parse(raw).unwrap();
        assert_eq!(envelope.operation, Operation::Create);
        assert!(envelope.before.is_none());
        assert!(envelope.after.is_some());
        assert_eq!(envelope.source.table, "users");
        assert_eq!(envelope.source.sequence, 42);
        assert_eq!(envelope.source.timestamp.timestamp_millis(), 1700000000000);
    }

    #[test]
    fn unknown_operation_codes_are_preserved() {
        let envelope = ChangeEnvelope::parse(r#"{"op": "t"}"#).unwrap();
        assert_eq!(envelope.operation, Operation::Other("t".to_string()));
        assert_eq!(envelope.operation.as_code(), "t");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let raw = r#"{
            "op": "u",
            "after": {"id": "x"},
            "transaction": {"id": "tx-1"},
            "schema": {"whatever": true},
            "source": {"table": "users", "connector": "postgresql", "db": "app"}
        }"#;

        let envelope = ChangeEnvelope::parse(raw).unwrap();
        assert_eq!(envelope.operation, Operation::Update);
        assert_eq!(envelope.source.table, "users");
    }

    #[test]
    fn missing_source_defaults() {
        let before = Utc::now();
        let envelope = ChangeEnvelope::parse(r#"{"op": "c", "after": {}}"#).unwrap();
        assert_eq!(envelope.source.table, "");
        assert_eq!(envelope.source.sequence, 0);
        assert!(envelope.source.timestamp >= before);
    }

    #[test]
    fn unparsable_timestamp_falls_back_to_now() {
        let before = Utc::now();
        let envelope = ChangeEnvelope::parse(
            r#"{"op": "c", "after": {}, "source": {"ts_ms": "not a time"}}"#,
        )
        .unwrap();
        assert!(envelope.source.timestamp >= before);
    }

    #[test]
    fn sequence_accepts_the_lsn_alias() {
        let envelope =
            ChangeEnvelope::parse(r#"{"op": "c", "after": {}, "source": {"lsn": 7}}"#).unwrap();
        assert_eq!(envelope.source.sequence, 7);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(ChangeEnvelope::parse("{not json").is_err());
        assert!(ChangeEnvelope::parse(r#"{"no_op_field": true}"#).is_err());
    }
}
