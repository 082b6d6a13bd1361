//! Persisted row shape of a user account.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use domain::{
    Birthdate, DomainError, Email, FullName, Location, PersistedUser, PhoneNumber, User, UserError,
};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// The persisted field layout of a user row.
///
/// The serde field names double as the change-log wire names: the CDC
/// envelope's `before`/`after` snapshots deserialize into this type.
/// Timestamp fields tolerate unparsable values by falling back to now,
/// so one bad clock upstream cannot poison an envelope.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub password_salt: String,
    #[serde(default)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub birthdate: Option<NaiveDate>,
    pub phone_number: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub about_me: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default = "Utc::now", deserialize_with = "timestamp_or_now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "opt_timestamp_or_now")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "opt_timestamp_or_now")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "opt_timestamp_or_now")]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_deleted: bool,
}

impl UserRecord {
    /// Captures the persisted state of an aggregate.
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id().as_uuid(),
            email: user.email().as_str().to_string(),
            password_salt: user.password_salt().to_string(),
            password_hash: user.password_hash().to_string(),
            first_name: user.name().first().to_string(),
            last_name: user.name().last().to_string(),
            birthdate: user.birthdate().map(Into::into),
            phone_number: user.phone_number().as_str().to_string(),
            latitude: user.location().latitude(),
            longitude: user.location().longitude(),
            about_me: user.about_me().map(str::to_string),
            profile_image: user.profile_image().map(str::to_string),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
            last_login: user.last_login(),
            deleted_at: user.deleted_at(),
            is_deleted: user.is_deleted(),
        }
    }

    /// Rehydrates the aggregate this row describes.
    ///
    /// Value objects re-validate on the way out; a row that no longer
    /// passes validation is reported as a storage error, not as caller
    /// input.
    pub fn into_user(self) -> Result<User, DomainError> {
        let email = Email::new(&self.email).map_err(corrupt_row)?;
        let name = FullName::new(&self.first_name, &self.last_name).map_err(corrupt_row)?;
        let phone_number = PhoneNumber::new(&self.phone_number).map_err(corrupt_row)?;
        let location = Location::new(self.latitude, self.longitude).map_err(corrupt_row)?;
        let birthdate = self
            .birthdate
            .map(|date| Birthdate::new(date, Utc::now().date_naive()))
            .transpose()
            .map_err(corrupt_row)?;

        Ok(User::restore(PersistedUser {
            id: self.id.into(),
            email,
            password_salt: self.password_salt,
            password_hash: self.password_hash,
            name,
            birthdate,
            phone_number,
            location,
            about_me: self.about_me,
            profile_image: self.profile_image,
            created_at: self.created_at,
            updated_at: self.updated_at,
            last_login: self.last_login,
            deleted_at: self.deleted_at,
            is_deleted: self.is_deleted,
        }))
    }
}

fn corrupt_row(err: UserError) -> DomainError {
    DomainError::Storage(format!("corrupt user row: {err}"))
}

/// Parses a timestamp from an RFC 3339 string or epoch milliseconds.
pub(crate) fn parse_timestamp(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::String(text) => DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        serde_json::Value::Number(number) => number
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}

fn timestamp_or_now<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(parse_timestamp(&value).unwrap_or_else(Utc::now))
}

fn opt_timestamp_or_now<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(Some(parse_timestamp(&value).unwrap_or_else(Utc::now)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::RegisterUser;

    fn sample_user() -> User {
        User::create(RegisterUser {
            email: "alice@example.com".to_string(),
            password_salt: "salt".to_string(),
            password_hash: "hash".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            birthdate: NaiveDate::from_ymd_opt(1990, 6, 15),
            phone_number: "+15551234567".to_string(),
            latitude: 40.7128,
            longitude: -74.0060,
            about_me: Some("hello".to_string()),
        })
        .unwrap()
    }

    #[test]
    fn record_roundtrips_through_the_aggregate() {
        let user = sample_user();
        let record = UserRecord::from_user(&user);
        let restored = record.clone().into_user().unwrap();

        assert_eq!(restored.id(), user.id());
        assert_eq!(restored.email(), user.email());
        assert_eq!(restored.phone_number(), user.phone_number());
        assert_eq!(restored.birthdate(), user.birthdate());
        assert!(restored.domain_events().is_empty());
    }

    #[test]
    fn record_json_uses_persisted_field_names() {
        let record = UserRecord::from_user(&sample_user());
        let json = serde_json::to_value(&record).unwrap();

        assert!(json.get("first_name").is_some());
        assert!(json.get("phone_number").is_some());
        assert!(json.get("is_deleted").is_some());
        assert!(json.get("created_at").is_some());
    }

    #[test]
    fn record_tolerates_missing_optional_fields() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "email": "alice@example.com",
            "first_name": "Alice",
            "last_name": "Smith",
            "phone_number": "+15551234567",
            "latitude": 40.7128,
            "longitude": -74.0060,
        });

        let record: UserRecord = serde_json::from_value(json).unwrap();
        assert!(!record.is_deleted);
        assert!(record.updated_at.is_none());
        assert!(record.birthdate.is_none());
    }

    #[test]
    fn unparsable_timestamp_falls_back_to_now() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "email": "alice@example.com",
            "first_name": "Alice",
            "last_name": "Smith",
            "phone_number": "+15551234567",
            "created_at": "definitely not a timestamp",
            "updated_at": "also not one",
        });

        let before = Utc::now();
        let record: UserRecord = serde_json::from_value(json).unwrap();
        assert!(record.created_at >= before);
        assert!(record.updated_at.unwrap() >= before);
    }

    #[test]
    fn epoch_millis_timestamps_are_accepted() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "email": "alice@example.com",
            "first_name": "Alice",
            "last_name": "Smith",
            "phone_number": "+15551234567",
            "created_at": 1_700_000_000_000i64,
        });

        let record: UserRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.created_at.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn corrupt_row_is_a_storage_error() {
        let mut record = UserRecord::from_user(&sample_user());
        record.email = "garbage".to_string();

        let result = record.into_user();
        assert!(matches!(result, Err(DomainError::Storage(_))));
    }
}
