//! The denormalized read-side document.

use chrono::{DateTime, NaiveDate, Utc};
use common::UserId;
use serde::{Deserialize, Serialize};
use store::UserRecord;

/// A flat, denormalized mirror of the most recently observed committed
/// write for one account.
///
/// The document is disposable: it can always be rebuilt from the write
/// store plus a replay of the change log. Credential material is never
/// projected into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDocument {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub birthdate: Option<NaiveDate>,
    pub latitude: f64,
    pub longitude: f64,
    pub about_me: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
}

impl UserDocument {
    /// Maps a persisted record snapshot into the read-side shape,
    /// dropping credential material.
    pub fn from_record(record: &UserRecord) -> Self {
        Self {
            id: record.id.into(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            email: record.email.clone(),
            phone_number: record.phone_number.clone(),
            birthdate: record.birthdate,
            latitude: record.latitude,
            longitude: record.longitude,
            about_me: record.about_me.clone(),
            profile_image: record.profile_image.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
            last_login: record.last_login,
            deleted_at: record.deleted_at,
            is_deleted: record.is_deleted,
        }
    }

    /// The user's full display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{RegisterUser, User};

    fn sample_record() -> UserRecord {
        let user = User::create(RegisterUser {
            email: "alice@example.com".to_string(),
            password_salt: "salt".to_string(),
            password_hash: "hash".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            birthdate: NaiveDate::from_ymd_opt(1990, 6, 15),
            phone_number: "+15551234567".to_string(),
            latitude: 40.7128,
            longitude: -74.0060,
            about_me: None,
        })
        .unwrap();
        UserRecord::from_user(&user)
    }

    #[test]
    fn document_mirrors_the_record() {
        let record = sample_record();
        let document = UserDocument::from_record(&record);

        assert_eq!(document.id.as_uuid(), record.id);
        assert_eq!(document.email, "alice@example.com");
        assert_eq!(document.full_name(), "Alice Smith");
        assert_eq!(document.birthdate, record.birthdate);
        assert!(!document.is_deleted);
    }

    #[test]
    fn document_never_carries_credentials() {
        let document = UserDocument::from_record(&sample_record());
        let json = serde_json::to_string(&document).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("salt"));
        assert!(!json.contains("hash"));
    }
}
