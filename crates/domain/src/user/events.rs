//! User domain events.

use chrono::{DateTime, Utc};
use common::UserId;
use serde::{Deserialize, Serialize};

use crate::event::DomainEvent;

use super::{Email, FullName, Location, PhoneNumber};

/// Events raised by the user aggregate.
///
/// Events are buffered on the aggregate and drained by the write
/// repository after a successful commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum UserEvent {
    /// A new account was registered.
    Created(UserCreatedData),

    /// Name fields of the profile changed.
    ProfileUpdated(ProfileUpdatedData),

    /// The phone number changed.
    PhoneNumberUpdated(PhoneNumberUpdatedData),

    /// The geographic location changed.
    LocationUpdated(LocationUpdatedData),

    /// The password credential material was replaced.
    PasswordChanged(PasswordChangedData),

    /// A profile image was set.
    ProfileImageSet(ProfileImageSetData),

    /// The profile image was removed.
    ProfileImageRemoved(ProfileImageRemovedData),

    /// The user logged in.
    LoggedIn(LoggedInData),

    /// The account was soft-deleted.
    Deleted(UserDeletedData),
}

impl DomainEvent for UserEvent {
    fn event_type(&self) -> &'static str {
        match self {
            UserEvent::Created(_) => "UserCreated",
            UserEvent::ProfileUpdated(_) => "UserProfileUpdated",
            UserEvent::PhoneNumberUpdated(_) => "UserPhoneNumberUpdated",
            UserEvent::LocationUpdated(_) => "UserLocationUpdated",
            UserEvent::PasswordChanged(_) => "UserPasswordChanged",
            UserEvent::ProfileImageSet(_) => "UserProfileImageSet",
            UserEvent::ProfileImageRemoved(_) => "UserProfileImageRemoved",
            UserEvent::LoggedIn(_) => "UserLoggedIn",
            UserEvent::Deleted(_) => "UserDeleted",
        }
    }
}

/// Data for the Created event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreatedData {
    /// The new account's id.
    pub user_id: UserId,

    /// The registered email address.
    pub email: Email,

    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Data for the ProfileUpdated event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdatedData {
    /// The account whose profile changed.
    pub user_id: UserId,

    /// The name after the update.
    pub name: FullName,

    /// When the profile changed.
    pub updated_at: DateTime<Utc>,
}

/// Data for the PhoneNumberUpdated event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhoneNumberUpdatedData {
    /// The account whose phone number changed.
    pub user_id: UserId,

    /// The phone number after the update.
    pub phone_number: PhoneNumber,

    /// When the phone number changed.
    pub updated_at: DateTime<Utc>,
}

/// Data for the LocationUpdated event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationUpdatedData {
    /// The account whose location changed.
    pub user_id: UserId,

    /// The location after the update.
    pub location: Location,

    /// When the location changed.
    pub updated_at: DateTime<Utc>,
}

/// Data for the PasswordChanged event.
///
/// Carries no credential material; the hash and salt never leave the
/// aggregate through events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordChangedData {
    /// The account whose password changed.
    pub user_id: UserId,

    /// When the password changed.
    pub changed_at: DateTime<Utc>,
}

/// Data for the ProfileImageSet event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileImageSetData {
    /// The account the image belongs to.
    pub user_id: UserId,

    /// Stored name of the image.
    pub image_name: String,

    /// When the image was set.
    pub updated_at: DateTime<Utc>,
}

/// Data for the ProfileImageRemoved event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileImageRemovedData {
    /// The account the image was removed from.
    pub user_id: UserId,

    /// When the image was removed.
    pub updated_at: DateTime<Utc>,
}

/// Data for the LoggedIn event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedInData {
    /// The account that logged in.
    pub user_id: UserId,

    /// When the login happened.
    pub logged_in_at: DateTime<Utc>,
}

/// Data for the Deleted event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDeletedData {
    /// The account that was soft-deleted.
    pub user_id: UserId,

    /// When the account was deleted.
    pub deleted_at: DateTime<Utc>,
}

// Convenience constructors for events
impl UserEvent {
    /// Creates a Created event.
    pub fn created(user_id: UserId, email: Email, created_at: DateTime<Utc>) -> Self {
        UserEvent::Created(UserCreatedData {
            user_id,
            email,
            created_at,
        })
    }

    /// Creates a ProfileUpdated event.
    pub fn profile_updated(user_id: UserId, name: FullName, updated_at: DateTime<Utc>) -> Self {
        UserEvent::ProfileUpdated(ProfileUpdatedData {
            user_id,
            name,
            updated_at,
        })
    }

    /// Creates a PhoneNumberUpdated event.
    pub fn phone_number_updated(
        user_id: UserId,
        phone_number: PhoneNumber,
        updated_at: DateTime<Utc>,
    ) -> Self {
        UserEvent::PhoneNumberUpdated(PhoneNumberUpdatedData {
            user_id,
            phone_number,
            updated_at,
        })
    }

    /// Creates a LocationUpdated event.
    pub fn location_updated(user_id: UserId, location: Location, updated_at: DateTime<Utc>) -> Self {
        UserEvent::LocationUpdated(LocationUpdatedData {
            user_id,
            location,
            updated_at,
        })
    }

    /// Creates a PasswordChanged event.
    pub fn password_changed(user_id: UserId, changed_at: DateTime<Utc>) -> Self {
        UserEvent::PasswordChanged(PasswordChangedData {
            user_id,
            changed_at,
        })
    }

    /// Creates a ProfileImageSet event.
    pub fn profile_image_set(
        user_id: UserId,
        image_name: impl Into<String>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        UserEvent::ProfileImageSet(ProfileImageSetData {
            user_id,
            image_name: image_name.into(),
            updated_at,
        })
    }

    /// Creates a ProfileImageRemoved event.
    pub fn profile_image_removed(user_id: UserId, updated_at: DateTime<Utc>) -> Self {
        UserEvent::ProfileImageRemoved(ProfileImageRemovedData {
            user_id,
            updated_at,
        })
    }

    /// Creates a LoggedIn event.
    pub fn logged_in(user_id: UserId, logged_in_at: DateTime<Utc>) -> Self {
        UserEvent::LoggedIn(LoggedInData {
            user_id,
            logged_in_at,
        })
    }

    /// Creates a Deleted event.
    pub fn deleted(user_id: UserId, deleted_at: DateTime<Utc>) -> Self {
        UserEvent::Deleted(UserDeletedData {
            user_id,
            deleted_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_names() {
        let user_id = UserId::new();
        let email = Email::new("alice@example.com").unwrap();
        let now = Utc::now();

        let event = UserEvent::created(user_id, email, now);
        assert_eq!(event.event_type(), "UserCreated");

        let name = FullName::new("Alice", "Smith").unwrap();
        let event = UserEvent::profile_updated(user_id, name, now);
        assert_eq!(event.event_type(), "UserProfileUpdated");

        let event = UserEvent::logged_in(user_id, now);
        assert_eq!(event.event_type(), "UserLoggedIn");

        let event = UserEvent::deleted(user_id, now);
        assert_eq!(event.event_type(), "UserDeleted");
    }

    #[test]
    fn event_serialization_roundtrip() {
        let user_id = UserId::new();
        let email = Email::new("alice@example.com").unwrap();
        let event = UserEvent::created(user_id, email, Utc::now());

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("Created"));

        let deserialized: UserEvent = serde_json::from_str(&json).unwrap();
        if let UserEvent::Created(data) = deserialized {
            assert_eq!(data.user_id, user_id);
            assert_eq!(data.email.as_str(), "alice@example.com");
        } else {
            panic!("Expected Created event");
        }
    }

    #[test]
    fn password_changed_carries_no_credentials() {
        let event = UserEvent::password_changed(UserId::new(), Utc::now());
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("hash"));
        assert!(!json.contains("salt"));
    }
}
