//! User aggregate implementation.

use chrono::{DateTime, NaiveDate, Utc};
use common::UserId;

use super::commands::RegisterUser;
use super::value_objects::MINIMUM_AGE_YEARS;
use super::{Birthdate, Email, FullName, Location, PhoneNumber, UserError, UserEvent};

/// Persisted state used to rehydrate an aggregate from storage.
///
/// Only repositories construct this; it bypasses the factory's event
/// emission but not value-object validation.
#[derive(Debug, Clone)]
pub struct PersistedUser {
    pub id: UserId,
    pub email: Email,
    pub password_salt: String,
    pub password_hash: String,
    pub name: FullName,
    pub birthdate: Option<Birthdate>,
    pub phone_number: PhoneNumber,
    pub location: Location,
    pub about_me: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
}

/// User aggregate root.
///
/// Owns every mutation rule for an account. The lifecycle has two states,
/// Active and Deleted; Deleted is terminal and every mutating operation
/// except `delete` itself is rejected once it is reached.
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    email: Email,
    password_salt: String,
    password_hash: String,
    name: FullName,
    birthdate: Option<Birthdate>,
    phone_number: PhoneNumber,
    location: Location,
    about_me: Option<String>,
    profile_image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    last_login: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
    is_deleted: bool,
    events: Vec<UserEvent>,
}

impl User {
    /// Creates a new account, validating every field through its value
    /// object and enforcing the minimum registration age.
    ///
    /// Raises exactly one `Created` event.
    pub fn create(input: RegisterUser) -> Result<Self, UserError> {
        let now = Utc::now();
        let today = now.date_naive();

        let email = Email::new(&input.email)?;
        let name = FullName::new(&input.first_name, &input.last_name)?;
        let phone_number = PhoneNumber::new(&input.phone_number)?;
        let location = Location::new(input.latitude, input.longitude)?;

        let birthdate = input
            .birthdate
            .map(|date| Birthdate::new(date, today))
            .transpose()?;

        if let Some(birthdate) = birthdate
            && !birthdate.is_at_least_on(MINIMUM_AGE_YEARS, today)
        {
            return Err(UserError::BelowMinimumAge {
                age: birthdate.age_on(today),
            });
        }

        let id = UserId::new();
        let mut user = Self {
            id,
            email: email.clone(),
            password_salt: input.password_salt,
            password_hash: input.password_hash,
            name,
            birthdate,
            phone_number,
            location,
            about_me: normalize_text(input.about_me),
            profile_image: None,
            created_at: now,
            updated_at: None,
            last_login: None,
            deleted_at: None,
            is_deleted: false,
            events: Vec::new(),
        };

        user.events.push(UserEvent::created(id, email, now));
        Ok(user)
    }

    /// Rehydrates an aggregate from persisted state without raising events.
    pub fn restore(state: PersistedUser) -> Self {
        Self {
            id: state.id,
            email: state.email,
            password_salt: state.password_salt,
            password_hash: state.password_hash,
            name: state.name,
            birthdate: state.birthdate,
            phone_number: state.phone_number,
            location: state.location,
            about_me: state.about_me,
            profile_image: state.profile_image,
            created_at: state.created_at,
            updated_at: state.updated_at,
            last_login: state.last_login,
            deleted_at: state.deleted_at,
            is_deleted: state.is_deleted,
            events: Vec::new(),
        }
    }
}

// Query methods
impl User {
    /// Returns the account id.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the email address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Returns the password salt.
    pub fn password_salt(&self) -> &str {
        &self.password_salt
    }

    /// Returns the password hash.
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Returns the full name.
    pub fn name(&self) -> &FullName {
        &self.name
    }

    /// Returns the birthdate, if set.
    pub fn birthdate(&self) -> Option<Birthdate> {
        self.birthdate
    }

    /// Returns the phone number.
    pub fn phone_number(&self) -> &PhoneNumber {
        &self.phone_number
    }

    /// Returns the location.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Returns the free-text profile description, if set.
    pub fn about_me(&self) -> Option<&str> {
        self.about_me.as_deref()
    }

    /// Returns the stored profile image name, if set.
    pub fn profile_image(&self) -> Option<&str> {
        self.profile_image.as_deref()
    }

    /// Returns when the account was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the account was last updated, if ever.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Returns the last login time, if any.
    pub fn last_login(&self) -> Option<DateTime<Utc>> {
        self.last_login
    }

    /// Returns when the account was soft-deleted, if it was.
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns true if the account is soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    /// Age in whole years, if a birthdate is set.
    pub fn age(&self) -> Option<u32> {
        self.birthdate
            .map(|birthdate| birthdate.age_on(Utc::now().date_naive()))
    }

    /// Returns true if the user is 18 or older.
    ///
    /// Accounts without a birthdate do not count as adults.
    pub fn is_adult(&self) -> bool {
        self.birthdate
            .is_some_and(|birthdate| birthdate.is_adult_on(Utc::now().date_naive()))
    }

    /// Great-circle distance to another user in kilometres.
    pub fn distance_to(&self, other: &User) -> f64 {
        self.location.distance_km(&other.location)
    }

    /// Returns true if the other user is within `radius_km` (inclusive).
    pub fn is_nearby(&self, other: &User, radius_km: f64) -> bool {
        self.location.is_within_km(&other.location, radius_km)
    }
}

// Mutating operations
impl User {
    fn ensure_active(&self, action: &'static str) -> Result<(), UserError> {
        if self.is_deleted {
            return Err(UserError::Deleted { action });
        }
        Ok(())
    }

    /// Updates name, birthdate and description.
    ///
    /// Raises `ProfileUpdated` only when the name actually changes.
    pub fn update_profile(
        &mut self,
        first_name: &str,
        last_name: &str,
        birthdate: Option<NaiveDate>,
        about_me: Option<String>,
    ) -> Result<(), UserError> {
        self.ensure_active("update profile")?;

        let now = Utc::now();
        let name = FullName::new(first_name, last_name)?;
        let birthdate = birthdate
            .map(|date| Birthdate::new(date, now.date_naive()))
            .transpose()?;

        let name_changed = name != self.name;

        self.name = name;
        self.birthdate = birthdate;
        self.about_me = normalize_text(about_me);
        self.updated_at = Some(now);

        if name_changed {
            self.events
                .push(UserEvent::profile_updated(self.id, self.name.clone(), now));
        }
        Ok(())
    }

    /// Replaces the phone number.
    pub fn update_phone_number(&mut self, phone_number: &str) -> Result<(), UserError> {
        self.ensure_active("update phone number")?;

        let phone_number = PhoneNumber::new(phone_number)?;
        let now = Utc::now();

        self.phone_number = phone_number.clone();
        self.updated_at = Some(now);
        self.events
            .push(UserEvent::phone_number_updated(self.id, phone_number, now));
        Ok(())
    }

    /// Replaces the geographic location.
    pub fn update_location(&mut self, latitude: f64, longitude: f64) -> Result<(), UserError> {
        self.ensure_active("update location")?;

        let location = Location::new(latitude, longitude)?;
        let now = Utc::now();

        self.location = location;
        self.updated_at = Some(now);
        self.events
            .push(UserEvent::location_updated(self.id, location, now));
        Ok(())
    }

    /// Replaces the credential material.
    pub fn change_password(
        &mut self,
        password_salt: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Result<(), UserError> {
        self.ensure_active("change password")?;

        let now = Utc::now();
        self.password_salt = password_salt.into();
        self.password_hash = password_hash.into();
        self.updated_at = Some(now);
        self.events.push(UserEvent::password_changed(self.id, now));
        Ok(())
    }

    /// Sets the profile image name.
    pub fn set_profile_image(&mut self, image_name: impl Into<String>) -> Result<(), UserError> {
        self.ensure_active("set profile image")?;

        let image_name = image_name.into();
        let now = Utc::now();

        self.profile_image = Some(image_name.clone());
        self.updated_at = Some(now);
        self.events
            .push(UserEvent::profile_image_set(self.id, image_name, now));
        Ok(())
    }

    /// Removes the profile image.
    pub fn remove_profile_image(&mut self) -> Result<(), UserError> {
        self.ensure_active("remove profile image")?;

        let now = Utc::now();
        self.profile_image = None;
        self.updated_at = Some(now);
        self.events.push(UserEvent::profile_image_removed(self.id, now));
        Ok(())
    }

    /// Records a successful login, advancing `last_login`.
    pub fn record_login(&mut self) -> Result<(), UserError> {
        self.ensure_active("record login")?;

        let now = Utc::now();
        self.last_login = Some(now);
        self.updated_at = Some(now);
        self.events.push(UserEvent::logged_in(self.id, now));
        Ok(())
    }

    /// Soft-deletes the account.
    ///
    /// Idempotent: repeated calls refresh `deleted_at` and never fail.
    /// The `Deleted` event is raised only on the first transition.
    pub fn delete(&mut self) {
        let now = Utc::now();
        let first_transition = !self.is_deleted;

        self.is_deleted = true;
        self.deleted_at = Some(now);

        if first_transition {
            self.events.push(UserEvent::deleted(self.id, now));
        }
    }
}

// Domain events
impl User {
    /// Returns the pending, not-yet-committed events.
    pub fn domain_events(&self) -> &[UserEvent] {
        &self.events
    }

    /// Drains the pending events.
    ///
    /// The write repository is the only expected caller, and only after a
    /// successful commit, so events are never observed for writes that did
    /// not durably commit.
    pub fn drain_events(&mut self) -> Vec<UserEvent> {
        std::mem::take(&mut self.events)
    }
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
