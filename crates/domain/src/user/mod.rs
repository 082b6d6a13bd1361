//! User aggregate and related types.

mod aggregate;
mod commands;
mod events;
mod service;
mod specifications;
mod value_objects;

pub use aggregate::{PersistedUser, User};
pub use commands::{
    ChangePassword, DeleteUser, RecordLogin, RegisterUser, SetProfileImage, UpdateLocation,
    UpdatePhoneNumber, UpdateProfile,
};
pub use events::{
    LocationUpdatedData, LoggedInData, PasswordChangedData, PhoneNumberUpdatedData,
    ProfileImageRemovedData, ProfileImageSetData, ProfileUpdatedData, UserCreatedData,
    UserDeletedData, UserEvent,
};
pub use service::UserService;
pub use specifications::{
    ActiveOnly, Adult, AgeRange, CompleteProfile, MatchAll, MatchesText, NearLocation, WithEmail,
    WithId, WithPhoneNumber,
};
pub use value_objects::{
    ADULT_AGE_YEARS, Birthdate, Email, FullName, Location, MAX_NAME_LENGTH, MINIMUM_AGE_YEARS,
    PhoneNumber,
};

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// A name component is empty after trimming.
    #[error("{field} must not be empty")]
    EmptyName { field: &'static str },

    /// A name component exceeds the maximum length.
    #[error("{field} is too long: {length} characters (maximum is 100)")]
    NameTooLong { field: &'static str, length: usize },

    /// The email address is malformed.
    #[error("Invalid email address: {value}")]
    InvalidEmail { value: String },

    /// The phone number has too few or too many digits.
    #[error("Invalid phone number: {value} (must contain 7-15 digits)")]
    InvalidPhoneNumber { value: String },

    /// Latitude outside [-90, 90].
    #[error("Invalid latitude: {value} (must be between -90 and 90)")]
    InvalidLatitude { value: f64 },

    /// Longitude outside [-180, 180].
    #[error("Invalid longitude: {value} (must be between -180 and 180)")]
    InvalidLongitude { value: f64 },

    /// The birthdate lies in the future.
    #[error("Birthdate is in the future: {date}")]
    BirthdateInFuture { date: NaiveDate },

    /// The derived age is below the registration minimum.
    #[error("User is too young to register: {age} (minimum is 13)")]
    BelowMinimumAge { age: u32 },

    /// A mutation was attempted on a soft-deleted account.
    #[error("Cannot {action}: the account has been deleted")]
    Deleted { action: &'static str },
}

impl UserError {
    /// Returns true for malformed-input errors, as opposed to the
    /// invalid-state error on deleted accounts.
    pub fn is_validation(&self) -> bool {
        !matches!(self, UserError::Deleted { .. })
    }
}
