//! User commands.

use chrono::NaiveDate;
use common::UserId;

/// Command to register a new account.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    /// Email address (normalized by the aggregate).
    pub email: String,

    /// Opaque password salt produced by the external hasher.
    pub password_salt: String,

    /// Opaque password hash produced by the external hasher.
    pub password_hash: String,

    /// First name.
    pub first_name: String,

    /// Last name.
    pub last_name: String,

    /// Optional date of birth.
    pub birthdate: Option<NaiveDate>,

    /// Phone number (cleaned by the aggregate).
    pub phone_number: String,

    /// Latitude in degrees.
    pub latitude: f64,

    /// Longitude in degrees.
    pub longitude: f64,

    /// Optional free-text description.
    pub about_me: Option<String>,
}

impl RegisterUser {
    /// Creates a new RegisterUser command.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        email: impl Into<String>,
        password_salt: impl Into<String>,
        password_hash: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        birthdate: Option<NaiveDate>,
        phone_number: impl Into<String>,
        latitude: f64,
        longitude: f64,
        about_me: Option<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password_salt: password_salt.into(),
            password_hash: password_hash.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            birthdate,
            phone_number: phone_number.into(),
            latitude,
            longitude,
            about_me,
        }
    }
}

/// Command to update profile fields.
#[derive(Debug, Clone)]
pub struct UpdateProfile {
    /// The account to update.
    pub user_id: UserId,

    /// New first name.
    pub first_name: String,

    /// New last name.
    pub last_name: String,

    /// New birthdate, replacing the stored one.
    pub birthdate: Option<NaiveDate>,

    /// New description, replacing the stored one.
    pub about_me: Option<String>,
}

impl UpdateProfile {
    /// Creates a new UpdateProfile command.
    pub fn new(
        user_id: UserId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        birthdate: Option<NaiveDate>,
        about_me: Option<String>,
    ) -> Self {
        Self {
            user_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            birthdate,
            about_me,
        }
    }
}

/// Command to replace the phone number.
#[derive(Debug, Clone)]
pub struct UpdatePhoneNumber {
    /// The account to update.
    pub user_id: UserId,

    /// The new phone number.
    pub phone_number: String,
}

impl UpdatePhoneNumber {
    /// Creates a new UpdatePhoneNumber command.
    pub fn new(user_id: UserId, phone_number: impl Into<String>) -> Self {
        Self {
            user_id,
            phone_number: phone_number.into(),
        }
    }
}

/// Command to replace the geographic location.
#[derive(Debug, Clone)]
pub struct UpdateLocation {
    /// The account to update.
    pub user_id: UserId,

    /// New latitude in degrees.
    pub latitude: f64,

    /// New longitude in degrees.
    pub longitude: f64,
}

impl UpdateLocation {
    /// Creates a new UpdateLocation command.
    pub fn new(user_id: UserId, latitude: f64, longitude: f64) -> Self {
        Self {
            user_id,
            latitude,
            longitude,
        }
    }
}

/// Command to replace the credential material.
#[derive(Debug, Clone)]
pub struct ChangePassword {
    /// The account to update.
    pub user_id: UserId,

    /// New opaque salt.
    pub password_salt: String,

    /// New opaque hash.
    pub password_hash: String,
}

impl ChangePassword {
    /// Creates a new ChangePassword command.
    pub fn new(
        user_id: UserId,
        password_salt: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            password_salt: password_salt.into(),
            password_hash: password_hash.into(),
        }
    }
}

/// Command to set the profile image.
#[derive(Debug, Clone)]
pub struct SetProfileImage {
    /// The account to update.
    pub user_id: UserId,

    /// Stored name of the image.
    pub image_name: String,
}

impl SetProfileImage {
    /// Creates a new SetProfileImage command.
    pub fn new(user_id: UserId, image_name: impl Into<String>) -> Self {
        Self {
            user_id,
            image_name: image_name.into(),
        }
    }
}

/// Command to record a successful login.
#[derive(Debug, Clone, Copy)]
pub struct RecordLogin {
    /// The account that logged in.
    pub user_id: UserId,
}

impl RecordLogin {
    /// Creates a new RecordLogin command.
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

/// Command to soft-delete an account.
#[derive(Debug, Clone, Copy)]
pub struct DeleteUser {
    /// The account to delete.
    pub user_id: UserId,
}

impl DeleteUser {
    /// Creates a new DeleteUser command.
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}
