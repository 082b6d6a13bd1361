//! Concrete specifications over the user aggregate.

use chrono::Utc;
use common::UserId;

use crate::specification::{Filter, Specification};

use super::{Email, Location, PhoneNumber, User};

/// Matches every aggregate.
///
/// This is the explicit pass-all specification an empty builder produces;
/// callers select it deliberately, it is never an implicit default of the
/// read repositories.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchAll;

impl Specification for MatchAll {
    fn name(&self) -> &'static str {
        "match_all"
    }

    fn is_satisfied_by(&self, _user: &User) -> bool {
        true
    }

    fn to_filter(&self) -> Filter {
        Filter::All
    }
}

/// Matches accounts that are not soft-deleted.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActiveOnly;

impl Specification for ActiveOnly {
    fn name(&self) -> &'static str {
        "active_only"
    }

    fn is_satisfied_by(&self, user: &User) -> bool {
        !user.is_deleted()
    }

    fn to_filter(&self) -> Filter {
        Filter::ActiveOnly
    }
}

/// Matches accounts aged 18 or older.
///
/// The boundary is inclusive of the birthday itself; accounts without a
/// birthdate never match.
#[derive(Debug, Clone, Copy, Default)]
pub struct Adult;

impl Specification for Adult {
    fn name(&self) -> &'static str {
        "adult"
    }

    fn is_satisfied_by(&self, user: &User) -> bool {
        user.is_adult()
    }

    fn to_filter(&self) -> Filter {
        Filter::Adult
    }
}

/// Matches accounts whose optional profile fields are all filled in:
/// birthdate, description and profile image.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompleteProfile;

impl Specification for CompleteProfile {
    fn name(&self) -> &'static str {
        "complete_profile"
    }

    fn is_satisfied_by(&self, user: &User) -> bool {
        user.birthdate().is_some() && user.about_me().is_some() && user.profile_image().is_some()
    }

    fn to_filter(&self) -> Filter {
        Filter::CompleteProfile
    }
}

/// Matches accounts whose age falls in `[min, max)`.
///
/// Bounds are applied with date arithmetic, not integer subtraction, so
/// the window is exact across leap years.
#[derive(Debug, Clone, Copy)]
pub struct AgeRange {
    min: u32,
    max: u32,
}

impl AgeRange {
    /// Creates an age-range specification for `[min, max)`.
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

impl Specification for AgeRange {
    fn name(&self) -> &'static str {
        "age_range"
    }

    fn is_satisfied_by(&self, user: &User) -> bool {
        let today = Utc::now().date_naive();
        user.birthdate()
            .is_some_and(|birthdate| birthdate.is_age_between_on(self.min, self.max, today))
    }

    fn to_filter(&self) -> Filter {
        Filter::AgeBetween {
            min: self.min,
            max: self.max,
        }
    }
}

/// Matches accounts within a radius of a centre point.
///
/// Distance is the haversine great-circle distance (not a planar
/// approximation) and the radius boundary is inclusive.
#[derive(Debug, Clone, Copy)]
pub struct NearLocation {
    center: Location,
    radius_km: f64,
}

impl NearLocation {
    /// Creates a geo-radius specification.
    pub fn new(center: Location, radius_km: f64) -> Self {
        Self { center, radius_km }
    }
}

impl Specification for NearLocation {
    fn name(&self) -> &'static str {
        "near_location"
    }

    fn is_satisfied_by(&self, user: &User) -> bool {
        user.location().is_within_km(&self.center, self.radius_km)
    }

    fn to_filter(&self) -> Filter {
        Filter::WithinRadius {
            latitude: self.center.latitude(),
            longitude: self.center.longitude(),
            radius_km: self.radius_km,
        }
    }
}

/// Case-insensitive substring search across first name, last name, email
/// and phone number.
#[derive(Debug, Clone)]
pub struct MatchesText {
    term: String,
}

impl MatchesText {
    /// Creates a free-text search specification.
    ///
    /// An empty term matches everything.
    pub fn new(term: impl AsRef<str>) -> Self {
        Self {
            term: term.as_ref().trim().to_lowercase(),
        }
    }
}

impl Specification for MatchesText {
    fn name(&self) -> &'static str {
        "matches_text"
    }

    fn is_satisfied_by(&self, user: &User) -> bool {
        if self.term.is_empty() {
            return true;
        }
        user.name().first().to_lowercase().contains(&self.term)
            || user.name().last().to_lowercase().contains(&self.term)
            || user.email().as_str().contains(&self.term)
            || user.phone_number().as_str().contains(&self.term)
    }

    fn to_filter(&self) -> Filter {
        Filter::MatchesText {
            term: self.term.clone(),
        }
    }
}

/// Exact match on the normalized email address.
#[derive(Debug, Clone)]
pub struct WithEmail {
    email: Email,
}

impl WithEmail {
    /// Creates an exact-email specification.
    pub fn new(email: Email) -> Self {
        Self { email }
    }
}

impl Specification for WithEmail {
    fn name(&self) -> &'static str {
        "with_email"
    }

    fn is_satisfied_by(&self, user: &User) -> bool {
        user.email() == &self.email
    }

    fn to_filter(&self) -> Filter {
        Filter::EmailEquals {
            email: self.email.as_str().to_string(),
        }
    }
}

/// Exact match on the cleaned phone number.
#[derive(Debug, Clone)]
pub struct WithPhoneNumber {
    phone_number: PhoneNumber,
}

impl WithPhoneNumber {
    /// Creates an exact-phone specification.
    pub fn new(phone_number: PhoneNumber) -> Self {
        Self { phone_number }
    }
}

impl Specification for WithPhoneNumber {
    fn name(&self) -> &'static str {
        "with_phone_number"
    }

    fn is_satisfied_by(&self, user: &User) -> bool {
        user.phone_number() == &self.phone_number
    }

    fn to_filter(&self) -> Filter {
        Filter::PhoneEquals {
            phone_number: self.phone_number.as_str().to_string(),
        }
    }
}

/// Exact match on the account id.
#[derive(Debug, Clone, Copy)]
pub struct WithId {
    user_id: UserId,
}

impl WithId {
    /// Creates an exact-id specification.
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

impl Specification for WithId {
    fn name(&self) -> &'static str {
        "with_id"
    }

    fn is_satisfied_by(&self, user: &User) -> bool {
        user.id() == self.user_id
    }

    fn to_filter(&self) -> Filter {
        Filter::IdEquals {
            user_id: self.user_id,
        }
    }
}
