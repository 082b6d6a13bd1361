//! Value objects for the user domain.

use std::sync::LazyLock;

use chrono::{Datelike, Months, NaiveDate};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use super::UserError;

/// Minimum age (in years) required to register an account.
pub const MINIMUM_AGE_YEARS: u32 = 13;

/// Age (in years) at which a user counts as an adult.
pub const ADULT_AGE_YEARS: u32 = 18;

/// Maximum length of a name component after trimming.
pub const MAX_NAME_LENGTH: usize = 100;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_+\-.]+@[a-zA-Z0-9\-.]+\.[a-zA-Z]{2,7}$").expect("valid email pattern")
});

/// A validated, normalized email address.
///
/// Stored trimmed and lower-cased so that lookups and uniqueness checks
/// are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Parses and normalizes an email address.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserError> {
        let normalized = value.as_ref().trim().to_lowercase();
        if normalized.is_empty() || !EMAIL_PATTERN.is_match(&normalized) {
            return Err(UserError::InvalidEmail {
                value: value.as_ref().to_string(),
            });
        }
        Ok(Self(normalized))
    }

    /// Returns the normalized address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A user's first and last name, each 1–100 characters after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullName {
    first: String,
    last: String,
}

impl FullName {
    /// Validates and trims both name components.
    pub fn new(first: impl AsRef<str>, last: impl AsRef<str>) -> Result<Self, UserError> {
        Ok(Self {
            first: Self::validate_component("first_name", first.as_ref())?,
            last: Self::validate_component("last_name", last.as_ref())?,
        })
    }

    fn validate_component(field: &'static str, value: &str) -> Result<String, UserError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(UserError::EmptyName { field });
        }
        let length = trimmed.chars().count();
        if length > MAX_NAME_LENGTH {
            return Err(UserError::NameTooLong { field, length });
        }
        Ok(trimmed.to_string())
    }

    /// Returns the first name.
    pub fn first(&self) -> &str {
        &self.first
    }

    /// Returns the last name.
    pub fn last(&self) -> &str {
        &self.last
    }
}

impl std::fmt::Display for FullName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.first, self.last)
    }
}

/// A phone number cleaned to digits plus an optional leading `+`.
///
/// Accepts common formatting (spaces, dashes, parentheses) on input and
/// keeps only the digits, 7–15 of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Cleans and validates a phone number.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserError> {
        let raw = value.as_ref().trim();
        let international = raw.starts_with('+');
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

        if !(7..=15).contains(&digits.len()) {
            return Err(UserError::InvalidPhoneNumber {
                value: value.as_ref().to_string(),
            });
        }

        let cleaned = if international {
            format!("+{digits}")
        } else {
            digits
        };
        Ok(Self(cleaned))
    }

    /// Returns the cleaned number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the digits without the leading `+`, if any.
    pub fn digits(&self) -> &str {
        self.0.strip_prefix('+').unwrap_or(&self.0)
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A geographic coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

/// Mean Earth radius used for great-circle distances.
const EARTH_RADIUS_KM: f64 = 6371.0;

impl Location {
    /// Validates latitude ∈ [-90, 90] and longitude ∈ [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, UserError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(UserError::InvalidLatitude { value: latitude });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(UserError::InvalidLongitude { value: longitude });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Returns the latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to another location in kilometres (haversine).
    pub fn distance_km(&self, other: &Location) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }

    /// Returns true if `other` lies within `radius_km` (inclusive boundary).
    pub fn is_within_km(&self, other: &Location, radius_km: f64) -> bool {
        self.distance_km(other) <= radius_km
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// A date of birth with age derivations done via date arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Birthdate(NaiveDate);

impl Birthdate {
    /// Validates that the date is not in the future relative to `today`.
    pub fn new(date: NaiveDate, today: NaiveDate) -> Result<Self, UserError> {
        if date > today {
            return Err(UserError::BirthdateInFuture { date });
        }
        Ok(Self(date))
    }

    /// Returns the underlying date.
    pub fn as_date(&self) -> NaiveDate {
        self.0
    }

    /// Age in whole years on the given date.
    pub fn age_on(&self, date: NaiveDate) -> u32 {
        let mut age = date.year() - self.0.year();
        if (date.month(), date.day()) < (self.0.month(), self.0.day()) {
            age -= 1;
        }
        age.max(0) as u32
    }

    /// Returns true if the person is at least `years` old on `date`.
    ///
    /// Computed as `birthdate <= date - years` with month arithmetic, so a
    /// Feb 29 birthday clamps to Feb 28 in non-leap years. The boundary is
    /// inclusive: the birthday itself counts.
    pub fn is_at_least_on(&self, years: u32, date: NaiveDate) -> bool {
        match date.checked_sub_months(Months::new(years * 12)) {
            Some(cutoff) => self.0 <= cutoff,
            None => false,
        }
    }

    /// Returns true if the person is an adult (18 or older) on `date`.
    pub fn is_adult_on(&self, date: NaiveDate) -> bool {
        self.is_at_least_on(ADULT_AGE_YEARS, date)
    }

    /// Returns true if the age on `date` falls in `[min, max)`.
    pub fn is_age_between_on(&self, min: u32, max: u32, date: NaiveDate) -> bool {
        self.is_at_least_on(min, date) && !self.is_at_least_on(max, date)
    }
}

impl From<Birthdate> for NaiveDate {
    fn from(birthdate: Birthdate) -> Self {
        birthdate.0
    }
}

impl std::fmt::Display for Birthdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn email_is_lowercased_and_trimmed() {
        let email = Email::new("  Alice@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
    }

    #[test]
    fn email_rejects_malformed_input() {
        assert!(Email::new("").is_err());
        assert!(Email::new("not-an-email").is_err());
        assert!(Email::new("missing@domain").is_err());
        assert!(Email::new("@example.com").is_err());
        assert!(Email::new("two words@example.com").is_err());
    }

    #[test]
    fn email_accepts_plus_and_dots() {
        assert!(Email::new("alice+tag@example.com").is_ok());
        assert!(Email::new("a.b.c@sub.example.co").is_ok());
    }

    #[test]
    fn full_name_trims_components() {
        let name = FullName::new("  Alice ", " Smith  ").unwrap();
        assert_eq!(name.first(), "Alice");
        assert_eq!(name.last(), "Smith");
        assert_eq!(name.to_string(), "Alice Smith");
    }

    #[test]
    fn full_name_rejects_empty_components() {
        let err = FullName::new("   ", "Smith").unwrap_err();
        assert!(matches!(err, UserError::EmptyName {
            field: "first_name"
        }));

        let err = FullName::new("Alice", "").unwrap_err();
        assert!(matches!(err, UserError::EmptyName { field: "last_name" }));
    }

    #[test]
    fn full_name_rejects_overlong_components() {
        let long = "x".repeat(101);
        let err = FullName::new(&long, "Smith").unwrap_err();
        assert!(matches!(err, UserError::NameTooLong {
            field: "first_name",
            length: 101
        }));

        let max = "x".repeat(100);
        assert!(FullName::new(&max, "Smith").is_ok());
    }

    #[test]
    fn phone_number_strips_formatting() {
        let phone = PhoneNumber::new("+1 (555) 123-4567").unwrap();
        assert_eq!(phone.as_str(), "+15551234567");
        assert_eq!(phone.digits(), "15551234567");

        let phone = PhoneNumber::new("555 123 4567").unwrap();
        assert_eq!(phone.as_str(), "5551234567");
    }

    #[test]
    fn phone_number_enforces_digit_bounds() {
        assert!(PhoneNumber::new("123456").is_err()); // 6 digits
        assert!(PhoneNumber::new("1234567").is_ok()); // 7 digits
        assert!(PhoneNumber::new("123456789012345").is_ok()); // 15 digits
        assert!(PhoneNumber::new("1234567890123456").is_err()); // 16 digits
    }

    #[test]
    fn location_validates_bounds() {
        assert!(Location::new(90.0, 180.0).is_ok());
        assert!(Location::new(-90.0, -180.0).is_ok());
        assert!(matches!(
            Location::new(90.1, 0.0),
            Err(UserError::InvalidLatitude { .. })
        ));
        assert!(matches!(
            Location::new(0.0, -180.5),
            Err(UserError::InvalidLongitude { .. })
        ));
        assert!(Location::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn distance_between_identical_points_is_zero() {
        let loc = Location::new(40.7128, -74.0060).unwrap();
        assert!(loc.distance_km(&loc) < 1.0);
    }

    #[test]
    fn distance_new_york_to_london() {
        let new_york = Location::new(40.7128, -74.0060).unwrap();
        let london = Location::new(51.5074, -0.1278).unwrap();
        let distance = new_york.distance_km(&london);
        assert!(
            (5500.0..5600.0).contains(&distance),
            "unexpected distance: {distance}"
        );
    }

    #[test]
    fn radius_boundary_is_inclusive() {
        let a = Location::new(0.0, 0.0).unwrap();
        let b = Location::new(0.0, 0.0).unwrap();
        assert!(a.is_within_km(&b, 0.0));
    }

    #[test]
    fn birthdate_rejects_future_dates() {
        let today = date(2024, 6, 1);
        assert!(Birthdate::new(date(2024, 6, 2), today).is_err());
        assert!(Birthdate::new(today, today).is_ok());
    }

    #[test]
    fn age_counts_whole_years() {
        let birthdate = Birthdate::new(date(2000, 6, 15), date(2024, 1, 1)).unwrap();
        assert_eq!(birthdate.age_on(date(2024, 6, 14)), 23);
        assert_eq!(birthdate.age_on(date(2024, 6, 15)), 24);
        assert_eq!(birthdate.age_on(date(2024, 6, 16)), 24);
    }

    #[test]
    fn adult_boundary_is_inclusive_of_birthday() {
        let birthdate = Birthdate::new(date(2006, 3, 10), date(2024, 1, 1)).unwrap();
        assert!(!birthdate.is_adult_on(date(2024, 3, 9)));
        assert!(birthdate.is_adult_on(date(2024, 3, 10)));
    }

    #[test]
    fn leap_day_birthday_clamps_in_non_leap_years() {
        let birthdate = Birthdate::new(date(2008, 2, 29), date(2024, 1, 1)).unwrap();
        // 2026 is not a leap year; the cutoff clamps to Feb 28.
        assert!(birthdate.is_at_least_on(18, date(2026, 2, 28)));
        assert!(!birthdate.is_at_least_on(18, date(2026, 2, 27)));
    }

    #[test]
    fn age_range_lower_inclusive_upper_exclusive() {
        let today = date(2024, 6, 1);
        let eighteen_today = Birthdate::new(date(2006, 6, 1), today).unwrap();
        let almost_thirty = Birthdate::new(date(1994, 6, 2), today).unwrap();
        let thirty_today = Birthdate::new(date(1994, 6, 1), today).unwrap();

        assert!(eighteen_today.is_age_between_on(18, 30, today));
        assert!(almost_thirty.is_age_between_on(18, 30, today));
        assert!(!thirty_today.is_age_between_on(18, 30, today));
    }
}
