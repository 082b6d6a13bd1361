//! Composable predicates over the user aggregate.
//!
//! A specification carries two evaluation surfaces:
//! - [`Specification::is_satisfied_by`] for direct in-memory filtering of
//!   aggregates, and
//! - [`Specification::to_filter`], an expression form each read store
//!   translates into its own native query.
//!
//! The two surfaces must agree on semantics but are never assumed to be
//! interchangeable: a store translates the [`Filter`] tree itself.

use common::UserId;

use crate::user::{MatchAll, User};

/// A named, composable predicate over the user aggregate.
pub trait Specification: Send + Sync {
    /// Returns the specification's name.
    fn name(&self) -> &'static str;

    /// Evaluates the predicate against an aggregate in memory.
    fn is_satisfied_by(&self, user: &User) -> bool;

    /// Returns the expression form used for native-query translation.
    fn to_filter(&self) -> Filter;
}

/// Store-agnostic expression form of a specification.
///
/// Read-store implementations compile this tree into their native filter;
/// `And` is a logical conjunction of the sub-clauses.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches everything.
    All,

    /// Matches accounts that are not soft-deleted.
    ActiveOnly,

    /// Matches accounts whose age is at least 18.
    Adult,

    /// Matches accounts with birthdate, description and profile image set.
    CompleteProfile,

    /// Matches accounts whose age falls in `[min, max)`.
    AgeBetween { min: u32, max: u32 },

    /// Matches accounts within `radius_km` of the centre (inclusive).
    WithinRadius {
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    },

    /// Case-insensitive substring match across name, email and phone.
    MatchesText { term: String },

    /// Exact match on the normalized email address.
    EmailEquals { email: String },

    /// Exact match on the cleaned phone number.
    PhoneEquals { phone_number: String },

    /// Exact match on the account id.
    IdEquals { user_id: UserId },

    /// Logical conjunction of the sub-filters.
    And(Vec<Filter>),
}

/// Conjunction of specifications.
///
/// Evaluation is left-associative and short-circuits on the first
/// non-matching specification.
pub struct AndSpecification {
    specs: Vec<Box<dyn Specification>>,
}

impl AndSpecification {
    /// Combines two specifications.
    pub fn new(left: Box<dyn Specification>, right: Box<dyn Specification>) -> Self {
        Self {
            specs: vec![left, right],
        }
    }

    /// Appends a further specification to the conjunction.
    pub fn push(&mut self, spec: Box<dyn Specification>) {
        self.specs.push(spec);
    }

    fn from_parts(specs: Vec<Box<dyn Specification>>) -> Self {
        Self { specs }
    }
}

impl Specification for AndSpecification {
    fn name(&self) -> &'static str {
        "and"
    }

    fn is_satisfied_by(&self, user: &User) -> bool {
        self.specs.iter().all(|spec| spec.is_satisfied_by(user))
    }

    fn to_filter(&self) -> Filter {
        Filter::And(self.specs.iter().map(|spec| spec.to_filter()).collect())
    }
}

/// Accumulates specifications with logical AND.
///
/// Building with zero specifications yields the explicit pass-all
/// specification; callers select "match everything" deliberately.
#[derive(Default)]
pub struct SpecificationBuilder {
    specs: Vec<Box<dyn Specification>>,
}

impl SpecificationBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a specification to the conjunction.
    pub fn with(mut self, spec: impl Specification + 'static) -> Self {
        self.specs.push(Box::new(spec));
        self
    }

    /// Adds an already-boxed specification to the conjunction.
    pub fn with_boxed(mut self, spec: Box<dyn Specification>) -> Self {
        self.specs.push(spec);
        self
    }

    /// Number of accumulated specifications.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns true if nothing has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Builds the combined specification.
    pub fn build(mut self) -> Box<dyn Specification> {
        match self.specs.len() {
            0 => Box::new(MatchAll),
            1 => self.specs.pop().expect("len checked"),
            _ => Box::new(AndSpecification::from_parts(self.specs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::{ActiveOnly, Adult, RegisterUser};

    fn sample_user() -> User {
        User::create(RegisterUser {
            email: "alice@example.com".to_string(),
            password_salt: "salt".to_string(),
            password_hash: "hash".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            birthdate: chrono::NaiveDate::from_ymd_opt(1990, 6, 15),
            phone_number: "+15551234567".to_string(),
            latitude: 40.7128,
            longitude: -74.0060,
            about_me: None,
        })
        .unwrap()
    }

    #[test]
    fn empty_builder_yields_pass_all() {
        let spec = SpecificationBuilder::new().build();
        assert_eq!(spec.name(), "match_all");
        assert_eq!(spec.to_filter(), Filter::All);
        assert!(spec.is_satisfied_by(&sample_user()));
    }

    #[test]
    fn single_spec_builder_skips_the_conjunction() {
        let spec = SpecificationBuilder::new().with(ActiveOnly).build();
        assert_eq!(spec.name(), "active_only");
        assert_eq!(spec.to_filter(), Filter::ActiveOnly);
    }

    #[test]
    fn and_filter_is_a_conjunction_of_sub_clauses() {
        let spec = SpecificationBuilder::new()
            .with(ActiveOnly)
            .with(Adult)
            .build();

        assert_eq!(
            spec.to_filter(),
            Filter::And(vec![Filter::ActiveOnly, Filter::Adult])
        );
    }

    #[test]
    fn and_evaluation_requires_all_parts() {
        let mut user = sample_user();
        let spec = SpecificationBuilder::new()
            .with(ActiveOnly)
            .with(Adult)
            .build();

        assert!(spec.is_satisfied_by(&user));

        user.delete();
        assert!(!spec.is_satisfied_by(&user));
    }
}
