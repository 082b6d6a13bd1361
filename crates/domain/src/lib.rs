//! Domain layer for the user-account service.
//!
//! This crate provides the write-side core:
//! - Self-validating value objects (email, name, phone, location, birthdate)
//! - The `User` aggregate with its guarded lifecycle and domain events
//! - The specification engine for composable predicates
//! - The write-repository port and the stateless `UserService`

pub mod error;
pub mod event;
pub mod repository;
pub mod specification;
pub mod user;

pub use error::DomainError;
pub use event::DomainEvent;
pub use repository::UserWriteRepository;
pub use specification::{AndSpecification, Filter, Specification, SpecificationBuilder};
pub use user::{
    ActiveOnly, Adult, AgeRange, Birthdate, ChangePassword, CompleteProfile, DeleteUser, Email,
    FullName, Location, MatchAll, MatchesText, NearLocation, PersistedUser, PhoneNumber,
    RecordLogin, RegisterUser, SetProfileImage, UpdateLocation, UpdatePhoneNumber, UpdateProfile,
    User, UserError, UserEvent, UserService, WithEmail, WithId, WithPhoneNumber,
};
