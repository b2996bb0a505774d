//! Domain layer - Core entities and storage contracts

pub mod account;
pub mod error;

pub use account::{AccountRepository, NewProfile, NewUser, Profile, RecordId, User};
pub use error::DomainError;
