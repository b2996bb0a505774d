//! Account domain
//!
//! Users, their one-to-one profiles, and the repository trait both are
//! stored through.

mod entity;
mod repository;

pub use entity::{NewProfile, NewUser, Profile, RecordId, User, PLACEHOLDER_PHONE_NUMBER};
pub use repository::AccountRepository;

#[cfg(test)]
pub use repository::mock::MockAccountRepository;
