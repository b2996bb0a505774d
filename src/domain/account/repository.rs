//! Account repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewProfile, NewUser, Profile, RecordId, User};
use crate::domain::DomainError;

/// Storage for users and their profiles
#[async_trait]
pub trait AccountRepository: Send + Sync + Debug {
    /// Insert a user. Duplicate usernames or emails yield `DomainError::Conflict`.
    async fn create_user(&self, user: NewUser) -> Result<User, DomainError>;

    /// Insert a profile for an existing user
    async fn create_profile(&self, profile: NewProfile) -> Result<Profile, DomainError>;

    /// Get a user by primary key
    async fn find_user(&self, id: RecordId) -> Result<Option<User>, DomainError>;

    /// Get a profile by primary key
    async fn find_profile(&self, id: RecordId) -> Result<Option<Profile>, DomainError>;

    /// Get a user by username (for login)
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Check that the backing store answers
    async fn ping(&self) -> Result<(), DomainError>;
}
