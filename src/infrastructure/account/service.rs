//! Account service for signup, credential checks and record lookups

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::domain::account::{
    AccountRepository, NewProfile, NewUser, Profile, RecordId, User,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Account service composing the repository and password storage
#[derive(Debug)]
pub struct AccountService<R: AccountRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: AccountRepository, H: PasswordHasher> AccountService<R, H> {
    /// Create a new account service
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Register a user and attach a placeholder profile.
    ///
    /// The two inserts are not wrapped in a transaction: if the profile insert
    /// fails the user row stays behind without a profile.
    pub async fn sign_up(&self, request: NewUser) -> Result<User, DomainError> {
        let stored_password = self.hasher.hash(&request.password)?;

        let user = self
            .repository
            .create_user(NewUser {
                password: stored_password,
                ..request
            })
            .await?;

        info!(user_id = user.id(), username = %user.username(), "User registered");

        if let Err(e) = self
            .repository
            .create_profile(NewProfile::placeholder_for(user.id()))
            .await
        {
            error!(user_id = user.id(), error = %e, "Failed to create profile for new user");
            return Err(e);
        }

        Ok(user)
    }

    /// Check a username/password pair, returning the user on a match
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let user = match self.repository.find_user_by_username(username).await? {
            Some(u) => u,
            None => {
                debug!(username = %username, "Login for unknown username");
                return Ok(None);
            }
        };

        if user.username() != username || !self.hasher.verify(password, user.password()) {
            debug!(username = %username, "Login with wrong password");
            return Ok(None);
        }

        Ok(Some(user))
    }

    /// Get a user by ID
    pub async fn find_user(&self, id: RecordId) -> Result<Option<User>, DomainError> {
        self.repository.find_user(id).await
    }

    /// Get a profile by ID
    pub async fn find_profile(&self, id: RecordId) -> Result<Option<Profile>, DomainError> {
        self.repository.find_profile(id).await
    }

    /// Check that the backing store answers
    pub async fn health_check(&self) -> Result<(), DomainError> {
        self.repository.ping().await
    }
}
