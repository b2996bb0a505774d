//! Application state for shared services

use std::sync::Arc;

use crate::domain::account::{AccountRepository, NewUser, Profile, RecordId, User};
use crate::domain::DomainError;
use crate::infrastructure::account::{AccountService, PasswordHasher};
use crate::infrastructure::auth::TokenCodec;

/// Application state containing shared services using dynamic dispatch.
///
/// Both handles are created once at startup and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountServiceTrait>,
    pub token_service: Arc<dyn TokenCodec>,
}

impl AppState {
    pub fn new(
        account_service: Arc<dyn AccountServiceTrait>,
        token_service: Arc<dyn TokenCodec>,
    ) -> Self {
        Self {
            account_service,
            token_service,
        }
    }
}

/// Trait for account service operations
#[async_trait::async_trait]
pub trait AccountServiceTrait: Send + Sync {
    async fn sign_up(&self, request: NewUser) -> Result<User, DomainError>;
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError>;
    async fn find_user(&self, id: RecordId) -> Result<Option<User>, DomainError>;
    async fn find_profile(&self, id: RecordId) -> Result<Option<Profile>, DomainError>;
    async fn health_check(&self) -> Result<(), DomainError>;
}

#[async_trait::async_trait]
impl<R, H> AccountServiceTrait for AccountService<R, H>
where
    R: AccountRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn sign_up(&self, request: NewUser) -> Result<User, DomainError> {
        AccountService::sign_up(self, request).await
    }

    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        AccountService::authenticate(self, username, password).await
    }

    async fn find_user(&self, id: RecordId) -> Result<Option<User>, DomainError> {
        AccountService::find_user(self, id).await
    }

    async fn find_profile(&self, id: RecordId) -> Result<Option<Profile>, DomainError> {
        AccountService::find_profile(self, id).await
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        AccountService::health_check(self).await
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use crate::infrastructure::account::{InMemoryAccountRepository, PlaintextPasswords};
    use crate::infrastructure::auth::{JwtConfig, JwtService};

    pub const TEST_SECRET: &str = "test-secret-key-12345";

    /// State backed by an empty in-memory repository
    pub fn in_memory_state() -> AppState {
        with_repository(Arc::new(InMemoryAccountRepository::new()))
    }

    /// State over a caller-supplied repository
    pub fn with_repository<R: AccountRepository + 'static>(repository: Arc<R>) -> AppState {
        AppState::new(
            Arc::new(AccountService::new(
                repository,
                Arc::new(PlaintextPasswords::new()),
            )),
            Arc::new(JwtService::new(JwtConfig::with_secret(TEST_SECRET))),
        )
    }
}
