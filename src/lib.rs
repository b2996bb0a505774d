//! Account Service
//!
//! A small HTTP service for account management:
//! - User signup with a placeholder profile
//! - Login issuing HS256 access/refresh token pairs
//! - Token-gated user and profile lookups
//! - Postgres or in-memory storage

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::{AccountServiceTrait, AppState};
use chrono::Duration;
use crate::config::{PasswordStorage, StorageBackend};
use domain::AccountRepository;
use infrastructure::{
    account::{
        AccountService, Argon2Hasher, InMemoryAccountRepository, PlaintextPasswords,
        PostgresAccountRepository,
    },
    auth::{JwtConfig, JwtService, TokenCodec},
    storage::{connect_pool, run_account_migrations},
};
use rand::Rng;
use tracing::info;

/// Environment variable consulted when no signing secret is configured
pub const JWT_KEY_ENV: &str = "JWT_KEY";

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    config.validate()?;

    let account_service = match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory account storage");
            create_account_service(config, Arc::new(InMemoryAccountRepository::new()))
        }
        StorageBackend::Postgres => {
            let pool = connect_pool(&config.database).await?;
            run_account_migrations(&pool).await?;
            info!(
                host = %config.database.host,
                database = %config.database.name,
                "Using Postgres account storage"
            );
            create_account_service(config, Arc::new(PostgresAccountRepository::new(pool)))
        }
    };

    let token_service = create_token_service(config);

    Ok(AppState::new(account_service, token_service))
}

fn create_account_service<R>(config: &AppConfig, repository: Arc<R>) -> Arc<dyn AccountServiceTrait>
where
    R: AccountRepository + 'static,
{
    match config.auth.password_storage {
        PasswordStorage::Plaintext => Arc::new(AccountService::new(
            repository,
            Arc::new(PlaintextPasswords::new()),
        )),
        PasswordStorage::Argon2 => {
            Arc::new(AccountService::new(repository, Arc::new(Argon2Hasher::new())))
        }
    }
}

/// Create the token service from secret (config, env var, or random)
fn create_token_service(config: &AppConfig) -> Arc<dyn TokenCodec> {
    let secret = resolve_jwt_secret(
        config.auth.jwt_secret.clone(),
        std::env::var(JWT_KEY_ENV).ok(),
    );

    Arc::new(JwtService::new(JwtConfig::new(
        secret,
        Duration::minutes(i64::from(config.auth.access_token_minutes)),
        Duration::days(i64::from(config.auth.refresh_token_days)),
    )))
}

fn resolve_jwt_secret(configured: Option<String>, from_env: Option<String>) -> String {
    configured
        .filter(|s| !s.is_empty())
        .or_else(|| from_env.filter(|s| !s.is_empty()))
        .unwrap_or_else(|| {
            tracing::warn!(
                "No JWT secret configured and JWT_KEY is unset. Generating random secret. \
                Issued tokens will NOT survive a restart."
            );
            generate_random_secret()
        })
}

/// Generate a random JWT secret
fn generate_random_secret() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_secret_wins() {
        let secret = resolve_jwt_secret(Some("from-config".into()), Some("from-env".into()));
        assert_eq!(secret, "from-config");
    }

    #[test]
    fn test_env_secret_used_when_config_empty() {
        let secret = resolve_jwt_secret(Some(String::new()), Some("from-env".into()));
        assert_eq!(secret, "from-env");
    }

    #[test]
    fn test_random_secret_generated() {
        let first = resolve_jwt_secret(None, None);
        let second = resolve_jwt_secret(None, None);

        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_memory_backend_state() {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Memory;
        config.auth.jwt_secret = Some("state-test-secret".into());
        config.auth.access_token_minutes = 5;

        let state = create_app_state_with_config(&config).await.unwrap();

        assert!(state.account_service.health_check().await.is_ok());
        assert_eq!(state.token_service.access_token_ttl(), Duration::minutes(5));
        assert_eq!(state.token_service.refresh_token_ttl(), Duration::days(30));
    }

    #[tokio::test]
    async fn test_out_of_range_lifetime_rejected_at_startup() {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Memory;
        config.auth.refresh_token_days = u32::MAX;

        assert!(create_app_state_with_config(&config).await.is_err());
    }
}
