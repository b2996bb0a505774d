//! PostgreSQL connection pool setup

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::domain::DomainError;

const ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Build connection options from configuration, preferring `url` when set
pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, DomainError> {
    if !config.is_postgres() {
        return Err(DomainError::configuration(format!(
            "Unsupported database dialect '{}'. Only postgres is supported.",
            config.dialect
        )));
    }

    if let Some(url) = &config.url {
        return PgConnectOptions::from_str(url)
            .map_err(|e| DomainError::configuration(format!("Invalid database URL: {}", e)));
    }

    let ssl_mode = PgSslMode::from_str(&config.ssl_mode).map_err(|e| {
        DomainError::configuration(format!("Invalid ssl_mode '{}': {}", config.ssl_mode, e))
    })?;

    Ok(PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.name)
        .ssl_mode(ssl_mode))
}

/// Open the process-wide connection pool
pub async fn connect_pool(config: &DatabaseConfig) -> Result<PgPool, DomainError> {
    let options = connect_options(config)?;

    info!(
        host = %config.host,
        port = config.port,
        database = %config.name,
        "Connecting to PostgreSQL"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
        .connect_with(options)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

    info!("PostgreSQL connection established");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_options_from_fields() {
        let config = DatabaseConfig {
            host: "db.internal".to_string(),
            port: 6543,
            user: "accounts".to_string(),
            name: "accounts_db".to_string(),
            ..Default::default()
        };

        let options = connect_options(&config).unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "accounts");
        assert_eq!(options.get_database(), Some("accounts_db"));
    }

    #[test]
    fn test_unsupported_dialect() {
        let config = DatabaseConfig {
            dialect: "mysql".to_string(),
            ..Default::default()
        };

        let result = connect_options(&config);
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_invalid_ssl_mode() {
        let config = DatabaseConfig {
            ssl_mode: "sometimes".to_string(),
            ..Default::default()
        };

        assert!(connect_options(&config).is_err());
    }

    #[test]
    fn test_url_takes_precedence() {
        let config = DatabaseConfig {
            host: "ignored".to_string(),
            url: Some("postgres://u:p@url-host:5433/urldb".to_string()),
            ..Default::default()
        };

        let options = connect_options(&config).unwrap();
        assert_eq!(options.get_host(), "url-host");
        assert_eq!(options.get_port(), 5433);
    }
}
