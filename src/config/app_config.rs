use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Relational store connection settings
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub dialect: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub ssl_mode: String,
    pub max_connections: u32,
    /// Full connection URL, takes precedence over the individual fields
    pub url: Option<String>,
}

/// Where accounts are kept
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Signing secret; falls back to the JWT_KEY environment variable
    pub jwt_secret: Option<String>,
    pub access_token_minutes: u32,
    pub refresh_token_days: u32,
    pub password_storage: PasswordStorage,
}

/// How passwords are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PasswordStorage {
    #[default]
    Plaintext,
    Argon2,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dialect: "postgres".to_string(),
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            name: "accounts".to_string(),
            ssl_mode: "disable".to_string(),
            max_connections: 5,
            url: None,
        }
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("dialect", &self.dialect)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[hidden]")
            .field("name", &self.name)
            .field("ssl_mode", &self.ssl_mode)
            .field("max_connections", &self.max_connections)
            .field("url", &self.url.as_ref().map(|_| "[hidden]"))
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            access_token_minutes: 30,
            refresh_token_days: 30,
            password_storage: PasswordStorage::default(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[hidden]"))
            .field("access_token_minutes", &self.access_token_minutes)
            .field("refresh_token_days", &self.refresh_token_days)
            .field("password_storage", &self.password_storage)
            .finish()
    }
}

impl DatabaseConfig {
    /// Whether the configured dialect is one this build can talk to
    pub fn is_postgres(&self) -> bool {
        matches!(
            self.dialect.to_lowercase().as_str(),
            "postgres" | "postgresql"
        )
    }
}

/// Longest accepted access token lifetime (one year)
pub const MAX_ACCESS_TOKEN_MINUTES: u32 = 60 * 24 * 365;

/// Longest accepted refresh token lifetime (one hundred years)
pub const MAX_REFRESH_TOKEN_DAYS: u32 = 365 * 100;

impl AuthConfig {
    /// Reject token lifetimes that are zero or too large to turn into an expiry
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if !(1..=MAX_ACCESS_TOKEN_MINUTES).contains(&self.access_token_minutes) {
            return Err(config::ConfigError::Message(format!(
                "auth.access_token_minutes must be between 1 and {}, got {}",
                MAX_ACCESS_TOKEN_MINUTES, self.access_token_minutes
            )));
        }

        if !(1..=MAX_REFRESH_TOKEN_DAYS).contains(&self.refresh_token_days) {
            return Err(config::ConfigError::Message(format!(
                "auth.refresh_token_days must be between 1 and {}, got {}",
                MAX_REFRESH_TOKEN_DAYS, self.refresh_token_days
            )));
        }

        Ok(())
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        self.auth.validate()
    }

    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }
}
