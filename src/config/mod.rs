//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, DatabaseConfig, LogFormat, LoggingConfig, PasswordStorage,
    ServerConfig, StorageBackend, StorageConfig, MAX_ACCESS_TOKEN_MINUTES,
    MAX_REFRESH_TOKEN_DAYS,
};
