//! CLI module for the account service
//!
//! - `serve`: run the HTTP API
//! - `migrate`: apply the schema and exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};
use tracing::warn;

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;

/// Account Service - signup, login and token-gated account lookups
#[derive(Parser)]
#[command(name = "account-service")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve(serve::ServeArgs),

    /// Apply pending database migrations
    Migrate,
}

/// Load `.env`, configuration and the tracing subscriber.
///
/// A configuration that fails to parse falls back to defaults with a warning.
pub(crate) fn load_config() -> AppConfig {
    dotenvy::dotenv().ok();

    let loaded = AppConfig::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if let Err(e) = loaded {
        warn!("Failed to load configuration, using defaults: {}", e);
    }

    config
}
