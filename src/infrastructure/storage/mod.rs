//! Storage infrastructure - Postgres connection and schema

pub mod migrations;
mod postgres;

pub use migrations::{run_account_migrations, Migration, PostgresMigrator};
pub use postgres::{connect_options, connect_pool};
