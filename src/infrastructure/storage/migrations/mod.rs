//! Database schema migrations
//!
//! Applied on every `serve` start and by the `migrate` subcommand. Each
//! migration runs once and is recorded in `_migrations`.

use sqlx::postgres::PgPool;
use tracing::info;

use crate::domain::DomainError;

/// PostgreSQL migrator tracking applied versions in `_migrations`
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the migrations table if it doesn't exist
    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                success BOOLEAN NOT NULL DEFAULT TRUE
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    /// Runs a single migration unless it is already recorded.
    ///
    /// Returns whether the migration was applied by this call.
    pub async fn run_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.ensure_migrations_table().await?;

        let applied: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)",
        )
        .bind(migration.version)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to check migration status: {}", e)))?;

        if applied {
            return Ok(false);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to start migration: {}", e)))?;

        // Migrations hold several statements, which prepared queries reject
        sqlx::raw_sql(&migration.up)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(&migration.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit migration: {}", e)))?;

        Ok(true)
    }

    /// Returns the latest applied migration version
    pub async fn current_version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        let version: Option<i64> = sqlx::query_scalar(
            "SELECT MAX(version) FROM _migrations WHERE success = TRUE",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get migration version: {}", e)))?;

        Ok(version)
    }
}

/// Represents a database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version, strictly increasing
    pub version: i64,
    /// Human-readable description
    pub description: String,
    /// SQL to run when applying the migration
    pub up: String,
}

impl Migration {
    pub fn new(version: i64, description: impl Into<String>, up: impl Into<String>) -> Self {
        Self {
            version,
            description: description.into(),
            up: up.into(),
        }
    }
}

/// Schema for users and profiles.
///
/// Tables use the layout of the deployment this service replaces: `SERIAL`
/// ids, nullable columns, a `deleted_at` soft-delete column and `uix_*`
/// unique indexes. Every statement is idempotent so a database created by
/// that deployment is brought up to date rather than skipped.
pub fn account_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "Create or update users table",
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id SERIAL PRIMARY KEY,
                created_at TIMESTAMPTZ,
                updated_at TIMESTAMPTZ,
                deleted_at TIMESTAMPTZ,
                user_name VARCHAR(20),
                password TEXT,
                email VARCHAR(100)
            );
            ALTER TABLE users ADD COLUMN IF NOT EXISTS created_at TIMESTAMPTZ;
            ALTER TABLE users ADD COLUMN IF NOT EXISTS updated_at TIMESTAMPTZ;
            ALTER TABLE users ADD COLUMN IF NOT EXISTS deleted_at TIMESTAMPTZ;
            ALTER TABLE users ADD COLUMN IF NOT EXISTS user_name VARCHAR(20);
            ALTER TABLE users ADD COLUMN IF NOT EXISTS password TEXT;
            ALTER TABLE users ADD COLUMN IF NOT EXISTS email VARCHAR(100);
            CREATE UNIQUE INDEX IF NOT EXISTS uix_users_user_name ON users(user_name);
            CREATE UNIQUE INDEX IF NOT EXISTS uix_users_email ON users(email);
            CREATE INDEX IF NOT EXISTS idx_users_deleted_at ON users(deleted_at);
            "#,
        ),
        Migration::new(
            2,
            "Create or update profiles table",
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                id SERIAL PRIMARY KEY,
                created_at TIMESTAMPTZ,
                updated_at TIMESTAMPTZ,
                deleted_at TIMESTAMPTZ,
                first_name TEXT,
                last_name TEXT,
                profile_picture TEXT,
                phone_number TEXT,
                user_id INTEGER
            );
            ALTER TABLE profiles ADD COLUMN IF NOT EXISTS created_at TIMESTAMPTZ;
            ALTER TABLE profiles ADD COLUMN IF NOT EXISTS updated_at TIMESTAMPTZ;
            ALTER TABLE profiles ADD COLUMN IF NOT EXISTS deleted_at TIMESTAMPTZ;
            ALTER TABLE profiles ADD COLUMN IF NOT EXISTS first_name TEXT;
            ALTER TABLE profiles ADD COLUMN IF NOT EXISTS last_name TEXT;
            ALTER TABLE profiles ADD COLUMN IF NOT EXISTS profile_picture TEXT;
            ALTER TABLE profiles ADD COLUMN IF NOT EXISTS phone_number TEXT;
            ALTER TABLE profiles ADD COLUMN IF NOT EXISTS user_id INTEGER;
            CREATE INDEX IF NOT EXISTS idx_profiles_deleted_at ON profiles(deleted_at);
            CREATE INDEX IF NOT EXISTS idx_profiles_user_id ON profiles(user_id);
            "#,
        ),
    ]
}

/// Runs all pending account migrations
pub async fn run_account_migrations(pool: &PgPool) -> Result<(), DomainError> {
    let migrator = PostgresMigrator::new(pool.clone());

    for migration in account_migrations() {
        if migrator.run_migration(&migration).await? {
            info!(
                version = migration.version,
                description = %migration.description,
                "Applied migration"
            );
        }
    }

    let version = migrator.current_version().await?;
    info!(version = ?version, "Database schema up to date");

    Ok(())
}
