//! PostgreSQL account repository implementation
//!
//! Works against the `users`/`profiles` layout created by the schema
//! migrations: `SERIAL` ids, nullable columns and soft-deleted rows marked by
//! `deleted_at`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::domain::account::{AccountRepository, NewProfile, NewUser, Profile, RecordId, User};
use crate::domain::DomainError;

/// PostgreSQL implementation of AccountRepository
#[derive(Debug, Clone)]
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create_user(&self, user: NewUser) -> Result<User, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (created_at, updated_at, user_name, password, email)
            VALUES (NOW(), NOW(), $1, $2, $3)
            RETURNING id::BIGINT AS id, created_at, updated_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, &user))?;

        let id: RecordId = row.get("id");
        let created_at: Option<DateTime<Utc>> = row.get("created_at");
        let updated_at: Option<DateTime<Utc>> = row.get("updated_at");

        Ok(User::restore(
            id,
            user.username,
            user.password,
            user.email,
            created_at,
            updated_at,
        ))
    }

    async fn create_profile(&self, profile: NewProfile) -> Result<Profile, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO profiles
                (created_at, updated_at, first_name, last_name, profile_picture, phone_number, user_id)
            VALUES (NOW(), NOW(), $1, $2, $3, $4, $5::INTEGER)
            RETURNING id::BIGINT AS id, created_at, updated_at
            "#,
        )
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.profile_picture)
        .bind(&profile.phone_number)
        .bind(profile.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create profile: {}", e)))?;

        let id: RecordId = row.get("id");
        let created_at: Option<DateTime<Utc>> = row.get("created_at");
        let updated_at: Option<DateTime<Utc>> = row.get("updated_at");

        Ok(Profile::restore(
            id,
            profile.first_name,
            profile.last_name,
            profile.profile_picture,
            profile.phone_number,
            profile.user_id,
            created_at,
            updated_at,
        ))
    }

    async fn find_user(&self, id: RecordId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id::BIGINT AS id, user_name, password, email, created_at, updated_at
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_profile(&self, id: RecordId) -> Result<Option<Profile>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id::BIGINT AS id, first_name, last_name, profile_picture, phone_number,
                   user_id::BIGINT AS user_id, created_at, updated_at
            FROM profiles
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get profile: {}", e)))?;

        row.as_ref().map(row_to_profile).transpose()
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id::BIGINT AS id, user_name, password, email, created_at, updated_at
            FROM users
            WHERE user_name = $1 AND deleted_at IS NULL
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by username: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Database unreachable: {}", e)))?;

        Ok(())
    }
}

fn map_insert_error(e: sqlx::Error, user: &NewUser) -> DomainError {
    let unique_constraint = e
        .as_database_error()
        .filter(|db| db.is_unique_violation())
        .map(|db| db.constraint().unwrap_or_default().to_string());

    match unique_constraint {
        Some(constraint) => unique_violation(&constraint, user),
        None => DomainError::storage(format!("Failed to create user: {}", e)),
    }
}

/// Conflict for a unique index violated by `user`, told apart by index name
fn unique_violation(constraint: &str, user: &NewUser) -> DomainError {
    if constraint.contains("email") {
        DomainError::conflict(format!("Email '{}' already exists", user.email))
    } else {
        DomainError::conflict(format!("Username '{}' already exists", user.username))
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let decode = |e: sqlx::Error| DomainError::storage(format!("Invalid user row: {}", e));

    Ok(User::restore(
        row.try_get("id").map_err(decode)?,
        text_column(row, "user_name").map_err(decode)?,
        text_column(row, "password").map_err(decode)?,
        text_column(row, "email").map_err(decode)?,
        row.try_get("created_at").map_err(decode)?,
        row.try_get("updated_at").map_err(decode)?,
    ))
}

fn row_to_profile(row: &sqlx::postgres::PgRow) -> Result<Profile, DomainError> {
    let decode = |e: sqlx::Error| DomainError::storage(format!("Invalid profile row: {}", e));

    Ok(Profile::restore(
        row.try_get("id").map_err(decode)?,
        text_column(row, "first_name").map_err(decode)?,
        text_column(row, "last_name").map_err(decode)?,
        text_column(row, "profile_picture").map_err(decode)?,
        text_column(row, "phone_number").map_err(decode)?,
        row.try_get::<Option<RecordId>, _>("user_id")
            .map_err(decode)?
            .unwrap_or_default(),
        row.try_get("created_at").map_err(decode)?,
        row.try_get("updated_at").map_err(decode)?,
    ))
}

/// Nullable text column, NULL read as the empty string
fn text_column(row: &sqlx::postgres::PgRow, name: &str) -> Result<String, sqlx::Error> {
    Ok(row.try_get::<Option<String>, _>(name)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> NewUser {
        NewUser::new("alice", "pw", "alice@example.com")
    }

    #[test]
    fn test_email_index_violation() {
        let err = unique_violation("uix_users_email", &alice());

        assert!(err.is_conflict());
        assert!(err.to_string().contains("alice@example.com"));
    }

    #[test]
    fn test_username_index_violation() {
        let err = unique_violation("uix_users_user_name", &alice());

        assert!(err.is_conflict());
        assert!(err.to_string().contains("Username 'alice'"));
    }

    #[test]
    fn test_unnamed_unique_violation_reports_username() {
        let err = unique_violation("", &alice());

        assert!(err.is_conflict());
        assert!(err.to_string().contains("Username"));
    }

    #[test]
    fn test_non_database_error_is_storage() {
        let err = map_insert_error(sqlx::Error::RowNotFound, &alice());

        assert!(!err.is_conflict());
        assert!(matches!(err, DomainError::Storage { .. }));
    }
}
