//! In-memory account repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::account::{AccountRepository, NewProfile, NewUser, Profile, RecordId, User};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<RecordId, User>,
    profiles: HashMap<RecordId, Profile>,
    /// Index for username -> user ID lookup
    username_index: HashMap<String, RecordId>,
    /// Index for email uniqueness
    email_index: HashMap<String, RecordId>,
    last_user_id: RecordId,
    last_profile_id: RecordId,
}

/// In-memory implementation of AccountRepository
///
/// Identifiers are assigned sequentially from 1, like a serial column.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryAccountRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create_user(&self, user: NewUser) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;

        if tables.username_index.contains_key(&user.username) {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                user.username
            )));
        }

        if tables.email_index.contains_key(&user.email) {
            return Err(DomainError::conflict(format!(
                "Email '{}' already exists",
                user.email
            )));
        }

        tables.last_user_id += 1;
        let id = tables.last_user_id;

        tables.username_index.insert(user.username.clone(), id);
        tables.email_index.insert(user.email.clone(), id);

        let user = User::from_new(id, user, Utc::now());
        tables.users.insert(id, user.clone());

        Ok(user)
    }

    async fn create_profile(&self, profile: NewProfile) -> Result<Profile, DomainError> {
        let mut tables = self.tables.write().await;

        tables.last_profile_id += 1;
        let id = tables.last_profile_id;

        let profile = Profile::from_new(id, profile, Utc::now());
        tables.profiles.insert(id, profile.clone());

        Ok(profile)
    }

    async fn find_user(&self, id: RecordId) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn find_profile(&self, id: RecordId) -> Result<Option<Profile>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;

        Ok(tables
            .username_index
            .get(username)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> NewUser {
        NewUser::new("alice", "secret", "alice@example.com")
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let repo = InMemoryAccountRepository::new();

        let created = repo.create_user(alice()).await.unwrap();
        assert_eq!(created.id(), 1);

        let found = repo.find_user(created.id()).await.unwrap().unwrap();
        assert_eq!(found, created);

        let by_name = repo.find_user_by_username("alice").await.unwrap().unwrap();
        assert_eq!(by_name.id(), created.id());
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let repo = InMemoryAccountRepository::new();

        let first = repo.create_user(alice()).await.unwrap();
        let second = repo
            .create_user(NewUser::new("bob", "pw", "bob@example.com"))
            .await
            .unwrap();

        assert_eq!(first.id(), 1);
        assert_eq!(second.id(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let repo = InMemoryAccountRepository::new();
        repo.create_user(alice()).await.unwrap();

        let result = repo
            .create_user(NewUser::new("alice", "other", "other@example.com"))
            .await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let repo = InMemoryAccountRepository::new();
        repo.create_user(alice()).await.unwrap();

        let result = repo
            .create_user(NewUser::new("alice2", "other", "alice@example.com"))
            .await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
        assert!(repo.find_user_by_username("alice2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_records() {
        let repo = InMemoryAccountRepository::new();

        assert!(repo.find_user(999_999).await.unwrap().is_none());
        assert!(repo.find_profile(999_999).await.unwrap().is_none());
        assert!(repo.find_user_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_profile() {
        let repo = InMemoryAccountRepository::new();
        let user = repo.create_user(alice()).await.unwrap();

        let profile = repo
            .create_profile(NewProfile::placeholder_for(user.id()))
            .await
            .unwrap();

        let found = repo.find_profile(profile.id()).await.unwrap().unwrap();
        assert_eq!(found.user_id(), user.id());
        assert_eq!(found.phone_number(), "07123456789");
    }
}
