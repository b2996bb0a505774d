//! User and profile entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Phone number stored on every profile created at signup
pub const PLACEHOLDER_PHONE_NUMBER: &str = "07123456789";

/// Numeric primary key shared by users and profiles
pub type RecordId = i64;

/// Registered user account
///
/// The `Default` value is the zero-valued record served when a lookup misses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Database identifier, 0 for the zero-valued record
    id: RecordId,
    /// Unique login name
    username: String,
    /// Stored password, plaintext unless argon2 storage is enabled
    password: String,
    /// Unique email address
    email: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Rebuild a persisted user from its stored columns
    pub fn restore(
        id: RecordId,
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            password: password.into(),
            email: email.into(),
            created_at,
            updated_at,
        }
    }

    /// Assign an identifier to a user that has not been stored yet
    pub fn from_new(id: RecordId, new_user: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id,
            username: new_user.username,
            password: new_user.password,
            email: new_user.email,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// User data accepted at signup, before an identifier is assigned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: email.into(),
        }
    }
}

/// Profile attached one-to-one to a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    id: RecordId,
    first_name: String,
    last_name: String,
    profile_picture: String,
    phone_number: String,
    /// Owning user
    user_id: RecordId,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Rebuild a persisted profile from its stored columns
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: RecordId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        profile_picture: impl Into<String>,
        phone_number: impl Into<String>,
        user_id: RecordId,
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            profile_picture: profile_picture.into(),
            phone_number: phone_number.into(),
            user_id,
            created_at,
            updated_at,
        }
    }

    /// Assign an identifier to a profile that has not been stored yet
    pub fn from_new(id: RecordId, new_profile: NewProfile, now: DateTime<Utc>) -> Self {
        Self {
            id,
            first_name: new_profile.first_name,
            last_name: new_profile.last_name,
            profile_picture: new_profile.profile_picture,
            phone_number: new_profile.phone_number,
            user_id: new_profile.user_id,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn user_id(&self) -> RecordId {
        self.user_id
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Profile data to insert
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProfile {
    pub first_name: String,
    pub last_name: String,
    pub profile_picture: String,
    pub phone_number: String,
    pub user_id: RecordId,
}

impl NewProfile {
    /// Profile created alongside a freshly registered user: blank names and
    /// picture, placeholder phone number
    pub fn placeholder_for(user_id: RecordId) -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            profile_picture: String::new(),
            phone_number: PLACEHOLDER_PHONE_NUMBER.to_string(),
            user_id,
        }
    }
}
