//! Password storage strategies

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as Argon2PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for turning a submitted password into its stored form and checking it
pub trait PasswordHasher: Send + Sync + Debug {
    /// Produce the value persisted in the `password` column
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Verify a submitted password against the stored value
    fn verify(&self, password: &str, stored: &str) -> bool;
}

/// Stores passwords as submitted and compares them byte-for-byte.
///
/// Matches rows written by earlier deployments of this service.
#[derive(Debug, Clone, Default)]
pub struct PlaintextPasswords;

impl PlaintextPasswords {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for PlaintextPasswords {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        Ok(password.to_string())
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        password.as_bytes() == stored.as_bytes()
    }
}

/// Argon2-based password hasher
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    /// Create a new Argon2 hasher
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        let parsed_hash = match PasswordHash::new(stored) {
            Ok(h) => h,
            Err(_) => return false,
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}
