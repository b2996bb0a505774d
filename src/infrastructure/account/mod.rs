//! Account infrastructure module
//!
//! Postgres and in-memory account repositories, password storage strategies
//! and the account service used by the HTTP handlers.

mod password;
mod postgres_repository;
mod repository;
mod service;

pub use password::{Argon2Hasher, PasswordHasher, PlaintextPasswords};
pub use postgres_repository::PostgresAccountRepository;
pub use repository::InMemoryAccountRepository;
pub use service::AccountService;
