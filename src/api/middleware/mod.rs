//! API middleware components

pub mod auth;
pub mod logging;

pub use auth::{extract_bearer_token, require_bearer_token, INVALID_TOKEN};
pub use logging::logging_middleware;
