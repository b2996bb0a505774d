//! Request/response types shared by the handlers

pub mod accounts;
pub mod error;
pub mod json;

pub use accounts::{LoginRequest, SignUpRequest, TokenPairResponse};
pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use json::LenientJson;
