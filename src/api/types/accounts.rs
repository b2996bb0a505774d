//! Signup and login payloads

use serde::{Deserialize, Serialize};

use crate::domain::NewUser;
use crate::infrastructure::auth::IssuedToken;

/// POST /signup body
///
/// Besides the snake_case keys, the capitalised keys older clients send
/// (`UserName`, `Password`, `Email`) are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignUpRequest {
    #[serde(alias = "UserName", alias = "Username", alias = "userName", alias = "user_name")]
    pub username: String,
    #[serde(alias = "Password")]
    pub password: String,
    #[serde(alias = "Email")]
    pub email: String,
}

impl From<SignUpRequest> for NewUser {
    fn from(request: SignUpRequest) -> Self {
        NewUser::new(request.username, request.password, request.email)
    }
}

/// POST /login body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    #[serde(alias = "UserName", alias = "Username", alias = "userName", alias = "user_name")]
    pub username: String,
    #[serde(alias = "Password")]
    pub password: String,
}

/// Successful login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// RFC 3339
    pub access_token_expires: String,
    /// RFC 3339
    pub refresh_token_expires: String,
}

impl TokenPairResponse {
    pub fn new(access: IssuedToken, refresh: IssuedToken) -> Self {
        Self {
            access_token_expires: access.expires_at_rfc3339(),
            refresh_token_expires: refresh.expires_at_rfc3339(),
            access_token: access.token,
            refresh_token: refresh.token,
        }
    }
}
