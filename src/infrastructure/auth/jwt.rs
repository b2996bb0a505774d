//! Bearer token issuance and verification

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Default lifetime of an access token
pub const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: i64 = 30;

/// Default lifetime of a refresh token
pub const DEFAULT_REFRESH_TOKEN_TTL_DAYS: i64 = 30;

/// JWT claims structure
///
/// Access and refresh tokens carry the same claims; nothing in the token
/// tells them apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Principal the token was issued to
    pub username: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a principal expiring `ttl` from now
    pub fn new(principal: impl Into<String>, ttl: Duration) -> Result<Self, TokenError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or(TokenError::LifetimeOutOfRange)?;

        Ok(Self {
            username: principal.into(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        })
    }

    /// Check if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    pub fn principal(&self) -> &str {
        &self.username
    }
}

/// A signed token together with its expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    /// Expiration timestamp (Unix epoch)
    pub expires_at: i64,
}

impl IssuedToken {
    /// Expiry formatted as RFC 3339 in UTC
    pub fn expires_at_rfc3339(&self) -> String {
        DateTime::<Utc>::from_timestamp(self.expires_at, 0)
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_default()
    }
}

/// Token verification and signing failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("failed to sign token: {0}")]
    Signing(String),

    #[error("token lifetime is out of range")]
    LifetimeOutOfRange,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Malformed(err.to_string()),
        }
    }
}

/// Configuration for JWT service
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Symmetric signing secret, fixed for the life of the process
    pub secret: String,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
}

impl JwtConfig {
    /// Create new JWT configuration
    pub fn new(
        secret: impl Into<String>,
        access_token_ttl: Duration,
        refresh_token_ttl: Duration,
    ) -> Self {
        Self {
            secret: secret.into(),
            access_token_ttl,
            refresh_token_ttl,
        }
    }

    /// Configuration with the default 30 minute / 30 day lifetimes
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self::new(
            secret,
            Duration::minutes(DEFAULT_ACCESS_TOKEN_TTL_MINUTES),
            Duration::days(DEFAULT_REFRESH_TOKEN_TTL_DAYS),
        )
    }
}

/// Trait for token operations
pub trait TokenCodec: Send + Sync + Debug {
    /// Sign a token for `principal` valid for `ttl`
    fn issue(&self, principal: &str, ttl: Duration) -> Result<IssuedToken, TokenError>;

    /// Check signature and expiry, returning the embedded claims
    fn verify(&self, token: &str) -> Result<Claims, TokenError>;

    fn access_token_ttl(&self) -> Duration;

    fn refresh_token_ttl(&self) -> Duration;
}

/// HS256 token service keyed by a single secret
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("secret", &"[hidden]")
            .field("access_token_ttl", &self.config.access_token_ttl)
            .field("refresh_token_ttl", &self.config.refresh_token_ttl)
            .finish()
    }
}

impl JwtService {
    /// Create a new JWT service with the given configuration
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }
}

impl TokenCodec for JwtService {
    fn issue(&self, principal: &str, ttl: Duration) -> Result<IssuedToken, TokenError> {
        let claims = Claims::new(principal, ttl)?;

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_at: claims.exp,
        })
    }

    fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;

        Ok(token_data.claims)
    }

    fn access_token_ttl(&self) -> Duration {
        self.config.access_token_ttl
    }

    fn refresh_token_ttl(&self) -> Duration {
        self.config.refresh_token_ttl
    }
}
