//! Authentication infrastructure module
//!
//! This module provides bearer token issuance and verification.

mod jwt;

pub use jwt::{
    Claims, IssuedToken, JwtConfig, JwtService, TokenCodec, TokenError,
    DEFAULT_ACCESS_TOKEN_TTL_MINUTES, DEFAULT_REFRESH_TOKEN_TTL_DAYS,
};
