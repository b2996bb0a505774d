//! Bearer token gate for protected routes

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::infrastructure::auth::TokenError;

/// Body of every 401 produced by the gate
pub const INVALID_TOKEN: &str = "Invalid Token";

const BEARER_PREFIX: &str = "Bearer ";

/// Middleware that only forwards requests carrying a valid bearer token.
///
/// Missing header, bad signature or expiry answer 401 with `"Invalid Token"`;
/// any other decode failure answers 400 with an error envelope. The verified
/// principal is not passed on to the wrapped handler.
pub async fn require_bearer_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let token = match extract_bearer_token(request.headers()) {
        Ok(Some(token)) => token.to_string(),
        Ok(None) => {
            debug!("Rejecting request without Authorization header");
            return invalid_token();
        }
        Err(err) => return err.into_response(),
    };

    match state.token_service.verify(&token) {
        Ok(claims) if !claims.is_expired() => {
            debug!(principal = %claims.principal(), "Bearer token accepted");
            next.run(request).await
        }
        Ok(claims) => {
            debug!(principal = %claims.principal(), "Bearer token at expiry");
            invalid_token()
        }
        Err(err @ (TokenError::InvalidSignature | TokenError::Expired)) => {
            debug!(error = %err, "Rejecting bearer token");
            invalid_token()
        }
        Err(err) => {
            debug!(error = %err, "Undecodable bearer token");
            ApiError::bad_request(format!("Bad Request: {}", err))
                .with_code("malformed_token")
                .into_response()
        }
    }
}

/// Extract the token from the Authorization header.
///
/// A literal `Bearer ` prefix is removed when present; the remainder is used
/// as-is, without trimming. Returns `Ok(None)` when the header is absent.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<Option<&str>, ApiError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value.to_str().map_err(|_| {
        ApiError::bad_request("Bad Request: invalid Authorization header encoding")
            .with_code("malformed_token")
    })?;

    Ok(Some(value.strip_prefix(BEARER_PREFIX).unwrap_or(value)))
}

fn invalid_token() -> Response {
    (StatusCode::UNAUTHORIZED, Json(INVALID_TOKEN)).into_response()
}
