//! Account endpoints
//!
//! Signup and login are open; user and profile lookups sit behind the bearer
//! token gate.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, error, warn};

use crate::api::middleware::require_bearer_token;
use crate::api::state::AppState;
use crate::api::types::{ApiError, LenientJson, LoginRequest, SignUpRequest, TokenPairResponse};
use crate::domain::{Profile, RecordId, User};

/// Body of the 401 returned on a failed login
pub const INVALID_CREDENTIALS: &str = "Invalid Username or Password";

/// Create the account router
pub fn create_account_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/user/{id}", get(get_user))
        .route("/profile/{id}", get(get_profile))
        .route_layer(middleware::from_fn_with_state(state, require_bearer_token));

    Router::new()
        .route("/signup", post(sign_up))
        .route("/login", post(login))
        .merge(protected)
}

/// Register a user
///
/// POST /signup
///
/// Responds with the stored user, password field included. Storage failures
/// such as a duplicate username are reported in the body with status 200.
pub async fn sign_up(
    State(state): State<AppState>,
    LenientJson(request): LenientJson<SignUpRequest>,
) -> Response {
    match state.account_service.sign_up(request.into()).await {
        Ok(user) => Json(user).into_response(),
        Err(err) => {
            warn!(error = %err, "Signup failed");
            ApiError::from(err)
                .with_status(StatusCode::OK)
                .into_response()
        }
    }
}

/// Exchange credentials for an access/refresh token pair
///
/// POST /login
pub async fn login(
    State(state): State<AppState>,
    LenientJson(request): LenientJson<LoginRequest>,
) -> Response {
    let user = match state
        .account_service
        .authenticate(&request.username, &request.password)
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            return (StatusCode::UNAUTHORIZED, Json(INVALID_CREDENTIALS)).into_response();
        }
        Err(err) => {
            error!(error = %err, "Credential lookup failed");
            return ApiError::from(err).into_response();
        }
    };

    let tokens = &state.token_service;
    let issued = tokens
        .issue(user.username(), tokens.access_token_ttl())
        .and_then(|access| {
            tokens
                .issue(user.username(), tokens.refresh_token_ttl())
                .map(|refresh| (access, refresh))
        });

    match issued {
        Ok((access, refresh)) => {
            debug!(username = %user.username(), "Issued token pair");
            Json(TokenPairResponse::new(access, refresh)).into_response()
        }
        Err(err) => {
            error!(error = %err, "Token signing failed");
            ApiError::internal(err.to_string()).into_response()
        }
    }
}

/// Fetch a user by id
///
/// GET /user/{id}
///
/// Unknown or non-numeric ids answer 200 with the zero-valued user.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let Some(id) = parse_id(&id) else {
        return Ok(Json(User::default()));
    };

    let user = state.account_service.find_user(id).await?;

    Ok(Json(user.unwrap_or_default()))
}

/// Fetch a profile by id
///
/// GET /profile/{id}
///
/// Unknown or non-numeric ids answer 200 with the zero-valued profile.
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    let Some(id) = parse_id(&id) else {
        return Ok(Json(Profile::default()));
    };

    let profile = state.account_service.find_profile(id).await?;

    Ok(Json(profile.unwrap_or_default()))
}

fn parse_id(raw: &str) -> Option<RecordId> {
    match raw.parse::<RecordId>() {
        Ok(id) => Some(id),
        Err(_) => {
            debug!(id = %raw, "Non-numeric id in path");
            None
        }
    }
}
