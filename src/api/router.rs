use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::accounts;
use super::health;
use super::middleware::logging_middleware;
use super::state::AppState;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Signup, login and the token-gated lookups
        .merge(accounts::create_account_router(state.clone()))
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::state::test_support::{in_memory_state, with_repository, TEST_SECRET};
    use crate::domain::account::MockAccountRepository;
    use crate::infrastructure::auth::{JwtConfig, JwtService, TokenCodec};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use chrono::{DateTime, Duration};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_with_token(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn sign_up_alice(app: &Router) -> Value {
        let (status, body) = send(
            app,
            post_json(
                "/signup",
                json!({"username": "alice", "password": "pw1", "email": "a@x.io"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    async fn login_alice(app: &Router) -> Value {
        let (status, body) = send(
            app,
            post_json("/login", json!({"username": "alice", "password": "pw1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    fn test_tokens() -> JwtService {
        JwtService::new(JwtConfig::with_secret(TEST_SECRET))
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = create_router(in_memory_state());

        let (status, body) = send(&app, get_with_token("/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, body) = send(&app, get_with_token("/ready", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"][0]["name"], "account_store");

        let (status, _) = send(&app, get_with_token("/live", None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_signup_returns_stored_user() {
        let app = create_router(in_memory_state());

        let body = sign_up_alice(&app).await;
        assert_eq!(body["id"], 1);
        assert_eq!(body["username"], "alice");
        assert_eq!(body["password"], "pw1");
        assert_eq!(body["email"], "a@x.io");
        assert!(body["created_at"].is_string());
    }

    #[tokio::test]
    async fn test_signup_creates_placeholder_profile() {
        let app = create_router(in_memory_state());
        sign_up_alice(&app).await;
        let token = login_alice(&app).await["access_token"]
            .as_str()
            .unwrap()
            .to_string();

        let (status, body) = send(&app, get_with_token("/profile/1", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user_id"], 1);
        assert_eq!(body["phone_number"], "07123456789");
        assert_eq!(body["first_name"], "");
        assert_eq!(body["last_name"], "");
        assert_eq!(body["profile_picture"], "");
    }

    #[tokio::test]
    async fn test_duplicate_signup_reports_error_with_ok_status() {
        let app = create_router(in_memory_state());
        sign_up_alice(&app).await;

        let (status, body) = send(
            &app,
            post_json(
                "/signup",
                json!({"username": "alice", "password": "other", "email": "b@x.io"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"]["type"], "conflict_error");
    }

    #[tokio::test]
    async fn test_signup_with_malformed_body_uses_empty_fields() {
        let app = create_router(in_memory_state());

        let request = Request::builder()
            .method("POST")
            .uri("/signup")
            .body(Body::from("not json"))
            .unwrap();
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "");
        assert_eq!(body["id"], 1);
    }

    #[tokio::test]
    async fn test_signup_and_login_with_capitalised_keys() {
        let app = create_router(in_memory_state());

        let (status, body) = send(
            &app,
            post_json(
                "/signup",
                json!({"UserName": "carol", "Password": "pw3", "Email": "c@x.io"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "carol");

        let (status, body) = send(
            &app,
            post_json("/login", json!({"UserName": "carol", "Password": "pw3"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["access_token"].is_string());
    }

    #[tokio::test]
    async fn test_signup_profile_failure_reports_error() {
        let repository = Arc::new(MockAccountRepository::new());
        repository.set_fail_profiles(true).await;
        let app = create_router(with_repository(repository));

        let (status, body) = send(
            &app,
            post_json(
                "/signup",
                json!({"username": "bob", "password": "pw", "email": "b@x.io"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["error"]["message"].is_string());
    }

    #[tokio::test]
    async fn test_login_issues_token_pair() {
        let app = create_router(in_memory_state());
        sign_up_alice(&app).await;

        let body = login_alice(&app).await;
        let access = DateTime::parse_from_rfc3339(body["access_token_expires"].as_str().unwrap())
            .unwrap();
        let refresh =
            DateTime::parse_from_rfc3339(body["refresh_token_expires"].as_str().unwrap())
                .unwrap();
        assert!(access < refresh);

        let claims = test_tokens()
            .verify(body["access_token"].as_str().unwrap())
            .unwrap();
        assert_eq!(claims.principal(), "alice");
        assert_eq!(claims.exp, access.timestamp());
    }

    #[tokio::test]
    async fn test_login_with_unrepresentable_lifetime_is_server_error() {
        let state = in_memory_state();
        let state = AppState::new(
            state.account_service,
            Arc::new(JwtService::new(JwtConfig::new(
                TEST_SECRET,
                Duration::minutes(30),
                Duration::days(i64::from(u32::MAX)),
            ))),
        );
        let app = create_router(state);
        sign_up_alice(&app).await;

        let (status, body) = send(
            &app,
            post_json("/login", json!({"username": "alice", "password": "pw1"})),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["type"], "server_error");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let app = create_router(in_memory_state());
        sign_up_alice(&app).await;

        let (status, body) = send(
            &app,
            post_json("/login", json!({"username": "alice", "password": "nope"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!("Invalid Username or Password"));
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let app = create_router(in_memory_state());

        let (status, body) = send(
            &app,
            post_json("/login", json!({"username": "ghost", "password": ""})),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!("Invalid Username or Password"));
    }

    #[tokio::test]
    async fn test_protected_route_without_header() {
        let app = create_router(in_memory_state());

        let (status, body) = send(&app, get_with_token("/user/1", None)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!("Invalid Token"));
    }

    #[tokio::test]
    async fn test_protected_route_with_garbage_token() {
        let app = create_router(in_memory_state());

        let (status, body) = send(&app, get_with_token("/user/1", Some("garbage"))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "malformed_token");
    }

    #[tokio::test]
    async fn test_protected_route_with_expired_token() {
        let app = create_router(in_memory_state());
        let expired = test_tokens().issue("alice", Duration::seconds(-5)).unwrap();

        let (status, body) =
            send(&app, get_with_token("/user/1", Some(&expired.token))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!("Invalid Token"));
    }

    #[tokio::test]
    async fn test_protected_route_with_foreign_signature() {
        let app = create_router(in_memory_state());
        let foreign = JwtService::new(JwtConfig::with_secret("some-other-secret"))
            .issue("alice", Duration::minutes(5))
            .unwrap();

        let (status, _) = send(&app, get_with_token("/user/1", Some(&foreign.token))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_get_user_with_valid_token() {
        let app = create_router(in_memory_state());
        sign_up_alice(&app).await;
        let token = login_alice(&app).await["access_token"]
            .as_str()
            .unwrap()
            .to_string();

        let (status, body) = send(&app, get_with_token("/user/1", Some(&token))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "alice");
        assert_eq!(body["password"], "pw1");
    }

    #[tokio::test]
    async fn test_missing_records_return_zero_value() {
        let app = create_router(in_memory_state());
        let token = test_tokens().issue("alice", Duration::minutes(5)).unwrap();

        let (status, body) =
            send(&app, get_with_token("/user/999999", Some(&token.token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 0);
        assert_eq!(body["username"], "");

        let (status, body) =
            send(&app, get_with_token("/profile/abc", Some(&token.token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 0);
        assert_eq!(body["user_id"], 0);
    }

    #[tokio::test]
    async fn test_refresh_token_is_accepted_by_gate() {
        let app = create_router(in_memory_state());
        sign_up_alice(&app).await;
        let refresh = login_alice(&app).await["refresh_token"]
            .as_str()
            .unwrap()
            .to_string();

        let (status, body) = send(&app, get_with_token("/user/1", Some(&refresh))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 1);
    }

    #[tokio::test]
    async fn test_lookup_storage_failure_is_server_error() {
        let repository = Arc::new(MockAccountRepository::new());
        repository.set_fail_users(true).await;
        let app = create_router(with_repository(repository));
        let token = test_tokens().issue("alice", Duration::minutes(5)).unwrap();

        let (status, body) = send(&app, get_with_token("/user/1", Some(&token.token))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["type"], "server_error");
    }
}
