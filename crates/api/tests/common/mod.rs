//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the application router exactly as `main.rs` does (same middleware
//! stack), with a stub chat backend so assistant tests never call a real
//! LLM.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use electo_api::assistant::{ChatError, ChatModel, ChatRequest};
use electo_api::auth::jwt::JwtConfig;
use electo_api::auth::password::hash_password;
use electo_api::config::{AssistantConfig, ServerConfig};
use electo_api::router::build_app_router;
use electo_api::state::AppState;
use electo_api::ws::WsManager;
use electo_core::types::DbId;
use electo_db::models::{CreateProfile, CreateUser};
use electo_db::repositories::{ProfileRepo, UserRepo};

/// Canned answer returned by the stub chat backend.
pub const STUB_ANSWER: &str = "Respuesta de prueba basada en los datos.";

/// Stub chat backend: echoes a canned answer, never leaves the process.
pub struct StubChat;

#[async_trait]
impl ChatModel for StubChat {
    async fn complete(&self, _request: ChatRequest) -> Result<String, ChatError> {
        Ok(STUB_ANSWER.to_string())
    }
}

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        assistant: AssistantConfig {
            api_key: None,
            base_url: "http://localhost:0".to_string(),
            model: "stub".to_string(),
        },
    }
}

/// Build the full application router with the stub chat backend.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_chat(pool, Some(Arc::new(StubChat)))
}

/// Build the app with an explicit chat backend (or none, to exercise the
/// unconfigured-assistant path).
pub fn build_test_app_with_chat(pool: PgPool, chat_model: Option<Arc<dyn ChatModel>>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ws_manager: Arc::new(WsManager::new()),
        event_bus: Arc::new(electo_events::EventBus::default()),
        chat_model,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Seeding helpers
// ---------------------------------------------------------------------------

/// Password used for every seeded account.
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Insert an organization and return its id.
pub async fn seed_org(pool: &PgPool, name: &str) -> DbId {
    let (id,): (DbId,) = sqlx::query_as("INSERT INTO organizations (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("organization insert should succeed");
    id
}

/// Insert a user + profile with the given role and return the profile id.
pub async fn seed_account(
    pool: &PgPool,
    organization_id: DbId,
    email: &str,
    role: &str,
    dni: &str,
    operating_barrio: Option<&str>,
) -> DbId {
    let hashed = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    let mut conn = pool.acquire().await.expect("pool acquire should succeed");

    let user = UserRepo::create(
        &mut conn,
        &CreateUser {
            email: email.to_string(),
            password_hash: hashed,
        },
    )
    .await
    .expect("user insert should succeed");

    let profile = ProfileRepo::create(
        &mut conn,
        &CreateProfile {
            id: user.id,
            organization_id,
            full_name: format!("Test {email}"),
            role: role.to_string(),
            dni: dni.to_string(),
            address: "Calle Falsa 123".to_string(),
            operating_barrio: operating_barrio.map(str::to_string),
        },
    )
    .await
    .expect("profile insert should succeed");

    profile.id
}

/// Log in via the API and return the access token.
pub async fn login_token(app: Router, email: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK, "login should succeed");
    let json = body_json(response).await;
    json["access_token"]
        .as_str()
        .expect("access_token must be a string")
        .to_string()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request without authentication.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    app.oneshot(request).await.expect("request should complete")
}

/// Send a GET request with a Bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request should build");
    app.oneshot(request).await.expect("request should complete")
}

/// Send a JSON request without authentication.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, "POST", uri, body, None).await
}

/// Send a JSON request with a Bearer token.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    json_request(app, "POST", uri, body, Some(token)).await
}

/// Send a PUT request with a Bearer token.
pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    json_request(app, "PUT", uri, body, Some(token)).await
}

/// Send a PATCH request with a Bearer token.
pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    json_request(app, "PATCH", uri, body, Some(token)).await
}

/// Send a DELETE request with a Bearer token.
pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request should build");
    app.oneshot(request).await.expect("request should complete")
}

async fn json_request(
    app: Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder
        .body(Body::from(body.to_string()))
        .expect("request should build");
    app.oneshot(request).await.expect("request should complete")
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

/// Collect a response body as raw bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes()
        .to_vec()
}
