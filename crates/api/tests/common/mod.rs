#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use reqflow_api::auth::jwt::{generate_access_token, JwtConfig};
use reqflow_api::auth::password::hash_password;
use reqflow_api::config::ServerConfig;
use reqflow_api::router::build_app_router;
use reqflow_api::state::AppState;
use reqflow_api::ws::WsManager;
use reqflow_core::roles::Role;
use reqflow_db::models::user::{CreateUser, User};
use reqflow_db::repositories::UserRepo;
use reqflow_events::{EmailError, EmailMessage, EmailSender};

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 60,
        },
        app_base_url: "http://localhost:5173".to_string(),
        ws_allow_user_id_handshake: true,
        bootstrap_admin: None,
    }
}

/// Mailer that records every message instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<(String, EmailMessage)>>,
}

impl RecordingMailer {
    pub fn subjects_for(&self, to: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(recipient, _)| recipient == to)
            .map(|(_, m)| m.subject.clone())
            .collect()
    }
}

#[async_trait]
impl EmailSender for RecordingMailer {
    async fn send(&self, to: &str, message: EmailMessage) -> Result<(), EmailError> {
        self.sent.lock().unwrap().push((to.to_string(), message));
        Ok(())
    }

    fn app_base_url(&self) -> &str {
        "http://localhost:5173"
    }
}

/// Mailer whose every send fails.
pub struct FailingMailer;

#[async_trait]
impl EmailSender for FailingMailer {
    async fn send(&self, _to: &str, _message: EmailMessage) -> Result<(), EmailError> {
        Err(EmailError::Build("smtp unreachable".into()))
    }

    fn app_base_url(&self) -> &str {
        "http://localhost:5173"
    }
}

/// Application state over `pool` with a fresh socket registry.
pub fn test_state(pool: PgPool, mailer: Arc<dyn EmailSender>) -> AppState {
    AppState::new(
        pool,
        Arc::new(test_config()),
        Arc::new(WsManager::new()),
        mailer,
    )
}

/// Build the full application router with all middleware layers, using the
/// given database pool and a recording mailer.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_mailer(pool, Arc::new(RecordingMailer::default()))
}

pub fn build_test_app_with_mailer(pool: PgPool, mailer: Arc<dyn EmailSender>) -> Router {
    let config = test_config();
    build_app_router(test_state(pool, mailer), &config)
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

/// Insert an active user with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, name: &str, role: Role) -> User {
    let input = CreateUser {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role,
        department: Some("Operations".to_string()),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Mint an access token for `user` with the test JWT secret.
pub fn token_for(user: &User) -> String {
    let role = user.role().expect("stored role should parse");
    generate_access_token(user.id, role, &test_config().jwt).expect("token generation")
}

/// An employee, a procurement reviewer, and an admin.
pub struct Cast {
    pub employee: User,
    pub other_employee: User,
    pub procurement: User,
    pub admin: User,
}

pub async fn seed_cast(pool: &PgPool) -> Cast {
    Cast {
        employee: create_user(pool, "Erin", Role::Employee).await,
        other_employee: create_user(pool, "Oscar", Role::Employee).await,
        procurement: create_user(pool, "Priya", Role::Procurement).await,
        admin: create_user(pool, "Ada", Role::Admin).await,
    }
}

/// Body for a pending "Laptop" request with one item totalling 1000.
pub fn laptop_request() -> serde_json::Value {
    serde_json::json!({
        "title": "Laptop",
        "department": "Engineering",
        "priority": "high",
        "fromLocation": "Warehouse",
        "toLocation": "HQ",
        "purpose": "New hire",
        "items": [
            { "name": "Dell XPS", "category": "IT", "quantity": 2, "unit": "pcs", "estimatedCost": 500.0 }
        ]
    })
}

/// Create a request through the API and return its id.
pub async fn create_request(app: Router, token: &str, body: serde_json::Value) -> i64 {
    let response = post_json_auth(app, "/api/v1/requests", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_i64()
        .expect("created request must have an id")
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");
    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn patch_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::PATCH, uri, Some(token), None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}
