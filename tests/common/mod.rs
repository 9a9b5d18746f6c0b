#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use userhub::router::init_router;
use userhub::state::AppState;
use userhub_config::{
    AppConfig, CorsConfig, DatabaseConfig, Environment, JwtConfig, LoggingConfig, PasswordConfig,
    ServerConfig,
};
use userhub_db::InMemoryUserRepository;

pub const TEST_JWT_SECRET: &str = "test-secret-key-at-least-32-characters-long";

pub fn test_config() -> AppConfig {
    AppConfig {
        environment: Environment::Test,
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry: 3600,
        },
        // cheap parameters keep the suite fast
        password: PasswordConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        },
        cors: CorsConfig::default(),
        logging: LoggingConfig {
            log_dir: "storage/logs".to_string(),
            observability_enabled: false,
        },
    }
}

pub fn setup_test_app() -> Router {
    let state = AppState::new(&test_config(), Arc::new(InMemoryUserRepository::new())).unwrap();
    init_router(state)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse { status, body }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn user_payload(name: &str, username: &str, email: &str, password: &str) -> Value {
    json!({
        "name": name,
        "username": username,
        "email": email,
        "password": password
    })
}

/// Registers a user and returns the response `data`.
pub async fn register(app: &Router, username: &str, email: &str, password: &str) -> Value {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/register",
            None,
            &user_payload("Test User", username, email, password),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body["data"].clone()
}

/// Logs in and returns the token.
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/login",
            None,
            &json!({ "username": username, "password": password }),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    response.body["data"]["token"].as_str().unwrap().to_string()
}

/// Registers `admin1` and returns a token for it.
pub async fn admin_token(app: &Router) -> String {
    register(app, "admin1", "admin@x.io", "adminpass").await;
    login(app, "admin1", "adminpass").await
}
