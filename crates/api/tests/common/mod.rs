#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;
use vidcat_api::auth::jwt::{generate_token, JwtConfig};
use vidcat_api::config::{LogFormat, ServerConfig, StoreBackend};
use vidcat_api::router::build_app_router;
use vidcat_api::state::AppState;
use vidcat_core::access::OwnerlessPolicy;
use vidcat_core::store::memory::InMemoryStore;
use vidcat_core::types::UserId;

/// Build a test `ServerConfig` over the in-memory store.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        store_backend: StoreBackend::Memory,
        database_url: None,
        database_max_connections: 1,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            expiry_mins: 60,
        },
        ownerless_policy: OwnerlessPolicy::Open,
        page_limit_max: None,
        diagnostics: false,
        log_format: LogFormat::Pretty,
    }
}

/// The router under test plus direct handles on what sits behind it.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub config: ServerConfig,
}

impl TestApp {
    /// A clone of the router, ready for a single `oneshot` call.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Mint a bearer token for `user_id` the same way login does.
    pub fn token_for(&self, user_id: UserId) -> String {
        generate_token(user_id, &self.config.jwt).expect("token generation should succeed")
    }

    /// A fresh principal and a token for it.
    pub fn principal(&self) -> (UserId, String) {
        let user_id = Uuid::now_v7();
        (user_id, self.token_for(user_id))
    }
}

/// Build the full application router with all middleware layers, using a
/// fresh in-memory store.
pub fn build_test_app() -> TestApp {
    build_test_app_with(test_config())
}

pub fn build_test_app_with(config: ServerConfig) -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let state = AppState::new(
        store.clone(),
        store.clone(),
        Arc::new(config.clone()),
        None,
    );
    let router = build_app_router(state, &config);
    TestApp {
        router,
        store,
        config,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("router is infallible")
}

fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request");
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, Some(token), body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .expect("valid request");
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// Collect a response body as UTF-8 text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}

/// A create body that passes validation.
pub fn video_body(title: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "videoUrl": "http://x.test/v",
        "actress": ["Ann"],
        "genre": ["Drama"],
        "rating": 4,
        "site": "s1"
    })
}
