#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use iras_api::auth::jwt::JwtConfig;
use iras_api::config::{RuntimeMode, ServerConfig};
use iras_api::router::build_app_router;
use iras_api::state::AppState;
use iras_db::Repositories;

/// Demo bearer token accepted in development.
pub const DEMO_TOKEN: &str = "demo-token-integration";

/// Build a test `ServerConfig` with safe defaults.
///
/// Development mode with a single allowed origin and a 30-second request
/// timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        mode: RuntimeMode::Development,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret".to_string(),
            expiry_hours: 24,
        },
        ibm_client_id: "demo-client-id".to_string(),
        ibm_client_secret: "demo-client-secret".to_string(),
        database_url: String::new(),
    }
}

/// Same as [`test_config`] with the mode set to production.
pub fn production_config() -> ServerConfig {
    ServerConfig {
        mode: RuntimeMode::Production,
        ..test_config()
    }
}

/// Build the full application router over in-memory stores.
///
/// Uses the same builder as `main.rs`, so tests exercise the production
/// middleware stack.
pub fn build_test_app() -> Router {
    build_app_with(test_config())
}

pub fn build_app_with(config: ServerConfig) -> Router {
    let state = AppState::new(config.clone(), Repositories::in_memory());
    build_app_router(state, &config)
}

/// Development app over caller-supplied stores.
pub fn build_app_with_repos(repos: Repositories) -> Router {
    let config = test_config();
    build_app_router(AppState::new(config.clone(), repos), &config)
}

/// Like [`build_test_app`] but also returns the stores for seeding.
pub fn build_seeded_app() -> (Router, Repositories) {
    let config = test_config();
    let repos = Repositories::in_memory();
    let state = AppState::new(config.clone(), repos.clone());
    (build_app_router(state, &config), repos)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn json_request(
    method: Method,
    uri: &str,
    headers: &[(&str, &str)],
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_with_headers(
    app: Router,
    uri: &str,
    headers: &[(&str, &str)],
) -> Response<Body> {
    let mut builder = Request::builder().uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, &[], body)).await
}

pub async fn post_json_with_headers(
    app: Router,
    uri: &str,
    headers: &[(&str, &str)],
    body: serde_json::Value,
) -> Response<Body> {
    send(app, json_request(Method::POST, uri, headers, body)).await
}

/// POST a raw, possibly malformed, body.
pub async fn post_raw(
    app: Router,
    uri: &str,
    headers: &[(&str, &str)],
    body: &str,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let bearer = format!("Bearer {token}");
    get_with_headers(app, uri, &[("authorization", &bearer)]).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let bearer = format!("Bearer {token}");
    send(
        app,
        json_request(Method::POST, uri, &[("authorization", &bearer)], body),
    )
    .await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let bearer = format!("Bearer {token}");
    send(
        app,
        json_request(Method::PUT, uri, &[("authorization", &bearer)], body),
    )
    .await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
