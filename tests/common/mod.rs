// Not every suite uses every helper
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use blog_api::auth::{generate_jwt, Claims};
use blog_api::database::models::User;
use blog_api::database::MemoryStore;
use blog_api::routes::{app, AppState};

/// Router over a fresh in-memory store; the store handle is returned so
/// tests can seed and inspect it directly.
pub fn test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (app(AppState::new(store.clone())), store)
}

pub fn bearer(user: &User) -> String {
    let token = generate_jwt(Claims::for_user(user)).expect("failed to sign test token");
    format!("Bearer {}", token)
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .body(Body::empty())
        .expect("request")
}

pub fn get_auth(path: &str, auth: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header("authorization", auth)
        .body(Body::empty())
        .expect("request")
}

pub fn post_form(path: &str, auth: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/x-www-form-urlencoded");
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request")
}

/// Drive one request through the router; returns status, the Location
/// header if any, and the parsed JSON body (Null when the body is empty).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app.clone().oneshot(request).await.expect("infallible");
    let status = response.status();
    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, location, json)
}
