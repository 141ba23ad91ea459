//! Shared helpers for router tests: in-memory state and a request driver.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use fintrack_core::memory::{InMemoryBudgetStore, InMemoryTransactionStore, InMemoryUserStore};
use fintrack_shared::{JwtConfig, JwtService};

use crate::{AppState, create_router};

pub(crate) fn test_state() -> AppState {
    let jwt = JwtService::new(JwtConfig {
        secret: "router-test-secret".to_string(),
        token_ttl_hours: 24,
    })
    .unwrap();

    AppState::new(
        Arc::new(jwt),
        Arc::new(InMemoryUserStore::new()),
        Arc::new(InMemoryTransactionStore::new()),
        Arc::new(InMemoryBudgetStore::new()),
    )
}

pub(crate) fn test_app() -> Router {
    create_router(test_state())
}

/// Sends one request and returns the status and the parsed JSON body
/// (`Value::Null` for an empty body).
pub(crate) async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => request
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Registers a user and logs in, returning the session token.
pub(crate) async fn register_and_login(app: &Router, name: &str) -> String {
    let email = format!("{name}@example.com");
    let (status, _) = send(
        app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(serde_json::json!({
            "username": name,
            "email": email,
            "password": "correct horse battery staple",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(serde_json::json!({
            "email": email,
            "password": "correct horse battery staple",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}
