#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use railway_api::state::{AppState, AuthConfig, Repositories};
use railway_api::app;
use railway_store::app_config::BusinessRules;
use railway_store::seed;
use serde_json::{json, Value};
use tower::ServiceExt;

pub fn fast_rules(step_ms: u64) -> BusinessRules {
    BusinessRules {
        payment_processing_ms: step_ms,
        confirmation_display_ms: step_ms,
        success_reset_ms: step_ms,
        ..BusinessRules::default()
    }
}

pub async fn test_state(rules: &BusinessRules) -> AppState {
    test_state_with_auth(rules, true).await
}

pub async fn test_state_with_auth(rules: &BusinessRules, allow_admin_signup: bool) -> AppState {
    let repos = Repositories::in_memory();
    seed::seed_trains(repos.trains.as_ref()).await.unwrap();
    let state = AppState::new(
        repos,
        AuthConfig {
            secret: "test-secret".to_string(),
            expiration: 3600,
            allow_admin_signup,
        },
        rules,
    );
    state.spawn_session_sweeper();
    state
}

pub async fn test_app() -> Router {
    app(test_state(&fast_rules(20)).await)
}

pub async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Signs up and signs in, returning the access token.
pub async fn register(app: &Router, username: &str, roles: &[&str]) -> String {
    let (status, _) = call(
        app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({
            "username": username,
            "email": format!("{}@example.lk", username),
            "password": "secret1",
            "role": roles,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(
        app,
        Method::POST,
        "/api/auth/signin",
        None,
        Some(json!({ "username": username, "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["accessToken"].as_str().unwrap().to_string()
}

pub async fn train_id(app: &Router, name: &str) -> String {
    let (_, trains) = call(app, Method::GET, "/api/trains", None, None).await;
    trains
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["name"] == name)
        .map(|t| t["id"].as_str().unwrap().to_string())
        .unwrap()
}
