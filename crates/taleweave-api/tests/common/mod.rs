//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use sqlx::PgPool;
use taleweave_event_store::pg_event_repository::PgEventRepository;
use taleweave_notifications::NotificationHub;
use taleweave_test_support::{FixedClock, fixed_now};
use tower::ServiceExt;
use uuid::Uuid;

use taleweave_api::app;
use taleweave_api::identity::USER_ID_HEADER;
use taleweave_api::state::AppState;

/// Build the full app router with a real `PgEventRepository` and a fixed
/// clock. Uses the same route structure as `main.rs`.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_hub(pool, NotificationHub::default())
}

/// Build the full app router publishing into `hub`.
pub fn build_test_app_with_hub(pool: PgPool, hub: NotificationHub) -> Router {
    let event_repository = Arc::new(PgEventRepository::new(pool.clone()));
    let app_state = AppState::new(pool, Arc::new(FixedClock(fixed_now())), event_repository, hub);
    app(app_state)
}

async fn send(
    app: Router,
    method: &str,
    uri: &str,
    user: Option<Uuid>,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(USER_ID_HEADER, user.to_string());
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null);

    (status, json)
}

/// Send a POST request as `user` with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    user: Uuid,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, Some(user), Some(body)).await
}

/// Send a body-less POST request as `user`.
pub async fn post_empty(app: Router, uri: &str, user: Uuid) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, Some(user), None).await
}

/// Send a GET request as `user` and return the response.
pub async fn get_json(app: Router, uri: &str, user: Uuid) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, Some(user), None).await
}

/// Send an unauthenticated GET request.
pub async fn get_anonymous(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, None, None).await
}

/// Register `user_id` under `username`.
pub async fn register(pool: &PgPool, user_id: Uuid, username: &str) {
    let (status, json) = post_json(
        build_test_app(pool.clone()),
        "/api/v1/users",
        user_id,
        &serde_json::json!({
            "username": username,
            "display_name": username,
            "email": format!("{username}@example.com")
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "registration failed: {json}");
}
