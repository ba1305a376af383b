//! Shared helpers for the HTTP integration tests.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use geopulse_api::{build_app, ApiConfig};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

/// Router over a freshly seeded in-memory catalog.
pub async fn seeded_app() -> Router {
    build_app(&ApiConfig::default())
        .await
        .expect("app should build")
}

/// Router over a seeded SQLite file whose tables are dropped afterwards
/// through a separate connection, so every catalogue read fails.
pub async fn broken_store_app() -> Router {
    let path = std::env::temp_dir().join(format!(
        "geopulse-broken-{}-{}.db",
        std::process::id(),
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock after epoch")
            .as_nanos()
    ));
    let database_url = format!("sqlite://{}", path.display());

    let app = build_app(&ApiConfig {
        database_url: Some(database_url.clone()),
        ..ApiConfig::default()
    })
    .await
    .expect("app should build");

    let pool = SqlitePool::connect(&database_url)
        .await
        .expect("second connection should open");
    for table in ["cultural_details", "quiz_questions", "countries"] {
        sqlx::query(&format!("DROP TABLE {}", table))
            .execute(&pool)
            .await
            .expect("table should drop");
    }
    pool.close().await;

    app
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request should build");
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let parsed = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, parsed)
}
