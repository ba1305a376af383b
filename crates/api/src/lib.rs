use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use geopulse_agents::GuideAgent;
use geopulse_core::{canonical_country_name, validate_message};
use geopulse_observability::AppMetrics;
use geopulse_storage::{seed_catalog, Store};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind: String,
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub seed_on_start: bool,
    pub max_body_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            database_url: None,
            seed_on_start: true,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            bind: env::var("GEOPULSE_BIND").unwrap_or(defaults.bind),
            database_url: env::var("GEOPULSE_DATABASE_URL")
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            seed_on_start: env::var("GEOPULSE_SEED_ON_START")
                .ok()
                .map(|value| !matches!(value.trim().to_lowercase().as_str(), "0" | "false" | "no"))
                .unwrap_or(defaults.seed_on_start),
            max_body_bytes: env::var("GEOPULSE_MAX_BODY_BYTES")
                .ok()
                .and_then(|value| value.parse::<usize>().ok())
                .unwrap_or(defaults.max_body_bytes),
        }
    }
}

#[derive(Clone)]
pub struct ApiState {
    pub agent: Arc<GuideAgent<Store>>,
    pub metrics: Arc<AppMetrics>,
    pub store_backend: &'static str,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    store_backend: &'static str,
    metrics: geopulse_observability::MetricsSnapshot,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatRequest {
    message: String,
    #[serde(default)]
    country: Option<String>,
}

pub async fn build_app(config: &ApiConfig) -> Result<Router> {
    let metrics = AppMetrics::shared();

    let store = match config.database_url.as_deref() {
        Some(database_url) => Store::sqlite(database_url).await?,
        None => Store::memory(),
    };

    if config.seed_on_start {
        seed_catalog(&store)
            .await
            .context("failed to seed country catalog")?;
    }

    let store_backend = store.backend_name();
    let agent = Arc::new(GuideAgent::new(Arc::new(store), metrics.clone()));

    let state = ApiState {
        agent,
        metrics,
        store_backend,
    };

    Ok(build_router(state, config.max_body_bytes))
}

pub fn build_router(state: ApiState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/countries", get(countries))
        .route("/api/guide/:country", get(guide))
        .route("/api/quiz/:country", get(quiz))
        .route("/api/chat", post(chat))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        store_backend: state.store_backend,
        metrics: state.metrics.snapshot(),
    };
    (StatusCode::OK, Json(payload))
}

async fn countries(State(state): State<ApiState>) -> Response {
    match state.agent.countries().await {
        Ok(countries) => (StatusCode::OK, Json(countries)).into_response(),
        Err(error) => store_unavailable(error),
    }
}

async fn guide(State(state): State<ApiState>, Path(country): Path<String>) -> Response {
    match state.agent.guide(&country).await {
        Ok(Some(guide)) => (StatusCode::OK, Json(guide)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": "country_not_found",
                "message": format!("Country '{}' not found", canonical_country_name(&country))
            })),
        )
            .into_response(),
        Err(error) => store_unavailable(error),
    }
}

async fn quiz(State(state): State<ApiState>, Path(country): Path<String>) -> Response {
    match state.agent.quiz(&country).await {
        Ok(questions) => (StatusCode::OK, Json(questions)).into_response(),
        Err(error) => store_unavailable(error),
    }
}

async fn chat(State(state): State<ApiState>, Json(request): Json<ChatRequest>) -> Response {
    if let Err(invalid) = validate_message(&request.message) {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "invalid_request",
                "message": invalid.to_string()
            })),
        )
            .into_response();
    }

    let context = request.country.as_deref().unwrap_or_default();
    match state.agent.process_message(&request.message, context).await {
        Ok(reply) => {
            info!(active_country = ?reply.active_country, "chat reply sent");
            (StatusCode::OK, Json(reply)).into_response()
        }
        Err(error) => store_unavailable(error),
    }
}

fn store_unavailable(error: anyhow::Error) -> Response {
    error!(error = %format!("{:#}", error), "request failed on knowledge store");
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(serde_json::json!({
            "error": "store_unavailable",
            "message": error.to_string()
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_memory_store() {
        let config = ApiConfig::default();
        assert_eq!(config.bind, "0.0.0.0:8080");
        assert!(config.database_url.is_none());
        assert!(config.seed_on_start);
        assert_eq!(config.max_body_bytes, 16 * 1024);
    }

    #[test]
    fn chat_request_country_is_optional() {
        let request: ChatRequest = serde_json::from_str(r#"{"message": "Hello!"}"#).unwrap();
        assert_eq!(request.message, "Hello!");
        assert!(request.country.is_none());
    }
}
