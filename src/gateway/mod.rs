//! HTTP gateway (Axum) for label scans and single-ingredient lookups.
//!
//! This module is primarily used by the `labelscore` server binary.

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::{ErrorResponse, GatewayError};
pub use handler::{ResolveRequest, ResolveResponse, resolve_handler, scan_handler};
pub use state::HandlerState;

/// Response header carrying a short machine-readable outcome.
pub const LABELSCORE_STATUS_HEADER: &str = "x-labelscore-status";
pub const STATUS_HEALTHY: &str = "healthy";
pub const STATUS_READY: &str = "ready";
pub const STATUS_NOT_READY: &str = "not_ready";
pub const STATUS_DISABLED: &str = "disabled";
pub const STATUS_ERROR: &str = "error";

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/v1/scan", post(scan_handler))
        .route("/v1/resolve", post(resolve_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn status_headers(status: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(LABELSCORE_STATUS_HEADER, HeaderValue::from_static(status));
    headers
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub storage: &'static str,
    pub external_db: &'static str,
    pub cached_entries: usize,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (
        StatusCode::OK,
        status_headers(STATUS_HEALTHY),
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let storage = match &state.storage_path {
        Some(path) if path.is_dir() => STATUS_READY,
        Some(_) => STATUS_ERROR,
        None => STATUS_DISABLED,
    };
    let external_db = if state.external_enabled {
        STATUS_READY
    } else {
        STATUS_DISABLED
    };

    let components = ComponentStatus {
        http: STATUS_READY,
        storage,
        external_db,
        cached_entries: state.pipeline.resolver().cache().len(),
    };

    let is_ready = components.storage != STATUS_ERROR;
    let (status_code, status) = if is_ready {
        (StatusCode::OK, STATUS_READY)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, STATUS_NOT_READY)
    };

    (
        status_code,
        status_headers(status),
        Json(ReadyResponse {
            status: if is_ready { "ok" } else { "pending" },
            components,
        }),
    )
        .into_response()
}
