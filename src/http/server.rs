//! Router construction and request handlers.
//!
//! # Responsibilities
//! - Build the Axum router with all middleware layers
//! - Dispatch to the ingress fetch, probes, and metrics
//! - Delegate unrecognized paths to the static asset directory
//!
//! Handlers act only on immutable shared state (config values, upstream
//! client) or the atomic request counter, so no per-request locking is
//! needed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::{header, StatusCode},
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::Config;
use crate::http::middleware::{count_requests, security_headers};
use crate::kube;

/// Directory the static frontend is served from.
pub const ASSET_DIR: &str = "/app";

/// Shared service context, constructed once at startup and cloned into
/// every handler.
#[derive(Clone)]
pub struct AppState {
    /// Trust-bootstrapped upstream client; owns the outbound pool.
    pub client: reqwest::Client,

    /// Request-scoped deadline for the ingress fetch.
    pub upstream_timeout: Duration,

    /// Process start, for the uptime gauge.
    pub started_at: Instant,

    /// Total inbound requests. Monotonic; reset only by restart.
    pub requests_total: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(config: &Config, client: reqwest::Client) -> Self {
        Self {
            client,
            upstream_timeout: config.upstream_timeout,
            started_at: Instant::now(),
            requests_total: Arc::new(AtomicU64::new(0)),
        }
    }
}

/// Build the service router with all middleware layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/ingresses", get(list_ingresses))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .fallback_service(ServeDir::new(ASSET_DIR))
        .layer(from_fn_with_state(state.clone(), count_requests))
        .layer(from_fn(security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /api/ingresses`: forward the upstream document verbatim.
///
/// The fetch is bounded by the configured timeout here as well as by the
/// client's own; whichever is tighter wins. Dropping the handler future
/// (client disconnect) cancels the outbound call.
async fn list_ingresses(State(state): State<AppState>) -> Response {
    let fetch = kube::fetch_ingresses(&state.client);
    let document = match tokio::time::timeout(state.upstream_timeout, fetch).await {
        Ok(Ok(document)) => document,
        Ok(Err(error)) => {
            tracing::error!(%error, "failed to fetch ingresses");
            return (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()).into_response();
        }
        Err(_) => {
            tracing::error!(timeout = ?state.upstream_timeout, "ingress fetch deadline exceeded");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "kubernetes api request timed out".to_string(),
            )
                .into_response();
        }
    };

    ([(header::CACHE_CONTROL, "no-cache")], Json(document)).into_response()
}

/// `GET /healthz`: the process is running.
async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /readyz`: the process can serve meaningful traffic.
async fn readyz() -> Response {
    if kube::is_ready().await {
        (StatusCode::OK, Json(json!({ "status": "ready" }))).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "not ready" })),
        )
            .into_response()
    }
}

/// `GET /metrics`: Prometheus exposition, two series.
async fn metrics(State(state): State<AppState>) -> Response {
    let uptime = state.started_at.elapsed().as_secs();
    let requests = state.requests_total.load(Ordering::Relaxed);

    let body = format!(
        "# HELP home_pager_uptime_seconds Process uptime in seconds.\n\
         # TYPE home_pager_uptime_seconds gauge\n\
         home_pager_uptime_seconds {uptime}\n\
         # HELP home_pager_http_requests_total Total HTTP requests served.\n\
         # TYPE home_pager_http_requests_total counter\n\
         home_pager_http_requests_total {requests}\n"
    );

    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body).into_response()
}
