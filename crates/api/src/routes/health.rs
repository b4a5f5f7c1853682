use axum::extract::State;
use axum::{routing::get, Json, Router};
use flowbridge_core::types::Timestamp;
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `"ok"` with an executor connected, `"waiting_for_executor"` otherwise.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    pub executor_connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executor: Option<ExecutorStatus>,
    pub relay_timeout_secs: u64,
}

#[derive(Serialize)]
pub struct ExecutorStatus {
    pub conn_id: String,
    pub connected_at: Timestamp,
    pub last_heartbeat: Option<Timestamp>,
}

/// GET /health -- returns service and executor connection state.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let executor = match state.registry.current() {
        Some(peer) => Some(ExecutorStatus {
            conn_id: peer.id().to_string(),
            connected_at: peer.connected_at(),
            last_heartbeat: peer.last_heartbeat().await,
        }),
        None => None,
    };

    let executor_connected = executor.is_some();
    let status = if executor_connected {
        "ok"
    } else {
        "waiting_for_executor"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        executor_connected,
        executor,
        relay_timeout_secs: state.config.relay_timeout.as_secs(),
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
