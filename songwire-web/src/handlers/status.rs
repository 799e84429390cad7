//! Liveness and status handlers

use axum::extract::State;
use axum::response::Json;
use serde_json::{Value, json};

use crate::server::AppState;

/// Engine label reported by the status endpoint.
pub const ENGINE: &str = "Hybrid (YTM + Piped)";

/// `GET /health` - liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /` - service identity, registry size, and uptime.
pub async fn status(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "alive",
        "engine": ENGINE,
        "mirrors": state.mirror_pool.registry().len(),
        "uptime_secs": state.started_at.elapsed().as_secs(),
        "started_at": state.started_at_utc.to_rfc3339(),
    }))
}
