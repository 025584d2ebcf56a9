use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::llm_client::{ping, PingResult};
use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resumate-api"
    }))
}

/// GET /api/v1/llm/ping
/// Round-trips a tiny prompt through the configured model.
pub async fn llm_ping_handler(State(state): State<AppState>) -> Json<PingResult> {
    Json(ping(state.llm.as_ref()).await)
}
