use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

/// Liveness probe
/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "backend": state.photos.storage_type(),
    }))
}
