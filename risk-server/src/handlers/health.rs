//! Health check handler

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    model_kind: String,
    artifacts_loaded_at: DateTime<Utc>,
    timestamp: i64,
}

/// The store is loaded before the listener binds, so serving at all means ready
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let metadata = state.store.metadata();
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        model_kind: metadata.model_kind.clone(),
        artifacts_loaded_at: metadata.loaded_at,
        timestamp: Utc::now().timestamp(),
    })
}
