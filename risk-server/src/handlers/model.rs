//! Loaded artifact description

use axum::{extract::State, Json};

use crate::models::ModelResponse;
use crate::AppState;

pub async fn info(State(state): State<AppState>) -> Json<ModelResponse> {
    Json(ModelResponse {
        metadata: state.store.metadata().clone(),
        schema: state.store.schema().columns().to_vec(),
        feature_names: state.store.feature_names().to_vec(),
        thresholds: state.config.thresholds,
    })
}
