//! Form definition handler

use axum::{extract::State, Json};
use credit_risk_core::constants::INPUT_FIELDS;

use crate::models::FormResponse;
use crate::AppState;

/// Slider bounds and defaults, straight from the core's input domain
pub async fn fields(State(state): State<AppState>) -> Json<FormResponse> {
    Json(FormResponse {
        fields: INPUT_FIELDS.to_vec(),
        thresholds: state.config.thresholds,
    })
}
