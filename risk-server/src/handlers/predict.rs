//! Prediction handler
//!
//! One call per "Predict" action. Input errors map to 400, preprocessor and
//! model failures to 422 with no tier. A failed explanation still returns
//! the prediction, with `explanation_error` set.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use credit_risk_core::{score, RawInput};
use uuid::Uuid;

use crate::models::PredictResponse;
use crate::{AppResult, AppState};

pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<RawInput>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let Json(input) = payload?;
    let request_id = Uuid::new_v4();

    let span = tracing::info_span!("predict", %request_id);
    let outcome = span.in_scope(|| {
        tracing::debug!(?input, "Scoring application");
        score(&state.store, &state.config.scoring(), &input)
    })?;

    tracing::info!(
        %request_id,
        probability = outcome.prediction.probability,
        tier = %outcome.prediction.tier,
        explained = outcome.explanation.is_ok(),
        "Prediction served"
    );

    Ok(Json(PredictResponse::new(request_id, outcome)))
}
