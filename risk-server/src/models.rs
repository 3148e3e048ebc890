//! Request and response bodies

use credit_risk_core::constants::InputField;
use credit_risk_core::{
    ArtifactMetadata, Decision, Explanation, PredictionResult, RiskTier, ScoringOutcome, ThresholdConfig,
};
use serde::Serialize;
use uuid::Uuid;

/// Slider definitions for the form
#[derive(Debug, Serialize)]
pub struct FormResponse {
    pub fields: Vec<InputField>,
    pub thresholds: ThresholdConfig,
}

#[derive(Debug, Serialize)]
pub struct ModelResponse {
    pub metadata: ArtifactMetadata,
    pub schema: Vec<String>,
    pub feature_names: Vec<String>,
    pub thresholds: ThresholdConfig,
}

#[derive(Debug, Serialize)]
pub struct PredictionView {
    pub probability: f64,
    /// e.g. `"50.00%"`
    pub probability_display: String,
    pub tier: RiskTier,
    pub label: &'static str,
    /// Banner colour for the tier
    pub color: &'static str,
    pub decision: Decision,
    pub inference_time_us: u64,
}

impl From<&PredictionResult> for PredictionView {
    fn from(p: &PredictionResult) -> Self {
        Self {
            probability: p.probability,
            probability_display: p.probability_display(),
            tier: p.tier,
            label: p.tier.label(),
            color: p.tier.color(),
            decision: p.tier.decision(),
            inference_time_us: p.inference_time_us,
        }
    }
}

/// A prediction always carries either an explanation or the reason it is missing
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub request_id: Uuid,
    pub prediction: PredictionView,
    pub explanation: Option<Explanation>,
    pub explanation_error: Option<String>,
}

impl PredictResponse {
    pub fn new(request_id: Uuid, outcome: ScoringOutcome) -> Self {
        let prediction = PredictionView::from(&outcome.prediction);
        let (explanation, explanation_error) = match outcome.explanation {
            Ok(explanation) => (Some(explanation), None),
            Err(e) => (None, Some(e.to_string())),
        };

        Self {
            request_id,
            prediction,
            explanation,
            explanation_error,
        }
    }
}
