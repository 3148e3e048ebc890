//! Scoring Pipeline - one "Predict" action end to end
//!
//! validate → reconcile → transform → predict → decide → explain.
//! Everything before `decide` aborts the request on failure. A failed
//! explanation is carried alongside the prediction instead.

use crate::constants::DEFAULT_MAX_DISPLAY;
use crate::error::{ExplainError, ScoringError};
use crate::logic::artifacts::ArtifactStore;
use crate::logic::explain::{self, Explanation};
use crate::logic::input::RawInput;
use crate::logic::model::{inference, PredictionResult, ThresholdConfig};

/// Per-process scoring settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    pub thresholds: ThresholdConfig,
    pub max_display: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdConfig::default(),
            max_display: DEFAULT_MAX_DISPLAY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScoringOutcome {
    pub prediction: PredictionResult,
    pub explanation: Result<Explanation, ExplainError>,
}

/// Score one operator input against the loaded artifacts
pub fn score(
    store: &ArtifactStore,
    config: &ScoringConfig,
    input: &RawInput,
) -> Result<ScoringOutcome, ScoringError> {
    let input = input.checked()?;

    let record = input.reconcile(store.schema());
    log::debug!(
        "Reconciled {} columns ({} sentinel)",
        record.len(),
        record.sentinel_count()
    );

    let run = inference::run(store.preprocessor(), store.classifier(), &record)?;
    let tier = config.thresholds.decide(run.probability);

    let prediction = PredictionResult {
        probability: run.probability,
        tier,
        inference_time_us: run.inference_time_us,
    };

    let explanation = explain::explain(store.classifier(), &run.features).and_then(|attribution| {
        explain::assemble(attribution, &run.features, store.feature_names(), config.max_display)
    });
    if let Err(e) = &explanation {
        log::warn!("Explanation unavailable: {}", e);
    }

    log::info!(
        "Scored application: p={:.4} tier={} decision={:?}",
        prediction.probability,
        prediction.tier,
        prediction.tier.decision()
    );

    Ok(ScoringOutcome {
        prediction,
        explanation,
    })
}
