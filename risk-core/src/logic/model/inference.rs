//! Inference Pipeline - reconciled record → probability of default
//!
//! transform → predict_proba → positive-class column.
//! Model families sit behind the `Classifier` trait so the tree ensemble, the
//! ONNX runtime and test stubs are interchangeable.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::gbdt::TreeEnsemble;
use super::threshold::RiskTier;
use crate::constants::POSITIVE_CLASS_INDEX;
use crate::error::{InferenceError, ScoringError};
use crate::logic::preprocess::{Preprocessor, TransformedFeatures};
use crate::logic::schema::ReconciledRecord;

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// A fitted model mapping a feature vector to a class distribution
pub trait Classifier: Send + Sync {
    /// Model family, for logs and error messages
    fn kind(&self) -> &str;

    /// Probability per class for one row
    fn predict_proba(&self, features: &TransformedFeatures) -> Result<Vec<f64>, InferenceError>;

    /// Input width, when the model records it
    fn n_features(&self) -> Option<usize> {
        None
    }

    /// Tree structure for attribution; `None` for opaque model families
    fn as_tree_ensemble(&self) -> Option<&TreeEnsemble> {
        None
    }
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Output of one pipeline run, before the decision policy
#[derive(Debug, Clone)]
pub struct Inference {
    pub features: TransformedFeatures,
    pub probability: f64,
    pub inference_time_us: u64,
}

/// Prediction output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Probability of default, 0.0 - 1.0
    pub probability: f64,
    pub tier: RiskTier,
    pub inference_time_us: u64,
}

impl PredictionResult {
    /// Percentage with two decimals, e.g. `"50.00%"`
    pub fn probability_display(&self) -> String {
        format_probability(self.probability)
    }
}

pub fn format_probability(p: f64) -> String {
    format!("{:.2}%", p * 100.0)
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Pick the "default" class out of a class distribution
pub fn positive_probability(distribution: &[f64]) -> Result<f64, InferenceError> {
    if distribution.len() <= POSITIVE_CLASS_INDEX || distribution.len() < 2 {
        return Err(InferenceError::NotBinary {
            classes: distribution.len(),
        });
    }
    let p = distribution[POSITIVE_CLASS_INDEX];
    if !(0.0..=1.0).contains(&p) {
        return Err(InferenceError::InvalidProbability(p));
    }
    Ok(p)
}

/// Run transform and predict for one reconciled record
pub fn run(
    preprocessor: &dyn Preprocessor,
    classifier: &dyn Classifier,
    record: &ReconciledRecord,
) -> Result<Inference, ScoringError> {
    let start_time = Instant::now();

    let features = preprocessor.transform(record)?;
    log::debug!("Transformed record into {} features", features.len());

    let distribution = classifier.predict_proba(&features)?;
    let probability = positive_probability(&distribution)?;

    let inference_time_us = start_time.elapsed().as_micros() as u64;
    log::debug!(
        "{} predicted p(default) = {:.4} in {}us",
        classifier.kind(),
        probability,
        inference_time_us
    );

    Ok(Inference {
        features,
        probability,
        inference_time_us,
    })
}
