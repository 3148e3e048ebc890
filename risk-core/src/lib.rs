//! Credit Risk Core - loan default scoring engine
//!
//! Reconciles a partial applicant record to the schema a fitted preprocessor
//! expects, scores it with a gradient-boosted classifier, maps the
//! probability of default to a risk tier and attributes the prediction to
//! individual features.
//!
//! ```no_run
//! use credit_risk_core::{score, ArtifactStore, RawInput, ScoringConfig};
//!
//! let store = ArtifactStore::load("artifacts")?;
//! let outcome = score(&store, &ScoringConfig::default(), &RawInput::default())?;
//! println!("{} ({})", outcome.prediction.probability_display(), outcome.prediction.tier);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod constants;
pub mod error;
pub mod logic;

pub use error::{ArtifactError, ExplainError, InferenceError, InputError, SchemaError, ScoringError, TransformError};
pub use logic::artifacts::{ArtifactMetadata, ArtifactStore};
pub use logic::explain::{Explanation, FeatureContribution, Waterfall, WaterfallRow};
pub use logic::input::RawInput;
pub use logic::model::{Decision, PredictionResult, RiskTier, ThresholdConfig};
pub use logic::pipeline::{score, ScoringConfig, ScoringOutcome};
