//! Error types for the scoring engine
//!
//! Load-time errors (`ArtifactError`, `SchemaError`) are fatal for the process.
//! Request-time errors (`InputError`, `TransformError`, `InferenceError`) abort a
//! single request and are wrapped by `ScoringError`. `ExplainError` is kept apart:
//! a failed explanation never invalidates a prediction that already succeeded.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load or validate an artifact file
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid preprocessor: {0}")]
    InvalidPreprocessor(String),

    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Feature schema unavailable or inconsistent with the preprocessor
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("column '{0}' appears more than once in the preprocessor schema")]
    DuplicateColumn(String),

    #[error("{names} feature names for {outputs} preprocessor outputs")]
    FeatureNamesMismatch { names: usize, outputs: usize },

    #[error("model expects {model} features but preprocessor produces {outputs}")]
    ModelWidthMismatch { model: usize, outputs: usize },

    #[error("model splits on feature index {index} but only {width} features exist")]
    FeatureIndexOutOfRange { index: usize, width: usize },

    #[error("model splits on unknown feature '{0}'")]
    UnknownFeature(String),
}

/// Operator input outside the documented domain
#[derive(Debug, Clone, Error)]
#[error("invalid input: {0}")]
pub struct InputError(#[from] pub validator::ValidationErrors);

/// Preprocessor rejected the reconciled record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("record has {got} columns, preprocessor expects {expected}")]
    ColumnCount { expected: usize, got: usize },

    #[error("column {position} is '{got}', preprocessor expects '{expected}'")]
    ColumnOrder {
        position: usize,
        expected: String,
        got: String,
    },

    #[error("column '{column}' could not convert '{value}' to a number")]
    NotNumeric { column: String, value: String },

    #[error("column '{column}' has non-finite value")]
    NonFinite { column: String },

    #[error("column '{column}' has unknown category '{value}'")]
    UnknownCategory { column: String, value: String },
}

/// Classifier failed to produce a usable probability
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("model expects {expected} features, got {got}")]
    WidthMismatch { expected: usize, got: usize },

    #[error("expected a distribution over at least 2 classes, got {classes}")]
    NotBinary { classes: usize },

    #[error("positive-class probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    #[error("inference backend failed: {0}")]
    Backend(String),
}

/// Attribution engine could not explain this prediction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExplainError {
    #[error("model type '{0}' is not supported by the tree explainer")]
    UnsupportedModel(String),

    #[error("{values} attribution values for {names} feature names")]
    WidthMismatch { values: usize, names: usize },

    #[error("model evaluation failed: {0}")]
    Model(#[from] InferenceError),

    #[error("attributions do not add up: baseline + sum = {got}, model output = {expected}")]
    NotAdditive { expected: f64, got: f64 },
}

/// Everything that can abort a single scoring request
#[derive(Debug, Clone, Error)]
pub enum ScoringError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("transform failed: {0}")]
    Transform(#[from] TransformError),

    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),
}
