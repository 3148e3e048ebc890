//! Preprocessor - record → numeric feature vector
//!
//! The scoring engine only talks to the `Preprocessor` trait. The shipped
//! implementation is a fitted `ColumnTransformer` loaded from JSON.

pub mod column_transformer;

use ndarray::{Array1, ArrayView1};

use crate::error::TransformError;
use crate::logic::schema::ReconciledRecord;

pub use column_transformer::{ColumnTransformer, ColumnTransformerSpec, HandleUnknown, TransformerStep};

// ============================================================================
// TRANSFORMED FEATURES
// ============================================================================

/// Numeric output of the preprocessor for one row
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedFeatures {
    values: Array1<f32>,
}

impl TransformedFeatures {
    pub fn new(values: Array1<f32>) -> Self {
        Self { values }
    }

    pub fn from_vec(values: Vec<f32>) -> Self {
        Self {
            values: Array1::from_vec(values),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied()
    }

    pub fn view(&self) -> ArrayView1<'_, f32> {
        self.values.view()
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.values.to_vec()
    }
}

// ============================================================================
// PREPROCESSOR TRAIT
// ============================================================================

/// A fitted transformation from a tabular record to a numeric vector
pub trait Preprocessor: Send + Sync {
    /// Ordered column names the preprocessor was fitted on
    fn feature_names_in(&self) -> &[String];

    /// Width of every vector `transform` produces
    fn n_features_out(&self) -> usize;

    /// Deterministic, side-effect free for identical input
    fn transform(&self, record: &ReconciledRecord) -> Result<TransformedFeatures, TransformError>;
}
