//! ONNX Runtime classifier
//!
//! Runs a classifier exported to ONNX (for example a scikit-learn pipeline
//! converted with zipmap disabled). The graph is opaque: the tree explainer
//! cannot introspect it, so explanations for this family fail visibly.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::inference::Classifier;
use crate::error::{ArtifactError, InferenceError};
use crate::logic::preprocess::TransformedFeatures;

/// Output name used by converted scikit-learn classifiers
const PROBABILITY_OUTPUT: &str = "probabilities";

pub struct OnnxClassifier {
    /// `Session::run` needs `&mut`; the lock serialises concurrent requests
    session: Mutex<Session>,
    output_name: String,
    model_path: String,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("model_path", &self.model_path)
            .field("output_name", &self.output_name)
            .finish()
    }
}

impl OnnxClassifier {
    /// Load ONNX model from file
    pub fn from_file(model_path: &Path) -> Result<Self, ArtifactError> {
        log::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(ArtifactError::NotFound(model_path.to_path_buf()));
        }

        let session = Session::builder()
            .map_err(|e| ArtifactError::InvalidModel(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ArtifactError::InvalidModel(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| ArtifactError::InvalidModel(format!("Failed to load model: {}", e)))?;

        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name == PROBABILITY_OUTPUT)
            .or_else(|| session.outputs.last())
            .map(|o| o.name.clone())
            .ok_or_else(|| ArtifactError::InvalidModel("No output defined".to_string()))?;

        log::info!("ONNX model loaded successfully (output '{}')", output_name);

        Ok(Self {
            session: Mutex::new(session),
            output_name,
            model_path: model_path.display().to_string(),
        })
    }
}

impl Classifier for OnnxClassifier {
    fn kind(&self) -> &str {
        "onnx"
    }

    fn predict_proba(&self, features: &TransformedFeatures) -> Result<Vec<f64>, InferenceError> {
        let input_array = Array2::<f32>::from_shape_vec((1, features.len()), features.to_vec())
            .map_err(|e| InferenceError::Backend(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError::Backend(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Backend(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| InferenceError::Backend(format!("No output '{}'", self.output_name)))?;

        let output_tensor = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Backend(format!("Extract error: {}", e)))?;

        Ok(output_tensor.1.iter().map(|&p| f64::from(p)).collect())
    }
}
