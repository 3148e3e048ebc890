//! Model Module - classifier inference and decision policy
//!
//! - `inference` - `Classifier` trait and the transform → predict pipeline
//! - `gbdt` - gradient-boosted tree ensemble (explainable)
//! - `onnx` - ONNX Runtime classifier (opaque, `onnx` feature)
//! - `threshold` - probability → risk tier

pub mod gbdt;
pub mod inference;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod threshold;

// Re-export common types
pub use gbdt::{EnsembleDump, TreeEnsemble};
pub use inference::{Classifier, Inference, PredictionResult};
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
pub use threshold::{decide, Decision, RiskTier, ThresholdConfig};
