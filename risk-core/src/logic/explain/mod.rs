//! Explainer Adapter - per-feature attribution for a single prediction
//!
//! `explain` runs TreeSHAP against the classifier (read-only), `assemble`
//! binds the result to feature names and builds the waterfall view.

pub mod engine;
pub mod tree_shap;
pub mod types;
pub mod waterfall;

#[cfg(test)]
mod tests;

pub use engine::{assemble, explain};
pub use types::{Attribution, Explanation, FeatureContribution};
pub use waterfall::{Waterfall, WaterfallRow};
