use serde::{Deserialize, Serialize};

use super::waterfall::Waterfall;

/// Raw attribution for one prediction, in margin (log-odds) space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribution {
    /// One value per transformed feature, positional
    pub values: Vec<f64>,
    /// Expected model output the values are measured against
    pub base_value: f64,
    /// Model output for this row; `base_value + sum(values)`
    pub output_value: f64,
}

impl Attribution {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.base_value + self.values.iter().sum::<f64>()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub name: String,
    /// Transformed value the model saw
    pub value: f32,
    pub attribution: f64,
}

/// Display object: attributions bound to names and values by position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub base_value: f64,
    pub output_value: f64,
    pub contributions: Vec<FeatureContribution>,
    pub waterfall: Waterfall,
}
