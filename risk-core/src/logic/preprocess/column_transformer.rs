//! Fitted column transformer
//!
//! Applies an ordered list of steps, each to its own subset of input columns,
//! and concatenates their outputs. Input columns no step names are dropped.

use serde::{Deserialize, Serialize};

use super::{Preprocessor, TransformedFeatures};
use crate::error::{ArtifactError, TransformError};
use crate::logic::schema::{ReconciledRecord, Value};

// ============================================================================
// ARTIFACT FORMAT
// ============================================================================

/// On-disk form of a fitted column transformer (`preprocessor.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnTransformerSpec {
    pub feature_names_in: Vec<String>,
    pub transformers: Vec<TransformerStep>,
}

/// One fitted step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformerStep {
    /// `(x - mean) / scale` per column
    StandardScaler {
        name: String,
        columns: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    /// One indicator per fitted category per column
    OneHot {
        name: String,
        columns: Vec<String>,
        categories: Vec<Vec<String>>,
        #[serde(default)]
        handle_unknown: HandleUnknown,
    },
    /// Numeric columns copied unchanged
    Passthrough { name: String, columns: Vec<String> },
}

impl TransformerStep {
    pub fn name(&self) -> &str {
        match self {
            TransformerStep::StandardScaler { name, .. }
            | TransformerStep::OneHot { name, .. }
            | TransformerStep::Passthrough { name, .. } => name,
        }
    }

    pub fn columns(&self) -> &[String] {
        match self {
            TransformerStep::StandardScaler { columns, .. }
            | TransformerStep::OneHot { columns, .. }
            | TransformerStep::Passthrough { columns, .. } => columns,
        }
    }
}

/// What a one-hot step does with a category it was not fitted on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    #[default]
    Error,
    /// Emit an all-zero block
    Ignore,
}

// ============================================================================
// FITTED TRANSFORMER
// ============================================================================

#[derive(Debug, Clone)]
pub struct ColumnTransformer {
    feature_names_in: Vec<String>,
    steps: Vec<TransformerStep>,
    /// Per step, the record position of each of its columns
    positions: Vec<Vec<usize>>,
    feature_names_out: Vec<String>,
}

impl ColumnTransformer {
    /// Validate a parsed spec and resolve column positions
    pub fn from_spec(spec: ColumnTransformerSpec) -> Result<Self, ArtifactError> {
        let ColumnTransformerSpec {
            feature_names_in,
            transformers,
        } = spec;

        let mut positions = Vec::with_capacity(transformers.len());
        let mut feature_names_out = Vec::new();

        for step in &transformers {
            let mut step_positions = Vec::with_capacity(step.columns().len());
            for column in step.columns() {
                let pos = feature_names_in
                    .iter()
                    .position(|c| c == column)
                    .ok_or_else(|| {
                        ArtifactError::InvalidPreprocessor(format!(
                            "step '{}' uses column '{}' missing from feature_names_in",
                            step.name(),
                            column
                        ))
                    })?;
                step_positions.push(pos);
            }
            positions.push(step_positions);

            match step {
                TransformerStep::StandardScaler {
                    name,
                    columns,
                    mean,
                    scale,
                } => {
                    if mean.len() != columns.len() || scale.len() != columns.len() {
                        return Err(ArtifactError::InvalidPreprocessor(format!(
                            "scaler '{}' has {} columns, {} means, {} scales",
                            name,
                            columns.len(),
                            mean.len(),
                            scale.len()
                        )));
                    }
                    if let Some(i) = scale.iter().position(|s| *s == 0.0 || !s.is_finite()) {
                        return Err(ArtifactError::InvalidPreprocessor(format!(
                            "scaler '{}' has invalid scale for column '{}'",
                            name, columns[i]
                        )));
                    }
                    feature_names_out.extend(columns.iter().map(|c| format!("{}__{}", name, c)));
                }
                TransformerStep::OneHot {
                    name,
                    columns,
                    categories,
                    ..
                } => {
                    if categories.len() != columns.len() {
                        return Err(ArtifactError::InvalidPreprocessor(format!(
                            "one-hot '{}' has {} columns but {} category lists",
                            name,
                            columns.len(),
                            categories.len()
                        )));
                    }
                    for (column, cats) in columns.iter().zip(categories) {
                        feature_names_out
                            .extend(cats.iter().map(|cat| format!("{}__{}_{}", name, column, cat)));
                    }
                }
                TransformerStep::Passthrough { name, columns } => {
                    feature_names_out.extend(columns.iter().map(|c| format!("{}__{}", name, c)));
                }
            }
        }

        log::debug!(
            "Column transformer: {} inputs, {} steps, {} outputs",
            feature_names_in.len(),
            transformers.len(),
            feature_names_out.len()
        );

        Ok(Self {
            feature_names_in,
            steps: transformers,
            positions,
            feature_names_out,
        })
    }

    /// Output column names, `{step}__{column}` or `{step}__{column}_{category}`
    pub fn feature_names_out(&self) -> &[String] {
        &self.feature_names_out
    }

    pub fn steps(&self) -> &[TransformerStep] {
        &self.steps
    }

    /// The record must carry exactly the fitted columns, in fitted order
    fn check_columns(&self, record: &ReconciledRecord) -> Result<(), TransformError> {
        if record.len() != self.feature_names_in.len() {
            return Err(TransformError::ColumnCount {
                expected: self.feature_names_in.len(),
                got: record.len(),
            });
        }
        for (position, (expected, got)) in self
            .feature_names_in
            .iter()
            .zip(record.columns())
            .enumerate()
        {
            if expected != got {
                return Err(TransformError::ColumnOrder {
                    position,
                    expected: expected.clone(),
                    got: got.clone(),
                });
            }
        }
        Ok(())
    }
}

fn numeric(column: &str, value: &Value) -> Result<f64, TransformError> {
    let x = value.as_f64().ok_or_else(|| TransformError::NotNumeric {
        column: column.to_string(),
        value: value.to_string(),
    })?;
    if !x.is_finite() {
        return Err(TransformError::NonFinite {
            column: column.to_string(),
        });
    }
    Ok(x)
}

impl Preprocessor for ColumnTransformer {
    fn feature_names_in(&self) -> &[String] {
        &self.feature_names_in
    }

    fn n_features_out(&self) -> usize {
        self.feature_names_out.len()
    }

    fn transform(&self, record: &ReconciledRecord) -> Result<TransformedFeatures, TransformError> {
        self.check_columns(record)?;

        let values = record.values();
        let mut out = Vec::with_capacity(self.feature_names_out.len());

        for (step, positions) in self.steps.iter().zip(&self.positions) {
            match step {
                TransformerStep::StandardScaler {
                    columns,
                    mean,
                    scale,
                    ..
                } => {
                    for (i, &pos) in positions.iter().enumerate() {
                        let x = numeric(&columns[i], &values[pos])?;
                        out.push(((x - mean[i]) / scale[i]) as f32);
                    }
                }
                TransformerStep::OneHot {
                    columns,
                    categories,
                    handle_unknown,
                    ..
                } => {
                    for (i, &pos) in positions.iter().enumerate() {
                        let key = values[pos].category_key();
                        let cats = &categories[i];
                        match cats.iter().position(|c| c.as_str() == key.as_ref()) {
                            Some(hit) => {
                                out.extend((0..cats.len()).map(|j| if j == hit { 1.0 } else { 0.0 }))
                            }
                            None if *handle_unknown == HandleUnknown::Ignore => {
                                out.extend(std::iter::repeat(0.0).take(cats.len()))
                            }
                            None => {
                                return Err(TransformError::UnknownCategory {
                                    column: columns[i].clone(),
                                    value: key.into_owned(),
                                })
                            }
                        }
                    }
                }
                TransformerStep::Passthrough { columns, .. } => {
                    for (i, &pos) in positions.iter().enumerate() {
                        out.push(numeric(&columns[i], &values[pos])? as f32);
                    }
                }
            }
        }

        Ok(TransformedFeatures::from_vec(out))
    }
}
