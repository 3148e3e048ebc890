use super::tree_shap::tree_shap;
use super::types::{Attribution, Explanation, FeatureContribution};
use super::waterfall::Waterfall;
use crate::constants::ADDITIVITY_TOLERANCE;
use crate::error::ExplainError;
use crate::logic::model::Classifier;
use crate::logic::preprocess::TransformedFeatures;

/// Attribute one prediction to its transformed features
///
/// Only tree ensembles can be explained. Anything else is an error rather
/// than an all-zero attribution, which would read as "no feature mattered".
pub fn explain(
    classifier: &dyn Classifier,
    features: &TransformedFeatures,
) -> Result<Attribution, ExplainError> {
    let ensemble = classifier
        .as_tree_ensemble()
        .ok_or_else(|| ExplainError::UnsupportedModel(classifier.kind().to_string()))?;

    let output_value = ensemble.predict_margin(features)?;

    let mut values = vec![0.0; features.len()];
    for tree in ensemble.trees() {
        tree_shap(tree, features, &mut values);
    }

    let attribution = Attribution {
        values,
        base_value: ensemble.expected_margin(),
        output_value,
    };

    // Guard against a dump whose covers cannot support the decomposition
    let total = attribution.total();
    if (total - output_value).abs() > ADDITIVITY_TOLERANCE * output_value.abs().max(1.0) {
        return Err(ExplainError::NotAdditive {
            expected: output_value,
            got: total,
        });
    }

    Ok(attribution)
}

/// Bind attributions, transformed values and display names by position
pub fn assemble(
    attribution: Attribution,
    features: &TransformedFeatures,
    feature_names: &[String],
    max_display: usize,
) -> Result<Explanation, ExplainError> {
    if attribution.len() != feature_names.len() || features.len() != feature_names.len() {
        return Err(ExplainError::WidthMismatch {
            values: attribution.len(),
            names: feature_names.len(),
        });
    }

    let contributions: Vec<FeatureContribution> = feature_names
        .iter()
        .zip(features.view().iter())
        .zip(&attribution.values)
        .map(|((name, &value), &attribution)| FeatureContribution {
            name: name.clone(),
            value,
            attribution,
        })
        .collect();

    let waterfall = Waterfall::build(&contributions, attribution.base_value, max_display);

    Ok(Explanation {
        base_value: attribution.base_value,
        output_value: attribution.output_value,
        contributions,
        waterfall,
    })
}
