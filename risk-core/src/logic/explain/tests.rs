//! Explainer scenarios against a small ensemble and an opaque stub

use super::*;
use crate::error::{ExplainError, InferenceError};
use crate::logic::model::gbdt::{EnsembleDump, TreeEnsemble};
use crate::logic::model::Classifier;
use crate::logic::preprocess::TransformedFeatures;

fn names() -> Vec<String> {
    vec!["num__duration".into(), "num__age".into(), "cat__housing_own".into()]
}

fn ensemble() -> TreeEnsemble {
    let dump: EnsembleDump = serde_json::from_str(
        r#"{
            "objective": "binary:logistic",
            "base_score": 0.3,
            "trees": [
                {"nodeid": 0, "split": "num__duration", "split_condition": 0.2, "yes": 1, "no": 2, "missing": 1, "cover": 200.0,
                 "children": [
                    {"nodeid": 1, "split": "cat__housing_own", "split_condition": 0.5, "yes": 3, "no": 4, "missing": 3, "cover": 120.0,
                     "children": [
                        {"nodeid": 3, "leaf": 0.15, "cover": 50.0},
                        {"nodeid": 4, "leaf": -0.35, "cover": 70.0}
                     ]},
                    {"nodeid": 2, "leaf": 0.45, "cover": 80.0}
                 ]},
                {"nodeid": 0, "split": "num__age", "split_condition": -0.4, "yes": 1, "no": 2, "missing": 2, "cover": 200.0,
                 "children": [
                    {"nodeid": 1, "leaf": 0.25, "cover": 60.0},
                    {"nodeid": 2, "split": "num__duration", "split_condition": 1.1, "yes": 3, "no": 4, "missing": 3, "cover": 140.0,
                     "children": [
                        {"nodeid": 3, "leaf": -0.12, "cover": 110.0},
                        {"nodeid": 4, "leaf": 0.31, "cover": 30.0}
                     ]}
                 ]}
            ]
        }"#,
    )
    .unwrap();
    TreeEnsemble::from_dump(dump, &names()).unwrap()
}

/// Model family with no tree structure to introspect
struct OpaqueModel;

impl Classifier for OpaqueModel {
    fn kind(&self) -> &str {
        "opaque"
    }

    fn predict_proba(&self, _: &TransformedFeatures) -> Result<Vec<f64>, InferenceError> {
        Ok(vec![0.5, 0.5])
    }
}

#[test]
fn test_attribution_is_additive() {
    let model = ensemble();
    for row in [
        vec![0.0, 0.0, 1.0],
        vec![1.5, -1.0, 0.0],
        vec![0.5, 0.3, 1.0],
        vec![-0.7, -0.5, 0.0],
    ] {
        let x = TransformedFeatures::from_vec(row);
        let attribution = explain(&model, &x).unwrap();
        let margin = model.predict_margin(&x).unwrap();
        assert_eq!(attribution.len(), names().len());
        assert!((attribution.total() - margin).abs() < 1e-9);
        assert_eq!(attribution.output_value, margin);
    }
}

#[test]
fn test_baseline_is_expected_margin() {
    let model = ensemble();
    let x = TransformedFeatures::from_vec(vec![0.0, 0.0, 1.0]);
    let attribution = explain(&model, &x).unwrap();
    assert_eq!(attribution.base_value, model.expected_margin());
}

#[test]
fn test_explaining_twice_gives_same_result() {
    let model = ensemble();
    let x = TransformedFeatures::from_vec(vec![1.5, -1.0, 0.0]);
    assert_eq!(explain(&model, &x).unwrap(), explain(&model, &x).unwrap());
}

#[test]
fn test_opaque_model_fails_visibly() {
    let x = TransformedFeatures::from_vec(vec![0.0, 0.0, 1.0]);
    assert_eq!(
        explain(&OpaqueModel, &x),
        Err(ExplainError::UnsupportedModel("opaque".to_string()))
    );
}

#[test]
fn test_wrong_width_is_explain_error() {
    let x = TransformedFeatures::from_vec(vec![0.0, 0.0]);
    assert!(matches!(
        explain(&ensemble(), &x),
        Err(ExplainError::Model(InferenceError::WidthMismatch { expected: 3, got: 2 }))
    ));
}

#[test]
fn test_assemble_binds_by_position() {
    let model = ensemble();
    let x = TransformedFeatures::from_vec(vec![1.5, -1.0, 0.0]);
    let attribution = explain(&model, &x).unwrap();
    let values = attribution.values.clone();

    let explanation = assemble(attribution, &x, &names(), 10).unwrap();
    assert_eq!(explanation.contributions.len(), 3);
    for (i, c) in explanation.contributions.iter().enumerate() {
        assert_eq!(c.name, names()[i]);
        assert_eq!(Some(c.value), x.get(i));
        assert_eq!(c.attribution, values[i]);
    }
    assert!((explanation.waterfall.output_value - explanation.output_value).abs() < 1e-9);
}

#[test]
fn test_assemble_rejects_name_mismatch() {
    let model = ensemble();
    let x = TransformedFeatures::from_vec(vec![1.5, -1.0, 0.0]);
    let attribution = explain(&model, &x).unwrap();
    let err = assemble(attribution, &x, &names()[..2], 10).unwrap_err();
    assert_eq!(err, ExplainError::WidthMismatch { values: 3, names: 2 });
}
