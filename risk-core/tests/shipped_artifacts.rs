//! Scoring against the artifacts shipped in the repository root

use std::path::PathBuf;

use credit_risk_core::constants::{DEFAULT_MAX_DISPLAY, SENTINEL};
use credit_risk_core::{score, ArtifactStore, RawInput, RiskTier, ScoringConfig, ScoringError};

fn artifact_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../artifacts")
}

fn store() -> ArtifactStore {
    ArtifactStore::load(artifact_dir()).expect("shipped artifacts load")
}

#[test]
fn shipped_artifacts_are_consistent() {
    let store = store();
    assert_eq!(store.schema().len(), 14);
    assert_eq!(store.feature_names().len(), 31);
    assert_eq!(store.preprocessor().n_features_out(), 31);
    assert_eq!(store.classifier().kind(), "gbdt");
    assert_eq!(store.metadata().checksums.len(), 3);
}

#[test]
fn default_applicant_goes_to_manual_review() {
    let outcome = score(&store(), &ScoringConfig::default(), &RawInput::default()).unwrap();
    let p = outcome.prediction.probability;
    assert!(p > 0.35 && p < 0.36, "p = {}", p);
    assert_eq!(outcome.prediction.tier, RiskTier::Medium);
    assert_eq!(outcome.prediction.probability_display(), "35.50%");
}

#[test]
fn short_small_loan_for_older_applicant_is_low_risk() {
    let input = RawInput {
        duration: 6,
        credit_amount: 250,
        age: 60,
        installment_rate: 1,
        existing_credits: 1,
    };
    let outcome = score(&store(), &ScoringConfig::default(), &input).unwrap();
    assert_eq!(outcome.prediction.tier, RiskTier::Low);
}

#[test]
fn long_large_loan_scores_higher_than_default() {
    let store = store();
    let config = ScoringConfig::default();
    let input = RawInput {
        duration: 72,
        credit_amount: 20000,
        age: 18,
        installment_rate: 4,
        existing_credits: 4,
    };
    let risky = score(&store, &config, &input).unwrap();
    let baseline = score(&store, &config, &RawInput::default()).unwrap();
    assert!(risky.prediction.probability > baseline.prediction.probability);
}

#[test]
fn explanation_is_additive_and_named() {
    let store = store();
    let outcome = score(&store, &ScoringConfig::default(), &RawInput::default()).unwrap();
    let explanation = outcome.explanation.expect("tree model is explainable");

    assert_eq!(explanation.contributions.len(), store.feature_names().len());
    for (contribution, name) in explanation.contributions.iter().zip(store.feature_names()) {
        assert_eq!(&contribution.name, name);
    }

    let total: f64 = explanation.base_value
        + explanation
            .contributions
            .iter()
            .map(|c| c.attribution)
            .sum::<f64>();
    assert!((total - explanation.output_value).abs() < 1e-6);

    let p = 1.0 / (1.0 + (-explanation.output_value).exp());
    assert!((p - outcome.prediction.probability).abs() < 1e-9);

    assert!(explanation.waterfall.rows.len() <= DEFAULT_MAX_DISPLAY);
}

#[test]
fn operator_fields_keep_values_and_others_get_sentinel() {
    let store = store();
    let record = RawInput::default().reconcile(store.schema());
    assert_eq!(record.columns(), store.schema().columns());
    assert_eq!(record.get("age").map(|v| v.to_string()), Some("35".to_string()));
    assert_eq!(record.get("housing").map(|v| v.to_string()), Some(SENTINEL.to_string()));
    assert_eq!(record.sentinel_count(), 9);
}

#[test]
fn out_of_range_input_is_rejected_before_scoring() {
    let input = RawInput {
        credit_amount: 20001,
        ..RawInput::default()
    };
    assert!(matches!(
        score(&store(), &ScoringConfig::default(), &input),
        Err(ScoringError::Input(_))
    ));
}
