//! Reconciliation scenarios

use super::*;
use crate::constants::SENTINEL;
use crate::logic::input::RawInput;

fn schema(columns: &[&str]) -> FeatureSchema {
    FeatureSchema::new(columns.iter().map(|c| c.to_string()).collect()).unwrap()
}

/// Mirrors the column layout of the German credit training frame
fn german_credit_schema() -> FeatureSchema {
    schema(&[
        "checking_status",
        "duration",
        "credit_history",
        "purpose",
        "credit_amount",
        "savings_status",
        "employment",
        "installment_rate",
        "personal_status",
        "age",
        "housing",
        "existing_credits",
        "job",
    ])
}

#[test]
fn test_superset_schema_fills_sentinel_in_order() {
    let schema = german_credit_schema();
    let input = RawInput::default();
    let record = input.reconcile(&schema);

    assert_eq!(record.columns(), schema.columns());

    let supplied: Vec<&str> = input.fields().iter().map(|(n, _)| *n).collect();
    for (column, value) in record.iter() {
        if supplied.contains(&column) {
            assert!(matches!(value, Value::Int(_)), "{} should keep its int", column);
        } else {
            assert_eq!(value, &Value::Text(SENTINEL.to_string()), "{}", column);
        }
    }
    assert_eq!(record.sentinel_count(), schema.len() - 5);
    assert_eq!(record.get("duration"), Some(&Value::Int(24)));
    assert_eq!(record.get("credit_amount"), Some(&Value::Int(5000)));
}

#[test]
fn test_exact_schema_reorders_without_sentinel() {
    // Same five names, different order
    let schema = schema(&[
        "age",
        "existing_credits",
        "duration",
        "installment_rate",
        "credit_amount",
    ]);
    let input = RawInput {
        duration: 12,
        credit_amount: 1500,
        age: 40,
        installment_rate: 3,
        existing_credits: 2,
    };
    let record = input.reconcile(&schema);

    assert_eq!(record.columns(), schema.columns());
    assert_eq!(record.sentinel_count(), 0);
    assert_eq!(
        record.values(),
        &[
            Value::Int(40),
            Value::Int(2),
            Value::Int(12),
            Value::Int(3),
            Value::Int(1500),
        ]
    );
}

#[test]
fn test_extra_columns_dropped_silently() {
    let schema = schema(&["duration", "purpose"]);
    let record = reconcile(
        vec![
            ("duration", Value::Int(36)),
            ("foreign_worker", Value::from("yes")),
        ],
        &schema,
    );

    assert_eq!(record.columns(), &["duration".to_string(), "purpose".to_string()]);
    assert_eq!(record.get("foreign_worker"), None);
    assert_eq!(record.get("purpose"), Some(&Value::sentinel()));
}

#[test]
fn test_empty_schema_gives_zero_columns() {
    let schema = schema(&[]);
    let record = RawInput::default().reconcile(&schema);
    assert!(record.is_empty());
    assert_eq!(record.sentinel_count(), 0);
}

#[test]
fn test_supplied_text_value_keeps_type() {
    let schema = schema(&["purpose", "duration"]);
    let record = reconcile(vec![("purpose", Value::from("car"))], &schema);
    assert_eq!(record.get("purpose"), Some(&Value::Text("car".to_string())));
    assert!(record.get("duration").map(Value::is_sentinel).unwrap_or(false));
}

#[test]
fn test_duplicate_schema_column_rejected() {
    let result = FeatureSchema::new(vec!["age".to_string(), "age".to_string()]);
    assert_eq!(
        result,
        Err(crate::error::SchemaError::DuplicateColumn("age".to_string()))
    );
}

#[test]
fn test_value_numeric_coercion() {
    assert_eq!(Value::Int(3).as_f64(), Some(3.0));
    assert_eq!(Value::from("2.5").as_f64(), Some(2.5));
    assert_eq!(Value::sentinel().as_f64(), None);
    assert_eq!(Value::Float(2.0).category_key(), "2");
    assert_eq!(Value::Int(4).category_key(), "4");
}
