//! Partial record → full schema record

use std::collections::HashMap;

use super::record::{FeatureSchema, ReconciledRecord, Value};

/// Build the record the preprocessor sees
///
/// Later duplicates of a supplied name win. Columns not in `schema` are dropped.
pub fn reconcile<I, K>(partial: I, schema: &FeatureSchema) -> ReconciledRecord
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    let mut supplied: HashMap<String, Value> = partial
        .into_iter()
        .map(|(name, value)| (name.into(), value))
        .collect();

    let values: Vec<Value> = schema
        .columns()
        .iter()
        .map(|column| supplied.remove(column).unwrap_or_else(Value::sentinel))
        .collect();

    if !supplied.is_empty() {
        let mut dropped: Vec<_> = supplied.into_keys().collect();
        dropped.sort();
        log::debug!("Dropping columns outside schema: {:?}", dropped);
    }

    let record = ReconciledRecord {
        columns: schema.columns().to_vec(),
        values,
    };

    log::debug!(
        "Reconciled {} columns ({} filled with sentinel)",
        record.len(),
        record.sentinel_count()
    );

    record
}
