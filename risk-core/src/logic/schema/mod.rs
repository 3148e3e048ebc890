//! Schema Reconciler
//!
//! Pads a partial operator record out to the exact column set and order the
//! fitted preprocessor was trained on.
//!
//! ## Rules
//! 1. Every schema column appears exactly once
//! 2. Supplied columns keep their value and type
//! 3. Missing columns get `constants::SENTINEL`
//! 4. Column order equals schema order (encodings are positional)
//! 5. Supplied columns outside the schema are dropped

pub mod record;
pub mod reconcile;

#[cfg(test)]
mod tests;

pub use record::{FeatureSchema, ReconciledRecord, Value};
pub use reconcile::reconcile;
