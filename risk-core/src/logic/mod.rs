//! Logic Module - scoring engines
//!
//! ## Layout
//! - `input/` - bounded operator input
//! - `schema/` - reconcile partial records to the preprocessor schema
//! - `preprocess/` - fitted column transformer
//! - `model/` - classifier inference and decision policy
//! - `explain/` - TreeSHAP attribution and waterfall view
//! - `artifacts/` - load-once artifact store
//! - `pipeline` - one scoring request end to end

pub mod artifacts;
pub mod explain;
pub mod input;
pub mod model;
pub mod pipeline;
pub mod preprocess;
pub mod schema;
