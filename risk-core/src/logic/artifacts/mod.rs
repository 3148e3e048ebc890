//! Artifact Store
//!
//! Fitted preprocessor, classifier and feature names, loaded once per process.

pub mod store;

pub use store::{ArtifactChecksum, ArtifactMetadata, ArtifactStore};
