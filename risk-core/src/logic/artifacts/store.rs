//! Artifact Store - load once, share read-only
//!
//! Owns the fitted preprocessor, the classifier, the display feature names
//! and the schema derived from the preprocessor. Built exactly once at
//! startup and handed to request handlers behind an `Arc`; nothing in here
//! is mutated after `load` returns.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::{FEATURE_NAMES_FILE, ONNX_MODEL_FILE, PREPROCESSOR_FILE, TREE_MODEL_FILE};
use crate::error::{ArtifactError, SchemaError};
use crate::logic::model::gbdt::{EnsembleDump, TreeEnsemble};
use crate::logic::model::Classifier;
use crate::logic::preprocess::{ColumnTransformer, ColumnTransformerSpec, Preprocessor};
use crate::logic::schema::FeatureSchema;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// SHA-256 of one artifact file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactChecksum {
    pub file: String,
    pub sha256: String,
}

/// What was loaded, from where, and when
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactMetadata {
    pub source: String,
    pub model_kind: String,
    pub checksums: Vec<ArtifactChecksum>,
    pub schema_width: usize,
    pub output_width: usize,
    pub loaded_at: DateTime<Utc>,
}

pub struct ArtifactStore {
    preprocessor: Box<dyn Preprocessor>,
    classifier: Box<dyn Classifier>,
    feature_names: Vec<String>,
    schema: FeatureSchema,
    metadata: ArtifactMetadata,
}

impl std::fmt::Debug for ArtifactStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactStore")
            .field("schema", &self.schema)
            .field("feature_names", &self.feature_names)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// LOADING
// ============================================================================

struct LoadedFile {
    path: PathBuf,
    bytes: Vec<u8>,
    checksum: ArtifactChecksum,
}

fn read_artifact(dir: &Path, file: &str) -> Result<LoadedFile, ArtifactError> {
    let path = dir.join(file);
    if !path.exists() {
        return Err(ArtifactError::NotFound(path));
    }
    let bytes = fs::read(&path).map_err(|source| ArtifactError::Io {
        path: path.clone(),
        source,
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let checksum = ArtifactChecksum {
        file: file.to_string(),
        sha256: hex::encode(hasher.finalize()),
    };

    Ok(LoadedFile {
        path,
        bytes,
        checksum,
    })
}

fn parse<T: DeserializeOwned>(file: &LoadedFile) -> Result<T, ArtifactError> {
    serde_json::from_slice(&file.bytes).map_err(|source| ArtifactError::Parse {
        path: file.path.clone(),
        source,
    })
}

impl ArtifactStore {
    /// Load `preprocessor.json`, `feature_names.json` and the model from `dir`
    ///
    /// The model is `model.json` (tree ensemble) when present, otherwise
    /// `model.onnx` when built with the `onnx` feature.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let dir = dir.as_ref();
        log::info!("Loading artifacts from: {}", dir.display());

        let preprocessor_file = read_artifact(dir, PREPROCESSOR_FILE)?;
        let spec: ColumnTransformerSpec = parse(&preprocessor_file)?;
        let preprocessor = ColumnTransformer::from_spec(spec)?;

        let names_file = read_artifact(dir, FEATURE_NAMES_FILE)?;
        let feature_names: Vec<String> = parse(&names_file)?;

        let (classifier, model_checksum) = Self::load_classifier(dir, &feature_names)?;

        let checksums = vec![
            preprocessor_file.checksum,
            names_file.checksum,
            model_checksum,
        ];

        let mut store = Self::from_parts(Box::new(preprocessor), classifier, feature_names)?;
        store.metadata.source = dir.display().to_string();
        store.metadata.checksums = checksums;

        for checksum in &store.metadata.checksums {
            log::info!("  {} sha256={}", checksum.file, checksum.sha256);
        }
        log::info!(
            "Artifacts loaded: {} model, {} input columns, {} features",
            store.metadata.model_kind,
            store.metadata.schema_width,
            store.metadata.output_width
        );

        Ok(store)
    }

    fn load_classifier(
        dir: &Path,
        feature_names: &[String],
    ) -> Result<(Box<dyn Classifier>, ArtifactChecksum), ArtifactError> {
        if dir.join(TREE_MODEL_FILE).exists() {
            let file = read_artifact(dir, TREE_MODEL_FILE)?;
            let dump: EnsembleDump = parse(&file)?;
            let model = TreeEnsemble::from_dump(dump, feature_names)?;
            return Ok((Box::new(model), file.checksum));
        }

        #[cfg(feature = "onnx")]
        if dir.join(ONNX_MODEL_FILE).exists() {
            let file = read_artifact(dir, ONNX_MODEL_FILE)?;
            let model = crate::logic::model::OnnxClassifier::from_file(&file.path)?;
            return Ok((Box::new(model), file.checksum));
        }

        #[cfg(not(feature = "onnx"))]
        if dir.join(ONNX_MODEL_FILE).exists() {
            log::warn!(
                "Found {} but this build has no ONNX support (enable the `onnx` feature)",
                ONNX_MODEL_FILE
            );
        }

        Err(ArtifactError::NotFound(dir.join(TREE_MODEL_FILE)))
    }

    /// Assemble a store from already-built parts
    ///
    /// Checks that the schema has no duplicates and that names, preprocessor
    /// output and model input all agree on the feature width.
    pub fn from_parts(
        preprocessor: Box<dyn Preprocessor>,
        classifier: Box<dyn Classifier>,
        feature_names: Vec<String>,
    ) -> Result<Self, SchemaError> {
        let schema = FeatureSchema::new(preprocessor.feature_names_in().to_vec())?;
        let outputs = preprocessor.n_features_out();

        if feature_names.len() != outputs {
            return Err(SchemaError::FeatureNamesMismatch {
                names: feature_names.len(),
                outputs,
            });
        }
        if let Some(model) = classifier.n_features() {
            if model != outputs {
                return Err(SchemaError::ModelWidthMismatch { model, outputs });
            }
        }

        let metadata = ArtifactMetadata {
            source: "<memory>".to_string(),
            model_kind: classifier.kind().to_string(),
            checksums: Vec::new(),
            schema_width: schema.len(),
            output_width: outputs,
            loaded_at: Utc::now(),
        };

        Ok(Self {
            preprocessor,
            classifier,
            feature_names,
            schema,
            metadata,
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn preprocessor(&self) -> &dyn Preprocessor {
        self.preprocessor.as_ref()
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    /// Display name per transformed feature
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn metadata(&self) -> &ArtifactMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const PREPROCESSOR: &str = r#"{
        "feature_names_in": ["housing", "duration", "age"],
        "transformers": [
            {"kind": "standard_scaler", "name": "num", "columns": ["duration", "age"], "mean": [21.0, 35.5], "scale": [12.0, 11.4]},
            {"kind": "one_hot", "name": "cat", "columns": ["housing"], "categories": [["own", "rent"]], "handle_unknown": "ignore"}
        ]
    }"#;

    const NAMES: &str = r#"["num__duration", "num__age", "cat__housing_own", "cat__housing_rent"]"#;

    const MODEL: &str = r#"{
        "objective": "binary:logistic",
        "base_score": 0.3,
        "trees": [
            {"nodeid": 0, "split": "f0", "split_condition": 0.0, "yes": 1, "no": 2, "missing": 1, "cover": 10.0,
             "children": [{"nodeid": 1, "leaf": -0.2, "cover": 6.0}, {"nodeid": 2, "leaf": 0.3, "cover": 4.0}]}
        ]
    }"#;

    fn write_all(dir: &Path, preprocessor: &str, names: &str, model: &str) {
        fs::write(dir.join(PREPROCESSOR_FILE), preprocessor).unwrap();
        fs::write(dir.join(FEATURE_NAMES_FILE), names).unwrap();
        fs::write(dir.join(TREE_MODEL_FILE), model).unwrap();
    }

    #[test]
    fn test_load_artifacts() {
        let dir = tempdir().unwrap();
        write_all(dir.path(), PREPROCESSOR, NAMES, MODEL);

        let store = ArtifactStore::load(dir.path()).unwrap();
        assert_eq!(store.schema().columns(), &["housing", "duration", "age"]);
        assert_eq!(store.feature_names().len(), 4);
        assert_eq!(store.classifier().kind(), "gbdt");

        let meta = store.metadata();
        assert_eq!(meta.schema_width, 3);
        assert_eq!(meta.output_width, 4);
        assert_eq!(meta.checksums.len(), 3);
        assert!(meta.checksums.iter().all(|c| c.sha256.len() == 64));
    }

    #[test]
    fn test_checksum_tracks_content() {
        let dir = tempdir().unwrap();
        write_all(dir.path(), PREPROCESSOR, NAMES, MODEL);
        let first = ArtifactStore::load(dir.path()).unwrap().metadata().checksums.clone();

        fs::write(dir.path().join(TREE_MODEL_FILE), MODEL.replace("-0.2", "-0.25")).unwrap();
        let second = ArtifactStore::load(dir.path()).unwrap().metadata().checksums.clone();

        assert_eq!(first[0], second[0]);
        assert_ne!(first[2], second[2]);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(PREPROCESSOR_FILE), PREPROCESSOR).unwrap();
        fs::write(dir.path().join(FEATURE_NAMES_FILE), NAMES).unwrap();

        let err = ArtifactStore::load(dir.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::NotFound(p) if p.ends_with(TREE_MODEL_FILE)));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let dir = tempdir().unwrap();
        write_all(dir.path(), "{ not json", NAMES, MODEL);
        assert!(matches!(
            ArtifactStore::load(dir.path()),
            Err(ArtifactError::Parse { .. })
        ));
    }

    #[test]
    fn test_feature_names_must_match_outputs() {
        let dir = tempdir().unwrap();
        write_all(dir.path(), PREPROCESSOR, r#"["a", "b", "c"]"#, MODEL);
        // The model resolves f0 against 3 names fine; the width check catches it
        assert!(matches!(
            ArtifactStore::load(dir.path()),
            Err(ArtifactError::Schema(SchemaError::FeatureNamesMismatch { names: 3, outputs: 4 }))
        ));
    }

    #[test]
    fn test_duplicate_schema_column_is_schema_error() {
        let dir = tempdir().unwrap();
        let preprocessor = PREPROCESSOR.replace(
            r#"["housing", "duration", "age"]"#,
            r#"["housing", "duration", "age", "age"]"#,
        );
        write_all(dir.path(), &preprocessor, NAMES, MODEL);
        assert!(matches!(
            ArtifactStore::load(dir.path()),
            Err(ArtifactError::Schema(SchemaError::DuplicateColumn(c))) if c == "age"
        ));
    }
}
