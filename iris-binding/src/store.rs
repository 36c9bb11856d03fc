//! Model store: the fitted scaler and classifier, loaded once from disk
//!
//! Both artifacts must load for the store to exist. Any failure surfaces as
//! `ModelsUnavailable` and callers are expected to stop serving predictions.

use crate::core::unified_error::{errors, IrisResult};
use crate::knn::KNNClassifier;
use crate::scaler::StandardScaler;
use crate::species::SpeciesLabel;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// File name of the classifier artifact inside a model directory
pub const CLASSIFIER_ARTIFACT: &str = "knn_iris_model.json";
/// File name of the scaler artifact inside a model directory
pub const SCALER_ARTIFACT: &str = "scaler_iris.json";

/// Locations of the two artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPaths {
    pub classifier: PathBuf,
    pub scaler: PathBuf,
}

impl ModelPaths {
    /// Standard artifact names inside `dir`
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            classifier: dir.join(CLASSIFIER_ARTIFACT),
            scaler: dir.join(SCALER_ARTIFACT),
        }
    }
}

/// Read-only handle to both fitted artifacts
#[derive(Debug)]
pub struct ModelStore {
    scaler: StandardScaler,
    classifier: KNNClassifier,
    paths: ModelPaths,
}

impl ModelStore {
    /// Load both artifacts
    pub fn load(paths: &ModelPaths) -> IrisResult<Self> {
        let scaler_origin = paths.scaler.display().to_string();
        let classifier_origin = paths.classifier.display().to_string();

        let scaler = StandardScaler::from_json(&read_artifact(&paths.scaler)?, &scaler_origin)?;
        let classifier =
            KNNClassifier::from_json(&read_artifact(&paths.classifier)?, &classifier_origin)?;

        if classifier.n_features() != scaler.n_features() {
            return Err(errors::models_unavailable(
                &classifier_origin,
                &format!(
                    "classifier expects {} features but scaler provides {}",
                    classifier.n_features(),
                    scaler.n_features()
                ),
            ));
        }

        for class in classifier.classes() {
            if SpeciesLabel::parse(class).is_err() {
                warn!(
                    "Classifier label '{}' in {} is not a known species",
                    class, classifier_origin
                );
            }
        }

        info!(
            "Loaded k-NN classifier from {} (k={}, {} training points)",
            classifier_origin,
            classifier.k(),
            classifier.n_samples()
        );
        info!("Loaded standard scaler from {}", scaler_origin);

        Ok(Self {
            scaler,
            classifier,
            paths: paths.clone(),
        })
    }

    /// Load both artifacts from their standard names inside `dir`
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> IrisResult<Self> {
        Self::load(&ModelPaths::in_dir(dir))
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn classifier(&self) -> &KNNClassifier {
        &self.classifier
    }

    pub fn paths(&self) -> &ModelPaths {
        &self.paths
    }
}

fn read_artifact(path: &Path) -> IrisResult<String> {
    let origin = path.display().to_string();
    if !path.exists() {
        return Err(errors::models_unavailable(&origin, "file not found"));
    }
    std::fs::read_to_string(path).map_err(|e| errors::models_unavailable(&origin, &e.to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::unified_error::IrisError;
    use std::fs;

    /// Workspace `models/` directory holding the shipped artifacts
    pub(crate) fn shipped_model_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("models")
    }

    #[test]
    fn test_load_shipped_artifacts() {
        let store = ModelStore::load_dir(shipped_model_dir()).unwrap();
        assert_eq!(store.scaler().n_features(), 4);
        assert_eq!(store.classifier().n_features(), 4);
        assert_eq!(store.classifier().k(), 5);
        assert_eq!(store.classifier().n_samples(), 150);
        assert_eq!(
            store.classifier().classes(),
            vec!["setosa", "versicolor", "virginica"]
        );
        assert!(store.paths().scaler.ends_with(SCALER_ARTIFACT));
    }

    #[test]
    fn test_missing_classifier_is_models_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        fs::copy(
            shipped_model_dir().join(SCALER_ARTIFACT),
            dir.path().join(SCALER_ARTIFACT),
        )
        .unwrap();

        match ModelStore::load_dir(dir.path()) {
            Err(IrisError::ModelsUnavailable { path, reason }) => {
                assert!(path.ends_with(CLASSIFIER_ARTIFACT));
                assert_eq!(reason, "file not found");
            }
            other => panic!("expected ModelsUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_scaler_is_models_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        fs::copy(
            shipped_model_dir().join(CLASSIFIER_ARTIFACT),
            dir.path().join(CLASSIFIER_ARTIFACT),
        )
        .unwrap();

        match ModelStore::load_dir(dir.path()) {
            Err(IrisError::ModelsUnavailable { path, .. }) => {
                assert!(path.ends_with(SCALER_ARTIFACT))
            }
            other => panic!("expected ModelsUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_dir_is_models_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ModelStore::load_dir(dir.path()),
            Err(IrisError::ModelsUnavailable { .. })
        ));
    }

    #[test]
    fn test_corrupt_artifact_is_models_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        fs::copy(
            shipped_model_dir().join(SCALER_ARTIFACT),
            dir.path().join(SCALER_ARTIFACT),
        )
        .unwrap();
        fs::write(dir.path().join(CLASSIFIER_ARTIFACT), b"\x00\x01binary pickle").unwrap();

        assert!(matches!(
            ModelStore::load_dir(dir.path()),
            Err(IrisError::ModelsUnavailable { .. })
        ));
    }

    #[test]
    fn test_rejects_reordered_feature_names() {
        let dir = tempfile::tempdir().unwrap();
        fs::copy(
            shipped_model_dir().join(CLASSIFIER_ARTIFACT),
            dir.path().join(CLASSIFIER_ARTIFACT),
        )
        .unwrap();
        fs::write(
            dir.path().join(SCALER_ARTIFACT),
            r#"{
                "algorithm": "standard_scaler",
                "feature_names": ["petal_length_cm", "petal_width_cm", "sepal_length_cm", "sepal_width_cm"],
                "mean": [3.758, 1.1993333333, 5.8433333333, 3.0573333333],
                "scale": [1.7594040658, 0.7596926279, 0.8253012918, 0.4344109677]
            }"#,
        )
        .unwrap();

        match ModelStore::load_dir(dir.path()) {
            Err(IrisError::ModelsUnavailable { path, reason }) => {
                assert!(path.ends_with(SCALER_ARTIFACT));
                assert!(reason.contains("feature order"));
            }
            other => panic!("expected ModelsUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_explicit_paths() {
        let paths = ModelPaths {
            classifier: shipped_model_dir().join(CLASSIFIER_ARTIFACT),
            scaler: shipped_model_dir().join(SCALER_ARTIFACT),
        };
        assert!(ModelStore::load(&paths).is_ok());
    }
}
