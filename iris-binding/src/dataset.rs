//! Static facts about the model and the Iris dataset it was fitted on

use crate::features::Feature;
use crate::species::SpeciesLabel;
use crate::store::ModelStore;
use serde::{Deserialize, Serialize};

/// Observed range of one feature across the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRange {
    pub feature: Feature,
    pub name: String,
    pub min_cm: f64,
    pub max_cm: f64,
    pub average_cm: f64,
}

/// Sample count of one species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesShare {
    pub species: SpeciesLabel,
    pub samples: usize,
    pub percentage: String,
}

/// Dataset overview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub total_samples: usize,
    pub species: usize,
    pub features: usize,
    pub year_introduced: u16,
    pub feature_ranges: Vec<FeatureRange>,
    pub distribution: Vec<SpeciesShare>,
}

impl DatasetSummary {
    /// Summary of Fisher's Iris dataset
    pub fn iris() -> Self {
        let feature_ranges = Feature::ALL
            .into_iter()
            .map(|feature| {
                let (min_cm, max_cm, average_cm) = match feature {
                    Feature::SepalLength => (4.3, 7.9, 5.8),
                    Feature::SepalWidth => (2.0, 4.4, 3.1),
                    Feature::PetalLength => (1.0, 6.9, 3.8),
                    Feature::PetalWidth => (0.1, 2.5, 1.2),
                };
                FeatureRange {
                    feature,
                    name: feature.display_name().to_string(),
                    min_cm,
                    max_cm,
                    average_cm,
                }
            })
            .collect();

        let per_species = 50;
        let total_samples = per_species * SpeciesLabel::ALL.len();
        let distribution = SpeciesLabel::ALL
            .into_iter()
            .map(|species| SpeciesShare {
                species,
                samples: per_species,
                percentage: format!("{:.1}%", 100.0 * per_species as f64 / total_samples as f64),
            })
            .collect();

        Self {
            total_samples,
            species: SpeciesLabel::ALL.len(),
            features: Feature::ALL.len(),
            year_introduced: 1936,
            feature_ranges,
            distribution,
        }
    }
}

/// Model specification card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCard {
    pub algorithm: String,
    pub implementation: String,
    pub preprocessing: String,
    pub n_features: usize,
    pub classes: Vec<SpeciesLabel>,
    pub k: usize,
    pub training_samples: usize,
    pub reported_accuracy: String,
    pub advantages: Vec<String>,
    pub use_cases: Vec<String>,
}

impl ModelCard {
    /// Card for the loaded artifacts; counts come from the classifier itself
    pub fn from_store(store: &ModelStore) -> Self {
        let classifier = store.classifier();
        let classes = classifier
            .classes()
            .into_iter()
            .filter_map(|raw| SpeciesLabel::parse(raw).ok())
            .collect();

        Self {
            algorithm: "K-Nearest Neighbors (KNN)".to_string(),
            implementation: "linfa-nn Ball Tree, Euclidean distance, majority vote".to_string(),
            preprocessing: "StandardScaler Normalization".to_string(),
            n_features: store.scaler().n_features(),
            classes,
            k: classifier.k(),
            training_samples: classifier.n_samples(),
            reported_accuracy: "~95% on test data".to_string(),
            advantages: to_strings(&[
                "Simple and interpretable",
                "No training period required",
                "Works well with small datasets",
                "Robust to noisy data",
            ]),
            use_cases: to_strings(&[
                "Botanical classification",
                "Educational demonstrations",
                "Pattern recognition studies",
                "Machine learning tutorials",
            ]),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
