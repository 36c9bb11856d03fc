//! Prediction service: measurements in, species and description out
//!
//! The service is stateless per call. It shares the model store read-only,
//! so one instance can serve any number of concurrent callers.

use crate::core::unified_error::IrisResult;
use crate::dataset::{DatasetSummary, ModelCard};
use crate::features::FeatureVector;
use crate::knn::LabelVote;
use crate::species::{SpeciesCatalog, SpeciesInfo, SpeciesLabel};
use crate::store::ModelStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Full answer to a prediction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub input: FeatureVector,
    pub species: SpeciesLabel,
    pub info: SpeciesInfo,
    pub summary: String,
    pub votes: Vec<LabelVote>,
    pub k: usize,
}

pub struct PredictionService {
    store: Arc<ModelStore>,
    catalog: SpeciesCatalog,
}

impl PredictionService {
    /// Service over a loaded store with the built-in species catalog
    pub fn new(store: Arc<ModelStore>) -> Self {
        Self::with_catalog(store, SpeciesCatalog::builtin())
    }

    pub fn with_catalog(store: Arc<ModelStore>, catalog: SpeciesCatalog) -> Self {
        Self { store, catalog }
    }

    /// Predict the species for a feature vector
    pub fn predict(&self, vector: &FeatureVector) -> IrisResult<SpeciesLabel> {
        self.classify(vector).map(|(label, _)| label)
    }

    /// Predict from raw values, checking arity and finiteness first
    pub fn predict_values(&self, values: &[f64]) -> IrisResult<SpeciesLabel> {
        self.predict(&FeatureVector::from_slice(values)?)
    }

    /// Static description of a species
    pub fn describe(&self, label: SpeciesLabel) -> IrisResult<&SpeciesInfo> {
        self.catalog.describe(label)
    }

    /// Predict, describe and summarize in one call
    pub fn predict_detailed(&self, vector: &FeatureVector) -> IrisResult<Prediction> {
        let (species, votes) = self.classify(vector)?;
        let info = self.describe(species)?.clone();
        Ok(Prediction {
            input: *vector,
            species,
            summary: format!(
                "The model predicts this flower belongs to the Iris {} species.",
                species
            ),
            info,
            votes,
            k: self.store.classifier().k(),
        })
    }

    pub fn catalog(&self) -> &SpeciesCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    pub fn model_card(&self) -> ModelCard {
        ModelCard::from_store(&self.store)
    }

    pub fn dataset_summary(&self) -> DatasetSummary {
        DatasetSummary::iris()
    }

    fn classify(&self, vector: &FeatureVector) -> IrisResult<(SpeciesLabel, Vec<LabelVote>)> {
        vector.validate()?;
        let scaled = self.store.scaler().transform(vector);
        let decision = self.store.classifier().classify(&scaled)?;
        let label = SpeciesLabel::parse(&decision.label)?;
        debug!(
            "Predicted {} for {:?} (nearest distance {:.4})",
            label,
            vector.to_array(),
            decision.nearest_distance
        );
        Ok((label, decision.tally))
    }
}
