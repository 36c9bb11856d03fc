//! KNN (K-Nearest Neighbors) implementation using Linfa
//!
//! Inference-only implementation. The classifier was fitted offline on
//! standardized measurements; the stored points are already in scaled space.
//! Models are loaded from JSON.
//!
//! Voting is a plain majority among the k nearest points. Neighbors are ranked
//! by (distance, training index); on a vote tie the label whose closest member
//! ranks first wins.

use crate::core::unified_error::{errors, IrisResult};
use crate::features::{check_feature_order, NUM_FEATURES};
use crate::scaler::ScaledVector;
use linfa_nn::{
    distance::{Distance, L2Dist},
    BallTree, NearestNeighbour,
};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Model data for JSON serialization
#[derive(Debug, Serialize, Deserialize)]
pub struct KNNModelData {
    pub algorithm: String,
    pub trained: bool,
    pub k: usize,
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub embeddings: Vec<Vec<f64>>,
    pub labels: Vec<String>,
}

/// Votes collected by one label among the k nearest neighbors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelVote {
    pub label: String,
    pub votes: usize,
}

/// Outcome of a single k-NN query
#[derive(Debug, Clone)]
pub struct KNNDecision {
    /// Winning raw label as stored in the artifact
    pub label: String,
    /// Tally in order of each label's nearest member
    pub tally: Vec<LabelVote>,
    /// Distance to the closest training point
    pub nearest_distance: f64,
}

/// KNN classifier using Linfa's Ball Tree for nearest neighbor search
#[derive(Debug)]
pub struct KNNClassifier {
    k: usize,
    embeddings: Option<Array2<f64>>,
    labels: Vec<String>,
    trained: bool,
}

impl KNNClassifier {
    /// Create an untrained classifier with the given k
    pub fn new(k: usize) -> Self {
        Self {
            k,
            embeddings: None,
            labels: Vec::new(),
            trained: false,
        }
    }

    /// Classify a scaled query vector
    pub fn classify(&self, query: &ScaledVector) -> IrisResult<KNNDecision> {
        let embeddings = match (&self.embeddings, self.trained) {
            (Some(embeddings), true) => embeddings,
            _ => return Err(errors::inference_error("knn_classify", "model not trained")),
        };

        if query.len() != embeddings.ncols() {
            return Err(errors::invalid_input(
                "features",
                &format!("{} scaled values", embeddings.ncols()),
                &format!("{} scaled values", query.len()),
            ));
        }

        let ball_tree = BallTree::new()
            .from_batch(embeddings, L2Dist)
            .map_err(|e| errors::inference_error("build_ball_tree", &e.to_string()))?;

        let k = self.k.min(self.labels.len());
        let neighbors = ball_tree
            .k_nearest(query.view(), k)
            .map_err(|e| errors::inference_error("k_nearest", &e.to_string()))?;

        let mut ranked: Vec<(f64, usize)> = neighbors
            .iter()
            .map(|(point, idx)| (L2Dist.distance(point.view(), query.view()), *idx))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut tally: Vec<LabelVote> = Vec::new();
        for (_, idx) in &ranked {
            let label = &self.labels[*idx];
            match tally.iter_mut().find(|v| &v.label == label) {
                Some(vote) => vote.votes += 1,
                None => tally.push(LabelVote {
                    label: label.clone(),
                    votes: 1,
                }),
            }
        }

        // Tally is ordered by first appearance, so keeping the earlier entry
        // on equal counts implements the nearest-member tie-break.
        let winner = tally
            .iter()
            .fold(None::<&LabelVote>, |best, vote| match best {
                Some(b) if b.votes >= vote.votes => Some(b),
                _ => Some(vote),
            })
            .map(|vote| vote.label.clone())
            .ok_or_else(|| errors::inference_error("knn_vote", "no votes found"))?;

        Ok(KNNDecision {
            label: winner,
            tally,
            nearest_distance: ranked.first().map(|(d, _)| *d).unwrap_or(f64::INFINITY),
        })
    }

    /// Check if model is trained
    pub fn is_trained(&self) -> bool {
        self.trained
    }

    /// Number of neighbors consulted per query
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of stored training points
    pub fn n_samples(&self) -> usize {
        self.labels.len()
    }

    /// Dimension of stored training points
    pub fn n_features(&self) -> usize {
        self.embeddings.as_ref().map(|e| e.ncols()).unwrap_or(0)
    }

    /// Distinct raw labels in first-seen order
    pub fn classes(&self) -> Vec<&str> {
        let mut classes: Vec<&str> = Vec::new();
        for label in &self.labels {
            if !classes.contains(&label.as_str()) {
                classes.push(label);
            }
        }
        classes
    }

    /// Load model from JSON.
    ///
    /// `origin` names the artifact in error messages.
    pub fn from_json(json: &str, origin: &str) -> IrisResult<Self> {
        let data: KNNModelData = serde_json::from_str(json)
            .map_err(|e| errors::models_unavailable(origin, &format!("JSON parse failed: {}", e)))?;

        if data.algorithm != "knn" {
            return Err(errors::models_unavailable(
                origin,
                &format!("expected algorithm 'knn', got '{}'", data.algorithm),
            ));
        }
        check_feature_order(&data.feature_names, origin)?;
        if !data.trained {
            return Err(errors::models_unavailable(origin, "classifier is not trained"));
        }
        if data.k == 0 {
            return Err(errors::models_unavailable(origin, "k must be at least 1"));
        }
        if data.embeddings.is_empty() {
            return Err(errors::models_unavailable(origin, "no training points"));
        }
        if data.labels.len() != data.embeddings.len() {
            return Err(errors::models_unavailable(
                origin,
                &format!(
                    "{} labels for {} training points",
                    data.labels.len(),
                    data.embeddings.len()
                ),
            ));
        }
        if let Some(row) = data.embeddings.iter().position(|r| r.len() != NUM_FEATURES) {
            return Err(errors::models_unavailable(
                origin,
                &format!(
                    "training point {} has {} values, expected {}",
                    row,
                    data.embeddings[row].len(),
                    NUM_FEATURES
                ),
            ));
        }
        if data.embeddings.iter().flatten().any(|v| !v.is_finite()) {
            return Err(errors::models_unavailable(
                origin,
                "training points contain non-finite values",
            ));
        }

        let n = data.embeddings.len();
        let flat: Vec<f64> = data.embeddings.into_iter().flatten().collect();
        let embeddings = Array2::from_shape_vec((n, NUM_FEATURES), flat).map_err(|e| {
            errors::models_unavailable(origin, &format!("Failed to restore embeddings: {}", e))
        })?;

        let mut classifier = Self::new(data.k);
        classifier.embeddings = Some(embeddings);
        classifier.labels = data.labels;
        classifier.trained = true;
        Ok(classifier)
    }
}
