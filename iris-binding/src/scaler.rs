//! Standard scaler inference
//!
//! Inference-only: the mean and scale vectors were fitted offline and are
//! loaded from JSON. Each feature is standardized as `(x - mean) / scale`.

use crate::core::unified_error::{errors, IrisResult};
use crate::features::{check_feature_order, FeatureVector, NUM_FEATURES};
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// Scaler data for JSON serialization
#[derive(Debug, Serialize, Deserialize)]
pub struct ScalerData {
    pub algorithm: String,
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// A feature vector after standardization.
///
/// Only the scaler constructs these.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledVector(Array1<f64>);

impl ScaledVector {
    pub fn view(&self) -> ArrayView1<'_, f64> {
        self.0.view()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }
}

/// Fitted per-feature standardization
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Load a fitted scaler from JSON.
    ///
    /// `origin` names the artifact in error messages.
    pub fn from_json(json: &str, origin: &str) -> IrisResult<Self> {
        let data: ScalerData = serde_json::from_str(json)
            .map_err(|e| errors::models_unavailable(origin, &format!("JSON parse failed: {}", e)))?;

        if data.algorithm != "standard_scaler" {
            return Err(errors::models_unavailable(
                origin,
                &format!("expected algorithm 'standard_scaler', got '{}'", data.algorithm),
            ));
        }
        check_feature_order(&data.feature_names, origin)?;
        if data.mean.len() != NUM_FEATURES || data.scale.len() != NUM_FEATURES {
            return Err(errors::models_unavailable(
                origin,
                &format!(
                    "expected {} mean/scale values, got {}/{}",
                    NUM_FEATURES,
                    data.mean.len(),
                    data.scale.len()
                ),
            ));
        }
        if data.mean.iter().any(|m| !m.is_finite()) {
            return Err(errors::models_unavailable(origin, "mean contains non-finite values"));
        }
        // Scale must be strictly positive so transform never divides by zero
        if data.scale.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(errors::models_unavailable(
                origin,
                "scale values must be finite and positive",
            ));
        }

        Ok(Self {
            mean: Array1::from_vec(data.mean),
            scale: Array1::from_vec(data.scale),
        })
    }

    /// Standardize a feature vector
    pub fn transform(&self, vector: &FeatureVector) -> ScaledVector {
        let x = Array1::from_vec(vector.to_array().to_vec());
        ScaledVector((x - &self.mean) / &self.scale)
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn mean(&self) -> &[f64] {
        self.mean.as_slice().unwrap_or(&[])
    }

    pub fn scale(&self) -> &[f64] {
        self.scale.as_slice().unwrap_or(&[])
    }
}
