//! Iris species classifier binding
//!
//! Inference-only library serving a pre-trained Iris classifier.
//!
//! ## Architecture
//! - **Training**: done offline; the fitted parameters ship as two JSON artifacts
//!   (`knn_iris_model.json`, `scaler_iris.json`)
//! - **Inference**: a standard scaler followed by k-NN majority voting, using
//!   linfa-nn for Ball Tree lookups
//! - **Surfaces**: a Rust API (`PredictionService`) and a C ABI (`ffi`)
//!
//! The model store is loaded once and shared read-only; there is no global state.

pub mod core;
pub mod dataset;
pub mod features;
pub mod ffi;
pub mod knn;
pub mod scaler;
pub mod service;
pub mod species;
pub mod store;

// Re-exports for convenience
pub use crate::core::unified_error::{IrisError, IrisResult};
pub use dataset::{DatasetSummary, ModelCard};
pub use features::{input_form, Feature, FeatureBounds, FeatureVector, NUM_FEATURES};
pub use knn::{KNNClassifier, LabelVote};
pub use scaler::{ScaledVector, StandardScaler};
pub use service::{Prediction, PredictionService};
pub use species::{SpeciesCatalog, SpeciesInfo, SpeciesLabel};
pub use store::{ModelPaths, ModelStore, CLASSIFIER_ARTIFACT, SCALER_ARTIFACT};
