//! Unified error types for the Iris binding library

use thiserror::Error;

/// Unified error type for the library
#[derive(Debug, Error)]
pub enum IrisError {
    /// A model artifact is missing, unreadable or structurally invalid
    #[error("Model artifact unavailable at '{path}': {reason}")]
    ModelsUnavailable { path: String, reason: String },

    /// Caller supplied input the classifier cannot accept
    #[error("Invalid input for '{field}': expected {expected}, got {actual}")]
    InvalidInput {
        field: String,
        expected: String,
        actual: String,
    },

    /// Classifier produced a label outside the known species set
    #[error("Unknown species label '{label}'")]
    UnknownSpecies { label: String },

    /// Nearest-neighbor search failed
    #[error("Inference error during '{operation}': {reason}")]
    Inference { operation: String, reason: String },
}

impl IrisError {
    /// Short machine-readable kind, stable across releases
    pub fn kind(&self) -> &'static str {
        match self {
            IrisError::ModelsUnavailable { .. } => "models_unavailable",
            IrisError::InvalidInput { .. } => "invalid_input",
            IrisError::UnknownSpecies { .. } => "unknown_species",
            IrisError::Inference { .. } => "inference",
        }
    }
}

/// Result type alias using IrisError
pub type IrisResult<T> = Result<T, IrisError>;

/// Helper functions for creating errors
pub mod errors {
    use super::IrisError;

    pub fn models_unavailable(path: &str, reason: &str) -> IrisError {
        IrisError::ModelsUnavailable {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_input(field: &str, expected: &str, actual: &str) -> IrisError {
        IrisError::InvalidInput {
            field: field.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub fn unknown_species(label: &str) -> IrisError {
        IrisError::UnknownSpecies {
            label: label.to_string(),
        }
    }

    pub fn inference_error(operation: &str, reason: &str) -> IrisError {
        IrisError::Inference {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }
}
