//! Engine Errors
//!
//! One error type for the whole decision engine. The rule engine never
//! produces one of these: a malformed observation takes the labeling
//! fallback path instead.

use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    /// No trained classifier is installed in the handle
    #[error("Model not available")]
    ModelUnavailable,

    /// Request payload could not be turned into an observation
    #[error("{0}")]
    InvalidInput(String),

    /// Feature vector was built against a different layout than the model's
    #[error("Feature layout mismatch: expected {expected:08x}, got {actual:08x}")]
    LayoutMismatch { expected: u32, actual: u32 },

    /// Dataset is unusable for training
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Not enough rows/classes for the requested fit or evaluation
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Persisted artifacts are inconsistent with each other
    #[error("Artifact error: {0}")]
    Artifact(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    pub fn is_model_unavailable(&self) -> bool {
        matches!(self, EngineError::ModelUnavailable)
    }
}
