//! Error taxonomy for the prediction pipeline
//!
//! Every failure is local to one request. Nothing here is retried and no
//! variant leaves the shared dataset snapshot or loaded models in a
//! different state than before the request.

use thiserror::Error;

use crate::models::ModelId;

/// Errors raised while resolving, assembling, scoring or loading
#[derive(Error, Debug)]
pub enum QcoError {
    /// User-correctable input problem, reported before any model runs
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No matching record found for module '{module}' and style '{style}'")]
    RecordNotFound { module: String, style: String },

    #[error("{model} is missing required field(s): {}", fields.join(", "))]
    MissingFeature { model: ModelId, fields: Vec<String> },

    #[error("{model} prediction failed: {message}")]
    PredictorFailure { model: ModelId, message: String },

    #[error("Failed to load {model} model from {path}: {message}")]
    ModelLoad {
        model: ModelId,
        path: String,
        message: String,
    },

    #[error("Invalid dataset: {0}")]
    Dataset(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QcoError {
    /// Whether the caller can fix this by changing their input
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            QcoError::InvalidInput(_) | QcoError::RecordNotFound { .. }
        )
    }
}

pub type QcoResult<T> = Result<T, QcoError>;
