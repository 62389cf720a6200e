//! Predictor adapters
//!
//! The three models come in two flavours: classifiers that report a
//! positive-class probability and a regressor that reports a percentage
//! directly. `Predictor` wraps either behind one `score` entry point so the
//! engine never has to care which kind it is talking to.
//!
//! Model handles are long-lived, created once at startup and shared
//! read-only across requests, so both capabilities require `Send + Sync`.

mod gbdt_model;

pub use gbdt_model::GbdtModel;

use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::error::{QcoError, QcoResult};
use crate::models::{FeatureVector, ModelKind, ModelSpec, PredictionResult};

/// A model that outputs the probability of the positive class in [0, 1]
pub trait Classify: Send + Sync {
    fn classify(&self, features: &FeatureVector) -> Result<f64, String>;
}

/// A model that outputs a value already on the 0-100 scale
pub trait Estimate: Send + Sync {
    fn estimate(&self, features: &FeatureVector) -> Result<f64, String>;
}

/// Tagged predictor handle
#[derive(Clone)]
pub enum Predictor {
    Classifier(Arc<dyn Classify>),
    Regressor(Arc<dyn Estimate>),
}

impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Predictor::{:?}", self.kind())
    }
}

impl Predictor {
    pub fn classifier(model: impl Classify + 'static) -> Self {
        Predictor::Classifier(Arc::new(model))
    }

    pub fn regressor(model: impl Estimate + 'static) -> Self {
        Predictor::Regressor(Arc::new(model))
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Predictor::Classifier(_) => ModelKind::Classifier,
            Predictor::Regressor(_) => ModelKind::Regressor,
        }
    }

    /// Run the model once and map its output to a 0-100 score.
    ///
    /// Classifier probabilities are multiplied by 100. Regressor output is
    /// passed through without clamping. A non-finite output is treated as a
    /// predictor failure.
    pub fn score(&self, features: &FeatureVector) -> QcoResult<PredictionResult> {
        let model = features.model;
        let raw = match self {
            Predictor::Classifier(m) => m.classify(features).map(|p| p * 100.0),
            Predictor::Regressor(m) => m.estimate(features),
        }
        .map_err(|message| QcoError::PredictorFailure { model, message })?;

        if !raw.is_finite() {
            return Err(QcoError::PredictorFailure {
                model,
                message: format!("model returned a non-finite value ({raw})"),
            });
        }

        debug!("{} scored {:.3}", model, raw);
        Ok(PredictionResult {
            model_id: model,
            score: raw,
        })
    }
}

/// Load the persisted model for `spec` and wrap it according to its kind.
///
/// The file must take exactly `spec.required_features`; anything else is a
/// `ModelLoad` error here rather than a failure on first use.
pub fn load_predictor(spec: &ModelSpec, path: &Path) -> QcoResult<Predictor> {
    let model = GbdtModel::load(path, spec.required_features.len()).map_err(|message| {
        QcoError::ModelLoad {
            model: spec.id,
            path: path.display().to_string(),
            message,
        }
    })?;
    debug!("Loaded {} {} from {}", spec.id, spec.kind, path.display());
    Ok(match spec.kind {
        ModelKind::Classifier => Predictor::classifier(model),
        ModelKind::Regressor => Predictor::regressor(model),
    })
}
