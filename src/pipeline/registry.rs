//! Loaded model handles

use indexmap::IndexMap;
use tracing::info;

use crate::config::ModelsConfig;
use crate::error::{QcoError, QcoResult};
use crate::models::{ModelId, ModelSpec};
use crate::predictor::{load_predictor, Predictor};

/// The predictors available to the pipeline, keyed by model.
///
/// Built once at startup and shared read-only. Tests build one by hand with
/// deterministic stand-ins instead of loading files.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    predictors: IndexMap<ModelId, Predictor>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a predictor, checking its kind against the model catalogue
    pub fn insert(&mut self, id: ModelId, predictor: Predictor) -> QcoResult<()> {
        let expected = ModelSpec::for_id(id).kind;
        if predictor.kind() != expected {
            return Err(QcoError::InvalidInput(format!(
                "{} must be a {}, got a {}",
                id,
                expected,
                predictor.kind()
            )));
        }
        self.predictors.insert(id, predictor);
        Ok(())
    }

    /// Builder form of `insert`
    pub fn with(mut self, id: ModelId, predictor: Predictor) -> QcoResult<Self> {
        self.insert(id, predictor)?;
        Ok(self)
    }

    /// Load the persisted models for `ids` from the configured locations
    pub fn load(config: &ModelsConfig, ids: &[ModelId]) -> QcoResult<Self> {
        let mut registry = Self::new();
        for spec in ModelSpec::all().iter().filter(|s| ids.contains(&s.id)) {
            let path = config.path_for(spec.id);
            let predictor = load_predictor(spec, &path)?;
            registry.insert(spec.id, predictor)?;
        }
        info!("Loaded {} model(s)", registry.len());
        Ok(registry)
    }

    pub fn get(&self, id: ModelId) -> Option<&Predictor> {
        self.predictors.get(&id)
    }

    pub fn contains(&self, id: ModelId) -> bool {
        self.predictors.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.predictors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictors.is_empty()
    }
}
