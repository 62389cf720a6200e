//! Prediction pipeline
//!
//! Orchestrates one request end to end:
//! 1. Validate the model selection and key
//! 2. Resolve the record from the current dataset snapshot
//! 3. Assemble one feature vector per active model
//! 4. Score every active model (in parallel, they are independent)
//! 5. Aggregate, classify the tier and build the contribution breakdown
//!
//! Nothing is returned on failure: either the whole report or one error.

mod registry;

pub use registry::ModelRegistry;

use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::dataset::{resolve, DatasetHandle};
use crate::ensemble::{aggregate, breakdown, BreakdownRow};
use crate::error::{QcoError, QcoResult};
use crate::features::{assemble, incomplete_activities};
use crate::models::{
    EnsembleResult, FeatureVector, FieldValue, ModelId, ModelKind, ModelSpec, PredictionResult,
};

/// Prediction pipeline over a shared model registry and dataset snapshot.
pub struct Pipeline {
    models: Arc<ModelRegistry>,
    dataset: Arc<DatasetHandle>,
}

impl Pipeline {
    pub fn new(models: Arc<ModelRegistry>, dataset: Arc<DatasetHandle>) -> Self {
        Self { models, dataset }
    }

    /// Dataset handle, for swapping in a new upload
    pub fn dataset(&self) -> &DatasetHandle {
        &self.dataset
    }

    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    /// Score one (module, style) pair with the selected models.
    pub fn predict(&self, module: &str, style: &str, active: &[ModelId]) -> QcoResult<EnsembleResult> {
        self.run(module, style, active).map(|report| report.ensemble)
    }

    /// Like `predict`, but keeps the inputs and breakdown for reporting.
    pub fn run(&self, module: &str, style: &str, active: &[ModelId]) -> QcoResult<PredictionReport> {
        let specs: Vec<&'static ModelSpec> = ModelSpec::all()
            .iter()
            .filter(|s| active.contains(&s.id))
            .collect();
        if specs.is_empty() {
            return Err(QcoError::InvalidInput(
                "please select at least one model".to_string(),
            ));
        }

        let predictors = specs
            .iter()
            .map(|spec| {
                self.models.get(spec.id).ok_or_else(|| {
                    QcoError::InvalidInput(format!("{} model is not loaded", spec.id))
                })
            })
            .collect::<QcoResult<Vec<_>>>()?;

        let (version, dataset) = self.dataset.versioned().ok_or_else(|| {
            QcoError::InvalidInput("please upload a dataset first".to_string())
        })?;
        let record = resolve(&dataset, module, style)?;

        let features = specs
            .iter()
            .map(|spec| assemble(record, spec))
            .collect::<QcoResult<Vec<FeatureVector>>>()?;

        debug!(
            "Scoring {} model(s) for module '{}' style '{}' (dataset v{})",
            specs.len(),
            record.module(),
            record.style(),
            version
        );

        // Collect every outcome first so the reported failure is the first
        // one in catalogue order, not whichever thread finished first.
        let outcomes: Vec<QcoResult<PredictionResult>> = predictors
            .par_iter()
            .zip(features.par_iter())
            .map(|(predictor, fv)| predictor.score(fv))
            .collect();
        let results = outcomes.into_iter().collect::<QcoResult<Vec<_>>>()?;

        let active_results: Vec<(&ModelSpec, PredictionResult)> =
            specs.iter().copied().zip(results).collect();
        let ensemble = aggregate(&active_results)?;
        let rows = breakdown(&ensemble);

        let inputs = specs
            .iter()
            .zip(&features)
            .map(|(spec, fv)| ModelInputs::new(spec, fv))
            .collect();

        Ok(PredictionReport {
            module: record.module().to_string(),
            style: record.style().to_string(),
            dataset_version: version,
            ensemble,
            inputs,
            breakdown: rows,
        })
    }
}

/// One named input value as fed to a model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureEntry {
    pub name: String,
    pub value: FieldValue,
}

/// What one model was given
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInputs {
    pub model: ModelId,
    pub kind: ModelKind,
    pub weight: f64,
    pub features: Vec<FeatureEntry>,
    /// Checklist items with a zero value (regressor only)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub incomplete_activities: Vec<String>,
}

impl ModelInputs {
    fn new(spec: &ModelSpec, fv: &FeatureVector) -> Self {
        let incomplete = match spec.kind {
            ModelKind::Regressor => incomplete_activities(fv)
                .into_iter()
                .map(str::to_string)
                .collect(),
            ModelKind::Classifier => Vec::new(),
        };
        Self {
            model: spec.id,
            kind: spec.kind,
            weight: spec.weight,
            features: fv
                .iter()
                .map(|(name, value)| FeatureEntry {
                    name: name.to_string(),
                    value: value.clone(),
                })
                .collect(),
            incomplete_activities: incomplete,
        }
    }
}

/// Everything a reporter needs to present one prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    pub module: String,
    pub style: String,
    pub dataset_version: u64,
    pub ensemble: EnsembleResult,
    pub inputs: Vec<ModelInputs>,
    pub breakdown: Vec<BreakdownRow>,
}
