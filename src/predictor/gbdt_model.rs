//! GBDT-backed model handles
//!
//! Wraps the `gbdt` crate to provide:
//! - Model loading from the gbdt-rs native JSON format (what `GBDT::save_model` writes)
//! - Shape validation against the model's feature list before first use
//! - Single-row inference from a `FeatureVector`
//!
//! Classifiers are expected to be trained with the `LogLikelyhood` loss so
//! that `predict` yields a probability. The regressor is expected to output a
//! 0-100 percentage.
//!
//! The gbdt crate asserts on malformed input (a row shorter than the feature
//! indices its trees split on, or a tree count that disagrees with the
//! configured iterations). Both are checked here so a bad model file turns
//! into an error instead of a panic.
//!
//! Note: the gbdt crate works in `f32` (`ValueType`) while scores are `f64`.
//! Conversions happen at this boundary, together with the numeric coercion
//! of raw dataset values.

use std::path::Path;

use gbdt::decision_tree::Data;
use gbdt::gradient_boost::GBDT;
use serde_json::Value;

use super::{Classify, Estimate};
use crate::models::FeatureVector;

// ---------------------------------------------------------------------------
// FeatureVector -> f32 helpers
// ---------------------------------------------------------------------------

/// Coerce every raw value to `f32`, naming the first field that can't be.
fn features_to_f32(features: &FeatureVector) -> Result<Vec<f32>, String> {
    features
        .iter()
        .map(|(name, value)| {
            value
                .as_f64()
                .map(|v| v as f32)
                .ok_or_else(|| format!("feature '{}' is not numeric (got '{}')", name, value))
        })
        .collect()
}

/// Check the serialized model against the expected feature count.
///
/// Reads `conf.feature_size`, `conf.iterations` and the tree list straight
/// from the JSON so nothing reaches `GBDT::predict` in a shape it asserts on.
fn check_shape(raw: &Value, expected_features: usize) -> Result<(), String> {
    let conf = raw
        .get("conf")
        .ok_or_else(|| "not a gbdt model: missing 'conf'".to_string())?;
    let feature_size = conf
        .get("feature_size")
        .and_then(Value::as_u64)
        .ok_or_else(|| "not a gbdt model: missing 'conf.feature_size'".to_string())?;
    if feature_size as usize != expected_features {
        return Err(format!(
            "model was trained on {} features, expected {}",
            feature_size, expected_features
        ));
    }

    let iterations = conf
        .get("iterations")
        .and_then(Value::as_u64)
        .ok_or_else(|| "not a gbdt model: missing 'conf.iterations'".to_string())?;
    let trees = raw
        .get("trees")
        .and_then(Value::as_array)
        .map(Vec::len)
        .ok_or_else(|| "not a gbdt model: missing 'trees'".to_string())?;
    if trees as u64 != iterations {
        return Err(format!(
            "model has {} trees but is configured for {} iterations",
            trees, iterations
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Model wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around `gbdt::gradient_boost::GBDT`
pub struct GbdtModel {
    model: GBDT,
    feature_size: usize,
}

impl GbdtModel {
    /// Load a model from disk, rejecting it unless it takes `expected_features` inputs.
    pub fn load(path: &Path, expected_features: usize) -> Result<Self, String> {
        if !path.exists() {
            return Err("model file not found".to_string());
        }
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read model file: {e}"))?;
        Self::from_json(&json, expected_features)
    }

    /// Parse and validate a model from gbdt-rs JSON
    pub fn from_json(json: &str, expected_features: usize) -> Result<Self, String> {
        let raw: Value =
            serde_json::from_str(json).map_err(|e| format!("failed to parse GBDT JSON: {e}"))?;
        check_shape(&raw, expected_features)?;
        let model: GBDT =
            serde_json::from_value(raw).map_err(|e| format!("failed to parse GBDT JSON: {e}"))?;
        Ok(Self {
            model,
            feature_size: expected_features,
        })
    }

    fn predict_one(&self, features: &FeatureVector) -> Result<f64, String> {
        let row = features_to_f32(features)?;
        if row.len() != self.feature_size {
            return Err(format!(
                "got {} features, model takes {}",
                row.len(),
                self.feature_size
            ));
        }
        let data = vec![Data::new_test_data(row, None)];
        self.model
            .predict(&data)
            .first()
            .map(|&v| v as f64)
            .ok_or_else(|| "model produced no output".to_string())
    }
}

impl Classify for GbdtModel {
    fn classify(&self, features: &FeatureVector) -> Result<f64, String> {
        self.predict_one(features)
    }
}

impl Estimate for GbdtModel {
    fn estimate(&self, features: &FeatureVector) -> Result<f64, String> {
        self.predict_one(features)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
