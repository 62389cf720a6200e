//! Core data models for qco
//!
//! These types flow through the whole pipeline: dataset records come in,
//! feature vectors are cut from them per model, each model produces a
//! prediction, and the ensemble result is what gets reported.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Dataset values
// ---------------------------------------------------------------------------

/// A single cell of the uploaded dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric view of the value, if it has one.
    ///
    /// Booleans map to 1/0 and text is parsed after trimming.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Null => None,
            FieldValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "-"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One row of the dataset, identified by its normalized (module, style) key.
///
/// Field values are kept exactly as loaded, in column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetRecord {
    module: String,
    style: String,
    fields: IndexMap<String, FieldValue>,
}

impl DatasetRecord {
    pub(crate) fn new(module: String, style: String, fields: IndexMap<String, FieldValue>) -> Self {
        Self {
            module,
            style,
            fields,
        }
    }

    /// Normalized module key
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Normalized style key
    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &IndexMap<String, FieldValue> {
        &self.fields
    }
}

// ---------------------------------------------------------------------------
// Model descriptors
// ---------------------------------------------------------------------------

/// Identifier of one of the three fixed models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelId {
    Historia,
    CriticalPath,
    Talento,
}

impl ModelId {
    pub const ALL: [ModelId; 3] = [ModelId::Historia, ModelId::CriticalPath, ModelId::Talento];

    /// Human-readable name used in reports
    pub fn display_name(&self) -> &'static str {
        match self {
            ModelId::Historia => "Historia",
            ModelId::CriticalPath => "Critical Path",
            ModelId::Talento => "Talento",
        }
    }

    /// Command-line / config slug
    pub fn slug(&self) -> &'static str {
        match self {
            ModelId::Historia => "historia",
            ModelId::CriticalPath => "critical-path",
            ModelId::Talento => "talento",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ModelId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "historia" => Ok(ModelId::Historia),
            "critical-path" | "criticalpath" => Ok(ModelId::CriticalPath),
            "talento" => Ok(ModelId::Talento),
            _ => Err(format!(
                "Unknown model '{}'. Valid models: historia, critical-path, talento",
                s
            )),
        }
    }
}

/// How a model's raw output becomes a 0-100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Produces a positive-class probability in [0, 1]
    Classifier,
    /// Produces a value already on the 0-100 scale
    Regressor,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Classifier => write!(f, "classifier"),
            ModelKind::Regressor => write!(f, "regressor"),
        }
    }
}

/// Static descriptor of one model: kind, training-time feature order, weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelSpec {
    pub id: ModelId,
    pub kind: ModelKind,
    pub required_features: &'static [&'static str],
    pub weight: f64,
}

pub const HISTORIA_FEATURES: &[&str] = &[
    "Priority",
    "Tier",
    "Module Repeatability",
    "Efficiency",
    "Module Achievement",
];

pub const CRITICAL_PATH_FEATURES: &[&str] = &[
    "Do-ability  Sample complete by Technician",
    "Focus training Plan with 4Ms,Focus Training 70% TM Count",
    "Team Member Allocation for Layout",
    "Floater allocation for QCO",
    "Critical /M/C Pre-setup(done by Mech, check by GL, check by QC)",
    "M/C, Layout and space allocation on time for QCO",
    "Feeding Plan Ready",
    "STW Sheet Handover On time",
    "Standard video sharing",
    "Cut-Kit received by 4.30 pm/Checked cut Panels with  Patterns",
    "Mechanic on time attend  - 7.30am,M/C Setting start on time - 7.30am,GL attend on time - 7.30am",
    "Sample Done By GL on plan time",
    "TM Training Start on plan time,TM training complete with mockups",
    "All operation's  mockups Verify by QC",
    "All Work Place Arranged & defined",
    "One Hour Production",
    "1st 10 PCS Review ",
    "Yamazumi Done by IE ",
    "TM's 70% potential Efficiency Availability",
    "Changeover Quality FTT",
    "Module Machine movement on time",
];

pub const TALENTO_FEATURES: &[&str] = &["Priority", "Skill"];

/// The three fixed model specs, in reporting order.
///
/// Weights are not renormalized when only some models are selected.
pub const MODEL_SPECS: [ModelSpec; 3] = [
    ModelSpec {
        id: ModelId::Historia,
        kind: ModelKind::Classifier,
        required_features: HISTORIA_FEATURES,
        weight: 0.30,
    },
    ModelSpec {
        id: ModelId::CriticalPath,
        kind: ModelKind::Regressor,
        required_features: CRITICAL_PATH_FEATURES,
        weight: 0.60,
    },
    ModelSpec {
        id: ModelId::Talento,
        kind: ModelKind::Classifier,
        required_features: TALENTO_FEATURES,
        weight: 0.10,
    },
];

impl ModelSpec {
    pub fn all() -> &'static [ModelSpec] {
        &MODEL_SPECS
    }

    pub fn for_id(id: ModelId) -> &'static ModelSpec {
        match id {
            ModelId::Historia => &MODEL_SPECS[0],
            ModelId::CriticalPath => &MODEL_SPECS[1],
            ModelId::Talento => &MODEL_SPECS[2],
        }
    }
}

// ---------------------------------------------------------------------------
// Per-request values
// ---------------------------------------------------------------------------

/// Raw values cut from one record, in the model's training-time order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    pub model: ModelId,
    pub names: &'static [&'static str],
    pub values: Vec<FieldValue>,
}

impl FeatureVector {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// (feature name, value) pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> + '_ {
        self.names.iter().copied().zip(self.values.iter())
    }
}

/// Score of one model on the 0-100 scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub model_id: ModelId,
    pub score: f64,
}

/// Discrete recommendation band of the weighted total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    HighConfidence,
    Monitor,
    ModerateRisk,
    HighRisk,
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Tier::HighConfidence => "high confidence",
            Tier::Monitor => "monitor",
            Tier::ModerateRisk => "moderate risk",
            Tier::HighRisk => "high risk",
        }
    }

    /// Guidance shown next to the final score
    pub fn recommendation(&self) -> &'static str {
        match self {
            Tier::HighConfidence => "High probability of success - Proceed with confidence",
            Tier::Monitor => "Good probability - Monitor key factors",
            Tier::ModerateRisk => "Moderate risk - Address critical gaps",
            Tier::HighRisk => "High risk - Focus more on the gaps",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Colour band a single score falls into when displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Low,
    Medium,
    High,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s < 50.0 => ScoreBand::Low,
            s if s < 75.0 => ScoreBand::Medium,
            _ => ScoreBand::High,
        }
    }
}

/// Combined outcome of one prediction request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnsembleResult {
    /// Active models' results, in catalogue order
    pub per_model: IndexMap<ModelId, PredictionResult>,
    pub weighted_total: f64,
    pub unweighted_average: f64,
    pub tier: Tier,
}
