//! Per-model contribution audit

use serde::Serialize;

use crate::models::{EnsembleResult, ModelId, ModelSpec};

/// Label of the synthetic row carrying the aggregate
pub const FINAL_ROW_LABEL: &str = "FINAL SCORE";

/// One line of the contribution breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownRow {
    /// `None` for the final aggregate row
    pub model: Option<ModelId>,
    pub label: String,
    /// `None` for the final aggregate row
    pub raw_score: Option<f64>,
    pub weight: f64,
    pub weighted_impact: f64,
    /// Share of the weighted total in percent; `None` when the total is zero
    pub contribution_pct: Option<f64>,
}

impl BreakdownRow {
    pub fn is_final(&self) -> bool {
        self.model.is_none()
    }
}

/// Build the breakdown: one row per active model, then the final row.
///
/// A zero weighted total is a legitimate outcome, so model contributions
/// are reported as undefined instead of dividing by zero.
pub fn breakdown(result: &EnsembleResult) -> Vec<BreakdownRow> {
    let total = result.weighted_total;
    let mut rows: Vec<BreakdownRow> = result
        .per_model
        .values()
        .map(|r| {
            let weight = ModelSpec::for_id(r.model_id).weight;
            let weighted_impact = r.score * weight;
            BreakdownRow {
                model: Some(r.model_id),
                label: r.model_id.display_name().to_string(),
                raw_score: Some(r.score),
                weight,
                weighted_impact,
                contribution_pct: (total != 0.0).then(|| weighted_impact / total * 100.0),
            }
        })
        .collect();

    rows.push(BreakdownRow {
        model: None,
        label: FINAL_ROW_LABEL.to_string(),
        raw_score: None,
        weight: 1.0,
        weighted_impact: total,
        contribution_pct: Some(100.0),
    });

    rows
}
