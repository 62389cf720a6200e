//! Fixed-weight ensemble
//!
//! Blends the active models' 0-100 scores with their fixed catalogue weights.
//! This is a plain linear combination chosen by domain experts: weights are
//! applied as-is and never renormalized over the selected subset, so a
//! single-model selection caps the weighted total at that model's weight
//! times 100.

mod breakdown;
mod tier;

pub use breakdown::{breakdown, BreakdownRow, FINAL_ROW_LABEL};
pub use tier::classify_tier;

use indexmap::IndexMap;
use tracing::info;

use crate::error::{QcoError, QcoResult};
use crate::models::{EnsembleResult, ModelSpec, PredictionResult};

/// Combine per-model results into weighted and unweighted summaries.
///
/// Full precision is kept; rounding is left to presentation.
pub fn aggregate(active: &[(&ModelSpec, PredictionResult)]) -> QcoResult<EnsembleResult> {
    if active.is_empty() {
        return Err(QcoError::InvalidInput(
            "please select at least one model".to_string(),
        ));
    }

    let mut per_model = IndexMap::with_capacity(active.len());
    let mut weighted_total = 0.0;
    let mut score_sum = 0.0;

    for (spec, result) in active {
        weighted_total += result.score * spec.weight;
        score_sum += result.score;
        per_model.insert(spec.id, *result);
    }

    let unweighted_average = score_sum / active.len() as f64;
    let tier = classify_tier(weighted_total);

    info!(
        "Weighted total {:.3} (unweighted {:.3}) over {} model(s): {}",
        weighted_total,
        unweighted_average,
        active.len(),
        tier
    );

    Ok(EnsembleResult {
        per_model,
        weighted_total,
        unweighted_average,
        tier,
    })
}
