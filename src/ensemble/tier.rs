//! Recommendation tiers

use crate::models::Tier;

pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 85.0;
pub const MONITOR_THRESHOLD: f64 = 70.0;
pub const MODERATE_RISK_THRESHOLD: f64 = 50.0;

/// Map a weighted total to its tier.
///
/// Bands are closed on the lower bound and evaluated top-down.
pub fn classify_tier(weighted_total: f64) -> Tier {
    match weighted_total {
        s if s >= HIGH_CONFIDENCE_THRESHOLD => Tier::HighConfidence,
        s if s >= MONITOR_THRESHOLD => Tier::Monitor,
        s if s >= MODERATE_RISK_THRESHOLD => Tier::ModerateRisk,
        _ => Tier::HighRisk,
    }
}
