//! JSON reporter
//!
//! Outputs the full PredictionReport as pretty-printed JSON at full
//! precision. Useful for piping to jq or feeding a dashboard.

use crate::pipeline::PredictionReport;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &PredictionReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
