//! Output reporters for qco prediction results
//!
//! Supports multiple output formats:
//! - `text` - Terminal output with colors and emoji
//! - `json` - Machine-readable JSON, full precision
//! - `markdown` - GitHub-flavored Markdown

mod json;
mod markdown;
mod text;

use crate::models::{ModelId, ScoreBand, Tier};
use crate::pipeline::PredictionReport;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Presentation switches shared by the human-readable formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub emoji: bool,
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            emoji: true,
            color: true,
        }
    }
}

/// Render a prediction report using an OutputFormat enum
pub fn report_with_format(
    report: &PredictionReport,
    format: OutputFormat,
    options: RenderOptions,
) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report, options),
        OutputFormat::Json => json::render(report),
        OutputFormat::Markdown => markdown::render(report, options),
    }
}

/// Tier marker for the human-readable formats
fn tier_marker(tier: Tier, emoji: bool) -> &'static str {
    match (tier, emoji) {
        (Tier::HighConfidence, true) => "🟢",
        (Tier::Monitor, true) => "🟡",
        (Tier::ModerateRisk, true) => "🟠",
        (Tier::HighRisk, true) => "🔴",
        (Tier::HighConfidence, false) => "[OK]",
        (Tier::Monitor, false) => "[~]",
        (Tier::ModerateRisk, false) => "[!]",
        (Tier::HighRisk, false) => "[X]",
    }
}

fn band_marker(score: f64, emoji: bool) -> &'static str {
    if !emoji {
        return "";
    }
    match ScoreBand::from_score(score) {
        ScoreBand::Low => "🔴 ",
        ScoreBand::Medium => "🟡 ",
        ScoreBand::High => "🟢 ",
    }
}

/// Heading for a model's input list
fn inputs_heading(model: ModelId) -> &'static str {
    match model {
        ModelId::Talento => "Team Factors",
        ModelId::Historia | ModelId::CriticalPath => "Key Input Parameters",
    }
}

/// "n/a" when a contribution share is undefined
fn format_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v),
        None => "n/a".to_string(),
    }
}
