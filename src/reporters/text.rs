//! Text (terminal) reporter with colors and formatting

use super::{band_marker, format_pct, inputs_heading, tier_marker, RenderOptions};
use crate::models::{ScoreBand, Tier};
use crate::pipeline::PredictionReport;
use anyhow::Result;

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

fn band_color(score: f64) -> &'static str {
    match ScoreBand::from_score(score) {
        ScoreBand::Low => "\x1b[31m",    // Red
        ScoreBand::Medium => "\x1b[33m", // Yellow
        ScoreBand::High => "\x1b[32m",   // Green
    }
}

fn tier_color(tier: Tier) -> &'static str {
    match tier {
        Tier::HighConfidence => "\x1b[32m",
        Tier::Monitor => "\x1b[92m",
        Tier::ModerateRisk => "\x1b[33m",
        Tier::HighRisk => "\x1b[31m",
    }
}

/// ANSI codes that collapse to nothing when color is off
struct Palette {
    on: bool,
}

impl Palette {
    fn paint(&self, code: &'static str) -> &'static str {
        if self.on {
            code
        } else {
            ""
        }
    }
}

/// Render report as formatted terminal output
pub fn render(report: &PredictionReport, options: RenderOptions) -> Result<String> {
    let p = Palette { on: options.color };
    let (bold, dim, reset) = (p.paint(BOLD), p.paint(DIM), p.paint(RESET));
    let ensemble = &report.ensemble;
    let mut out = String::new();

    // Header
    out.push_str(&format!("\n{bold}QCO Completion Prediction{reset}\n"));
    out.push_str(&format!(
        "{dim}──────────────────────────────────────{reset}\n"
    ));
    out.push_str(&format!(
        "Module: {bold}{}{reset}  Style: {bold}{}{reset}  {dim}(dataset v{}){reset}\n\n",
        report.module, report.style, report.dataset_version
    ));

    // Per-model scores
    out.push_str(&format!("{bold}MODEL SCORES{reset}\n"));
    for result in ensemble.per_model.values() {
        let c = p.paint(band_color(result.score));
        out.push_str(&format!(
            "  {:<14} {}{c}{:>6.1}%{reset}\n",
            result.model_id.display_name(),
            band_marker(result.score, options.emoji),
            result.score
        ));
    }
    out.push('\n');

    // Final score and tier
    let tc = p.paint(tier_color(ensemble.tier));
    out.push_str(&format!(
        "{bold}FINAL SCORE{reset}  {tc}{bold}{:.1}%{reset}  {} {tc}{}{reset}\n",
        ensemble.weighted_total,
        tier_marker(ensemble.tier, options.emoji),
        ensemble.tier.label()
    ));
    out.push_str(&format!("  {}\n", ensemble.tier.recommendation()));
    out.push_str(&format!(
        "  {dim}Weighted {:.1}% vs theoretical max {:.1}% (unweighted average){reset}\n\n",
        ensemble.weighted_total, ensemble.unweighted_average
    ));

    // Breakdown table
    out.push_str(&format!("{bold}CONTRIBUTION BREAKDOWN{reset}\n"));
    out.push_str(&format!(
        "{dim}  {:<14} {:>8} {:>8} {:>9} {:>13}{reset}\n",
        "MODEL", "RAW", "WEIGHT", "IMPACT", "CONTRIBUTION"
    ));
    out.push_str(&format!(
        "{dim}  ──────────────────────────────────────────────────────{reset}\n"
    ));
    for row in &report.breakdown {
        let raw = row
            .raw_score
            .map(|s| format!("{:.1}%", s))
            .unwrap_or_else(|| "-".to_string());
        let line = format!(
            "  {:<14} {:>8} {:>7.0}% {:>9.1} {:>13}",
            row.label,
            raw,
            row.weight * 100.0,
            row.weighted_impact,
            format_pct(row.contribution_pct)
        );
        if row.is_final() {
            out.push_str(&format!("{bold}{line}{reset}\n"));
        } else {
            out.push_str(&format!("{line}\n"));
        }
    }

    // What each model was fed
    for inputs in &report.inputs {
        out.push_str(&format!(
            "\n{bold}{}{reset} {dim}({}){reset}\n",
            inputs_heading(inputs.model).to_uppercase(),
            inputs.model
        ));
        for entry in &inputs.features {
            out.push_str(&format!("  {:<48} {}\n", entry.name.trim(), entry.value));
        }
    }

    // Critical-path gaps
    for inputs in report.inputs.iter().filter(|i| !i.incomplete_activities.is_empty()) {
        out.push_str(&format!(
            "\n{bold}INCOMPLETE ACTIVITIES{reset} {dim}({}, {} of {}){reset}\n",
            inputs.model,
            inputs.incomplete_activities.len(),
            inputs.features.len()
        ));
        for activity in &inputs.incomplete_activities {
            out.push_str(&format!("  - {}\n", activity.trim()));
        }
    }

    Ok(out)
}
