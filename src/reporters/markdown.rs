//! Markdown reporter for GitHub-flavored Markdown output
//!
//! Suitable for pasting a prediction into a changeover review ticket or
//! a pull request comment.

use super::{band_marker, format_pct, inputs_heading, tier_marker, RenderOptions};
use crate::pipeline::PredictionReport;
use anyhow::Result;

/// Render report as GitHub-flavored Markdown
pub fn render(report: &PredictionReport, options: RenderOptions) -> Result<String> {
    let mut md = String::new();

    md.push_str(&render_header(report, options));
    md.push('\n');

    md.push_str(&render_scores(report, options));
    md.push('\n');

    md.push_str(&render_breakdown(report));
    md.push('\n');

    md.push_str(&render_inputs(report));

    let gaps = render_gaps(report);
    if !gaps.is_empty() {
        md.push('\n');
        md.push_str(&gaps);
    }

    Ok(md)
}

fn render_header(report: &PredictionReport, options: RenderOptions) -> String {
    let ensemble = &report.ensemble;
    format!(
        "# QCO Completion Prediction\n\n\
         **Module:** `{}` | **Style:** `{}`\n\n\
         **Final score: {:.1}%** {} {}\n\n\
         > {}\n",
        report.module,
        report.style,
        ensemble.weighted_total,
        tier_marker(ensemble.tier, options.emoji),
        ensemble.tier.label(),
        ensemble.tier.recommendation()
    )
}

fn render_scores(report: &PredictionReport, options: RenderOptions) -> String {
    let mut md = String::from("## Model Scores\n\n| Model | Score |\n|-------|------:|\n");
    for result in report.ensemble.per_model.values() {
        md.push_str(&format!(
            "| {} | {}{:.1}% |\n",
            result.model_id.display_name(),
            band_marker(result.score, options.emoji),
            result.score
        ));
    }
    md.push_str(&format!(
        "\nUnweighted average (theoretical max): {:.1}%\n",
        report.ensemble.unweighted_average
    ));
    md
}

fn render_breakdown(report: &PredictionReport) -> String {
    let mut md = String::from(
        "## Contribution Breakdown\n\n\
         | Model | Raw | Weight | Impact | Contribution |\n\
         |-------|----:|-------:|-------:|-------------:|\n",
    );
    for row in &report.breakdown {
        let raw = row
            .raw_score
            .map(|s| format!("{:.1}%", s))
            .unwrap_or_else(|| "-".to_string());
        let label = if row.is_final() {
            format!("**{}**", row.label)
        } else {
            row.label.clone()
        };
        md.push_str(&format!(
            "| {} | {} | {:.0}% | {:.1} | {} |\n",
            label,
            raw,
            row.weight * 100.0,
            row.weighted_impact,
            format_pct(row.contribution_pct)
        ));
    }
    md
}

fn render_inputs(report: &PredictionReport) -> String {
    let mut md = String::new();
    for (i, inputs) in report.inputs.iter().enumerate() {
        if i > 0 {
            md.push('\n');
        }
        md.push_str(&format!(
            "## {} ({})\n\n| Feature | Value |\n|---------|------:|\n",
            inputs_heading(inputs.model),
            inputs.model
        ));
        for entry in &inputs.features {
            md.push_str(&format!("| {} | {} |\n", entry.name.trim(), entry.value));
        }
    }
    md
}

fn render_gaps(report: &PredictionReport) -> String {
    let mut md = String::new();
    for inputs in report.inputs.iter().filter(|i| !i.incomplete_activities.is_empty()) {
        md.push_str(&format!("## Incomplete Activities ({})\n\n", inputs.model));
        for activity in &inputs.incomplete_activities {
            md.push_str(&format!("- [ ] {}\n", activity.trim()));
        }
    }
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelId;
    use crate::reporters::tests::{test_report, test_report_with};

    #[test]
    fn test_markdown_render() {
        let md = render(&test_report(), RenderOptions::default()).unwrap();
        assert!(md.starts_with("# QCO Completion Prediction"));
        assert!(md.contains("**Final score: 69.0%** 🟠 moderate risk"));
        assert!(md.contains("| Critical Path | 🟡 60.0% |"));
        assert!(md.contains("| **FINAL SCORE** | - | 100% | 69.0 | 100.0% |"));
        assert!(md.contains("- [ ] Feeding Plan Ready"));
    }

    #[test]
    fn test_markdown_lists_model_inputs() {
        let md = render(&test_report(), RenderOptions::default()).unwrap();
        assert!(md.contains("## Key Input Parameters (Historia)"));
        assert!(md.contains("## Team Factors (Talento)"));
        assert!(md.contains("| Priority | 1 |"));
        assert!(md.contains("| Skill | 2 |"));
        assert!(md.contains("| Module Achievement | 5 |"));
    }

    #[test]
    fn test_markdown_without_regressor_has_no_gap_section() {
        let report = test_report_with(&[(ModelId::Historia, 90.0)]);
        let md = render(&report, RenderOptions::default()).unwrap();
        assert!(!md.contains("Incomplete Activities"));
        assert!(md.contains("| Historia | 90.0% | 30% | 27.0 | 100.0% |"));
    }
}
