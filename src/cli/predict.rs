//! Predict command - score one changeover

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use super::dataset_path;
use crate::config::QcoConfig;
use crate::dataset::{Dataset, DatasetHandle};
use crate::models::ModelId;
use crate::pipeline::{ModelRegistry, Pipeline};
use crate::reporters::{self, OutputFormat, RenderOptions};

#[derive(Debug)]
pub struct PredictArgs {
    pub module: String,
    pub style: String,
    /// Empty means every model
    pub models: Vec<ModelId>,
    pub format: Option<String>,
    pub output: Option<PathBuf>,
    pub no_emoji: bool,
}

impl PredictArgs {
    fn active_models(&self) -> Vec<ModelId> {
        if self.models.is_empty() {
            ModelId::ALL.to_vec()
        } else {
            let mut ids = self.models.clone();
            ids.sort();
            ids.dedup();
            ids
        }
    }
}

pub fn run(config: &QcoConfig, args: &PredictArgs) -> Result<()> {
    let format = OutputFormat::from_str(
        args.format
            .as_deref()
            .unwrap_or_else(|| config.output.format()),
    )?;

    let path = dataset_path(config)?;
    let dataset = Dataset::load(&path)
        .with_context(|| format!("Failed to load dataset from {}", path.display()))?;

    // Only the selected models need to exist on disk
    let active = args.active_models();
    let registry = ModelRegistry::load(&config.models, &active)?;

    let pipeline = Pipeline::new(Arc::new(registry), Arc::new(DatasetHandle::new(dataset)));
    let report = pipeline.run(&args.module, &args.style, &active)?;

    let options = RenderOptions {
        emoji: !(args.no_emoji || config.output.no_emoji()),
        color: args.output.is_none() && console::colors_enabled(),
    };
    let rendered = reporters::report_with_format(&report, format, options)?;

    match &args.output {
        Some(out) => {
            std::fs::write(out, &rendered)
                .with_context(|| format!("Failed to write {}", out.display()))?;
            info!("Wrote {} report to {}", format, out.display());
            eprintln!(
                "{} Report written to {}",
                console::style("✓").green(),
                console::style(out.display()).cyan()
            );
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
