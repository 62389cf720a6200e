//! CLI command definitions and handlers

mod init;
mod keys;
mod models;
mod predict;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::QcoConfig;
use crate::models::ModelId;

fn parse_model_id(s: &str) -> Result<ModelId, String> {
    s.parse()
}

/// qco - Quick-changeover completion forecasting
#[derive(Parser, Debug)]
#[command(name = "qco")]
#[command(
    version,
    about = "Forecast whether a quick changeover (QCO) will complete on plan",
    long_about = "qco looks up a (module, style) changeover record, feeds it to three \
pre-trained models (Historia, Critical Path, Talento) and blends their scores into one \
weighted completion-risk score with a recommendation tier.",
    after_help = "\
Examples:
  qco predict M01 ST-100 --dataset qco.json          Score with all three models
  qco predict M01 ST-100 -m historia,talento         Score with a subset of models
  qco predict M01 ST-100 --format json               JSON output for scripting
  qco keys --dataset qco.json --module M01           List styles for a module
  qco models                                         Show model catalogue and files
  qco init                                           Write an example qco.toml"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG wins when set
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Config file (default: ~/.config/qco/config.toml then ./qco.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict changeover completion for a module/style pair
    #[command(after_help = "\
Examples:
  qco predict M01 ST-100                             Uses [dataset] path from qco.toml
  qco predict M01 ST-100 --dataset qco.json
  qco predict m01 st-100 -m critical-path            Keys are case-insensitive
  qco predict M01 ST-100 --format markdown -o qco.md")]
    Predict {
        /// Module number
        module: String,

        /// Style number
        style: String,

        /// Dataset file (JSON array of rows)
        #[arg(long, short = 'd', env = "QCO_DATASET")]
        dataset: Option<PathBuf>,

        /// Models to run, comma separated (default: all)
        #[arg(long, short = 'm', value_delimiter = ',', value_parser = parse_model_id)]
        models: Vec<ModelId>,

        /// Directory holding the persisted models
        #[arg(long, env = "QCO_MODEL_DIR")]
        model_dir: Option<PathBuf>,

        /// Output format: text, json, markdown (or md)
        #[arg(long, short = 'f', value_parser = ["text", "json", "markdown", "md"])]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Disable emoji in output (cleaner for CI logs)
        #[arg(long)]
        no_emoji: bool,
    },

    /// List the module/style keys present in a dataset
    Keys {
        /// Dataset file (JSON array of rows)
        #[arg(long, short = 'd', env = "QCO_DATASET")]
        dataset: Option<PathBuf>,

        /// Only list styles for this module
        #[arg(long)]
        module: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the model catalogue: kinds, weights, features and files
    Models {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Initialize a qco.toml config file with example settings
    Init,
}

/// Run the CLI command
pub fn run(cli: Cli) -> Result<()> {
    let mut config = QcoConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Predict {
            module,
            style,
            dataset,
            models,
            model_dir,
            format,
            output,
            no_emoji,
        } => {
            if model_dir.is_some() {
                config.models.dir = model_dir;
            }
            if dataset.is_some() {
                config.dataset.path = dataset;
            }
            predict::run(
                &config,
                &predict::PredictArgs {
                    module,
                    style,
                    models,
                    format,
                    output,
                    no_emoji,
                },
            )
        }

        Commands::Keys {
            dataset,
            module,
            json,
        } => {
            if dataset.is_some() {
                config.dataset.path = dataset;
            }
            keys::run(&config, module.as_deref(), json)
        }

        Commands::Models { json } => models::run(&config, json),

        Commands::Init => init::run(&std::env::current_dir()?),
    }
}

/// Dataset path from flags/env/config, or a hint on how to set one
fn dataset_path(config: &QcoConfig) -> Result<PathBuf> {
    config.dataset.path.clone().ok_or_else(|| {
        anyhow::anyhow!(
            "No dataset given. Pass --dataset, set QCO_DATASET, or add [dataset] path to qco.toml"
        )
    })
}
