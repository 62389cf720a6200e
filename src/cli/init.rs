//! Init command - write an example qco.toml

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use crate::config::QcoConfig;

/// Run the init command
pub fn run(path: &Path) -> Result<()> {
    let dir = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    println!("\n{} Initializing qco\n", style("🧵").bold());

    let (config_path, created) = QcoConfig::init_project_config(&dir)?;
    if created {
        println!(
            "{} Created {}",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
    } else {
        println!(
            "{} Already initialized at {}",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
    }

    println!("\n{}", style("Next steps:").bold());
    println!("  1. Put historia.json, critical_path.json and talento.json in models/");
    println!(
        "  2. Run {}",
        style("qco predict <MODULE> <STYLE> --dataset <FILE>").cyan()
    );
    println!();
    Ok(())
}
