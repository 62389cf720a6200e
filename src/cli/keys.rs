//! Keys command - list module/style pairs in a dataset

use anyhow::{Context, Result};
use console::style;

use super::dataset_path;
use crate::config::QcoConfig;
use crate::dataset::{normalize_key, Dataset};

pub fn run(config: &QcoConfig, module: Option<&str>, json: bool) -> Result<()> {
    let path = dataset_path(config)?;
    let dataset = Dataset::load(&path)
        .with_context(|| format!("Failed to load dataset from {}", path.display()))?;
    print!("{}", render(&dataset, module, json)?);
    Ok(())
}

fn render(dataset: &Dataset, module: Option<&str>, json: bool) -> Result<String> {
    if let Some(module) = module {
        let styles = dataset.styles_for(module);
        if styles.is_empty() {
            anyhow::bail!("Module '{}' not found in dataset", normalize_key(module));
        }
        if json {
            return Ok(format!("{}\n", serde_json::to_string_pretty(styles)?));
        }
        let mut out = format!("{}\n", style(normalize_key(module)).bold());
        for s in styles {
            out.push_str(&format!("  {}\n", s));
        }
        return Ok(out);
    }

    if json {
        return Ok(format!(
            "{}\n",
            serde_json::to_string_pretty(dataset.module_style_map())?
        ));
    }

    let mut out = String::new();
    for (module, styles) in dataset.module_style_map() {
        out.push_str(&format!(
            "{}  {}\n",
            style(module).bold(),
            style(format!("({} styles)", styles.len())).dim()
        ));
        for s in styles {
            out.push_str(&format!("  {}\n", s));
        }
    }
    out.push_str(&format!(
        "\n{} records, {} modules\n",
        dataset.len(),
        dataset.module_style_map().len()
    ));
    Ok(out)
}
