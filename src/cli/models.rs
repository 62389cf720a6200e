//! Models command - show the fixed model catalogue

use anyhow::Result;
use console::style;
use serde::Serialize;

use crate::config::{ModelsConfig, QcoConfig};
use crate::models::{ModelId, ModelKind, ModelSpec};

#[derive(Debug, Serialize)]
struct CatalogueEntry {
    id: ModelId,
    name: &'static str,
    kind: ModelKind,
    weight: f64,
    features: &'static [&'static str],
    path: String,
    present: bool,
}

fn catalogue(config: &ModelsConfig) -> Vec<CatalogueEntry> {
    ModelSpec::all()
        .iter()
        .map(|spec| {
            let path = config.path_for(spec.id);
            CatalogueEntry {
                id: spec.id,
                name: spec.id.display_name(),
                kind: spec.kind,
                weight: spec.weight,
                features: spec.required_features,
                present: path.is_file(),
                path: path.display().to_string(),
            }
        })
        .collect()
}

pub fn run(config: &QcoConfig, json: bool) -> Result<()> {
    let entries = catalogue(&config.models);
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print!("{}", render_text(&config.models, &entries));
    }
    Ok(())
}

fn render_text(config: &ModelsConfig, entries: &[CatalogueEntry]) -> String {
    let mut out = format!(
        "\n{} {}\n\n",
        style("Models").bold(),
        style(format!("(gbdt JSON in {})", config.dir().display())).dim()
    );
    for e in entries {
        let status = if e.present {
            style("✓").green()
        } else {
            style("✗").red()
        };
        out.push_str(&format!(
            "{} {:<14} {:<10} weight {:>3.0}%  {:>2} features  {}\n",
            status,
            style(e.name).bold(),
            e.kind.to_string(),
            e.weight * 100.0,
            e.features.len(),
            style(&e.path).dim()
        ));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_catalogue_lists_all_models_in_order() {
        let config = ModelsConfig {
            dir: Some(PathBuf::from("/nonexistent")),
            ..Default::default()
        };
        let entries = catalogue(&config);
        let ids: Vec<ModelId> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, ModelId::ALL.to_vec());
        assert!(entries.iter().all(|e| !e.present));
        assert_eq!(entries[1].path, "/nonexistent/critical_path.json");
    }

    #[test]
    fn test_catalogue_detects_present_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("talento.json"), "{}").unwrap();
        let config = ModelsConfig {
            dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let entries = catalogue(&config);
        assert!(entries[2].present);
        assert!(!entries[0].present);
    }

    #[test]
    fn test_text_listing() {
        let config = ModelsConfig {
            dir: Some(PathBuf::from("/srv/qco-models")),
            ..Default::default()
        };
        let out = render_text(&config, &catalogue(&config));
        assert!(out.contains("/srv/qco-models"));
        assert!(out.contains("Critical Path"));
        assert!(out.contains("regressor"));
        assert!(out.contains("21 features"));
        assert!(out.contains("weight  30%"));
    }
}
