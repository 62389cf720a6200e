//! qco configuration
//!
//! Supports loading config from:
//! - An explicit `--config` file
//! - `~/.config/qco/config.toml` (user level)
//! - `qco.toml` in the working directory (project level, wins over user)
//! - Environment variables `QCO_MODEL_DIR` and `QCO_DATASET` (win over files)
//!
//! # Configuration Format
//!
//! ```toml
//! [models]
//! dir = "models"
//! historia = "historia.json"
//! critical_path = "critical_path.json"
//! talento = "talento.json"
//!
//! [dataset]
//! path = "qco.json"
//!
//! [output]
//! format = "text"
//! no_emoji = false
//! ```
//!
//! Model weights and feature lists are fixed and cannot be configured here.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::models::ModelId;

/// Project-level config file name
pub const PROJECT_CONFIG_FILE: &str = "qco.toml";

const DEFAULT_MODEL_DIR: &str = "models";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QcoConfig {
    #[serde(default)]
    pub models: ModelsConfig,

    #[serde(default)]
    pub dataset: DatasetConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the persisted models live
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelsConfig {
    /// Base directory for relative model paths (default: `models`)
    pub dir: Option<PathBuf>,

    pub historia: Option<PathBuf>,
    pub critical_path: Option<PathBuf>,
    pub talento: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetConfig {
    /// Dataset used when `--dataset` is not given
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Default output format: text, json, markdown
    pub format: Option<String>,

    /// Disable emoji in text output
    pub no_emoji: Option<bool>,
}

impl ModelsConfig {
    pub fn dir(&self) -> &Path {
        self.dir
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_MODEL_DIR))
    }

    /// Resolved path of a model file.
    ///
    /// Relative paths are joined onto `dir`; unset paths default to
    /// `<dir>/<slug>.json` with underscores (e.g. `critical_path.json`).
    pub fn path_for(&self, id: ModelId) -> PathBuf {
        let configured = match id {
            ModelId::Historia => self.historia.as_ref(),
            ModelId::CriticalPath => self.critical_path.as_ref(),
            ModelId::Talento => self.talento.as_ref(),
        };
        match configured {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => self.dir().join(p),
            None => self
                .dir()
                .join(format!("{}.json", id.slug().replace('-', "_"))),
        }
    }
}

impl OutputConfig {
    pub fn format(&self) -> &str {
        self.format.as_deref().unwrap_or("text")
    }

    pub fn no_emoji(&self) -> bool {
        self.no_emoji.unwrap_or(false)
    }
}

impl QcoConfig {
    /// Load config from all sources, with priority:
    /// 1. Environment variables (highest)
    /// 2. Explicit file, or project `qco.toml` over user config
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = QcoConfig::default();

        if let Some(path) = explicit {
            config = Self::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
        } else {
            for path in [Self::user_config_path(), Some(PathBuf::from(PROJECT_CONFIG_FILE))]
                .into_iter()
                .flatten()
                .filter(|p| p.exists())
            {
                match Self::from_file(&path) {
                    Ok(file_config) => {
                        debug!("Loaded config from {}", path.display());
                        config.merge(file_config);
                    }
                    Err(e) => warn!("Failed to load {}: {}", path.display(), e),
                }
            }
        }

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a single TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Get the user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("qco").join("config.toml"))
    }

    /// Merge another config into this one (other takes priority)
    fn merge(&mut self, other: QcoConfig) {
        if other.models.dir.is_some() {
            self.models.dir = other.models.dir;
        }
        if other.models.historia.is_some() {
            self.models.historia = other.models.historia;
        }
        if other.models.critical_path.is_some() {
            self.models.critical_path = other.models.critical_path;
        }
        if other.models.talento.is_some() {
            self.models.talento = other.models.talento;
        }
        if other.dataset.path.is_some() {
            self.dataset.path = other.dataset.path;
        }
        if other.output.format.is_some() {
            self.output.format = other.output.format;
        }
        if other.output.no_emoji.is_some() {
            self.output.no_emoji = other.output.no_emoji;
        }
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var("QCO_MODEL_DIR").filter(|v| !v.is_empty()) {
            self.models.dir = Some(PathBuf::from(dir));
        }
        if let Some(path) = var("QCO_DATASET").filter(|v| !v.is_empty()) {
            self.dataset.path = Some(PathBuf::from(path));
        }
    }

    /// Write an example `qco.toml` into `dir` unless one exists.
    ///
    /// Returns the path and whether it was created.
    pub fn init_project_config(dir: &Path) -> Result<(PathBuf, bool)> {
        let config_path = dir.join(PROJECT_CONFIG_FILE);
        if config_path.exists() {
            return Ok((config_path, false));
        }

        let example = r#"# qco configuration

[models]
# Directory holding the three persisted models
dir = "models"

# Per-model file names (gbdt-rs JSON, as written by GBDT::save_model), relative to dir
# historia = "historia.json"
# critical_path = "critical_path.json"
# talento = "talento.json"

[dataset]
# Default dataset (JSON array of rows) when --dataset is omitted
# path = "qco.json"

[output]
# Default output format (text, json, markdown)
format = "text"
# no_emoji = false
"#;
        std::fs::write(&config_path, example)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        Ok((config_path, true))
    }
}
