//! Configuration module for qco
//!
//! This module handles:
//! - Model file locations and format
//! - The default dataset path
//! - CLI output defaults

mod qco_config;

pub use qco_config::{DatasetConfig, ModelsConfig, OutputConfig, QcoConfig, PROJECT_CONFIG_FILE};
