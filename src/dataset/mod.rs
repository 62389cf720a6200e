//! In-memory dataset of changeover records
//!
//! A `Dataset` is built once per upload from an ordered sequence of rows and
//! never mutated afterwards. Rows are keyed by their normalized
//! (`Module Number`, `Style Number`) pair; a module → styles index is
//! derived at load time for listing.
//!
//! The on-disk source is a JSON array of objects, one object per row:
//!
//! ```json
//! [
//!   { "Module Number": "M01", "Style Number": "ST-100", "Priority": 1, "Skill": 3 },
//!   { "Module Number": "M01", "Style Number": "ST-200", "Priority": 2, "Skill": 1 }
//! ]
//! ```

mod key;
mod resolver;
mod snapshot;

pub use key::normalize_key;
pub use resolver::resolve;
pub use snapshot::DatasetHandle;

use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{QcoError, QcoResult};
use crate::models::{DatasetRecord, FieldValue};

/// Column holding the module half of the composite key
pub const MODULE_FIELD: &str = "Module Number";
/// Column holding the style half of the composite key
pub const STYLE_FIELD: &str = "Style Number";

/// Raw row as delivered by the dataset source
pub type RawRow = IndexMap<String, FieldValue>;

/// Immutable, ordered set of records
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<DatasetRecord>,
    /// module → distinct styles in first-seen order
    styles_by_module: BTreeMap<String, Vec<String>>,
}

impl Dataset {
    /// Build a dataset from rows in their source order.
    ///
    /// Rows whose module or style cell is empty or null are skipped with a
    /// warning (blank trailer rows are common in spreadsheet exports). A row
    /// that lacks the key columns entirely is an error.
    pub fn from_rows(rows: Vec<RawRow>) -> QcoResult<Self> {
        let mut records = Vec::with_capacity(rows.len());
        let mut styles_by_module: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut skipped = 0usize;

        for (index, row) in rows.into_iter().enumerate() {
            let module = key_cell(&row, MODULE_FIELD, index)?;
            let style = key_cell(&row, STYLE_FIELD, index)?;
            let (Some(module), Some(style)) = (module, style) else {
                skipped += 1;
                continue;
            };

            let styles = styles_by_module.entry(module.clone()).or_default();
            if !styles.contains(&style) {
                styles.push(style.clone());
            }
            records.push(DatasetRecord::new(module, style, row));
        }

        if skipped > 0 {
            warn!("Skipped {} dataset row(s) with a blank module or style", skipped);
        }

        Ok(Self {
            records,
            styles_by_module,
        })
    }

    /// Parse a dataset from a JSON array of row objects
    pub fn from_json(json: &str) -> QcoResult<Self> {
        let rows: Vec<RawRow> = serde_json::from_str(json)
            .map_err(|e| QcoError::Dataset(format!("expected a JSON array of row objects: {e}")))?;
        Self::from_rows(rows)
    }

    /// Load a dataset file from disk
    pub fn load(path: &Path) -> QcoResult<Self> {
        debug!("Loading dataset from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let dataset = Self::from_json(&content)?;
        info!(
            "Loaded {} record(s) across {} module(s) from {}",
            dataset.len(),
            dataset.styles_by_module.len(),
            path.display()
        );
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in source order
    pub fn records(&self) -> &[DatasetRecord] {
        &self.records
    }

    /// Normalized module keys, sorted
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.styles_by_module.keys().map(String::as_str)
    }

    /// Styles recorded for a module, in first-seen order.
    ///
    /// The module is normalized before lookup.
    pub fn styles_for(&self, module: &str) -> &[String] {
        self.styles_by_module
            .get(&normalize_key(module))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn module_style_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.styles_by_module
    }
}

/// Normalized key cell, `None` when blank
fn key_cell(row: &RawRow, field: &str, index: usize) -> QcoResult<Option<String>> {
    let value = row.get(field).ok_or_else(|| {
        QcoError::Dataset(format!("row {} has no '{}' column", index + 1, field))
    })?;
    if value.is_null() {
        return Ok(None);
    }
    let key = normalize_key(&value.to_string());
    Ok(if key.is_empty() { None } else { Some(key) })
}
