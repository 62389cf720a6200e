//! Composite-key record lookup

use tracing::{debug, warn};

use super::{normalize_key, Dataset};
use crate::error::{QcoError, QcoResult};
use crate::models::DatasetRecord;

/// Find the record for a (module, style) pair.
///
/// Both halves are normalized independently before matching. When several
/// rows share the same normalized key, the first one in dataset order is
/// returned on every call.
pub fn resolve<'a>(dataset: &'a Dataset, module: &str, style: &str) -> QcoResult<&'a DatasetRecord> {
    let module_key = normalize_key(module);
    let style_key = normalize_key(style);

    if module_key.is_empty() || style_key.is_empty() {
        return Err(QcoError::InvalidInput(
            "please enter both module and style numbers".to_string(),
        ));
    }

    let mut matches = dataset
        .records()
        .iter()
        .filter(|r| r.module() == module_key && r.style() == style_key);

    let first = matches.next().ok_or_else(|| QcoError::RecordNotFound {
        module: module_key.clone(),
        style: style_key.clone(),
    })?;

    let duplicates = matches.count();
    if duplicates > 0 {
        warn!(
            "{} duplicate row(s) for module '{}' style '{}', using the first",
            duplicates, module_key, style_key
        );
    } else {
        debug!("Resolved module '{}' style '{}'", module_key, style_key);
    }

    Ok(first)
}
