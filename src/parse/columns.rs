// src/parse/columns.rs

use std::{fs, path::Path};
use tracing::debug;

use crate::error::{CaepiError, Result};
use crate::table::FIELD_COUNT;

/// Read the display names for the table's columns.
///
/// Only the first line is used: a comma-separated list of exactly
/// [`FIELD_COUNT`] names, each trimmed.
pub fn load_column_names(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(CaepiError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let contents = fs::read_to_string(path)?;
    let first = contents
        .lines()
        .next()
        .unwrap_or("")
        .trim_start_matches('\u{feff}')
        .trim();

    let names: Vec<String> = if first.is_empty() {
        Vec::new()
    } else {
        first.split(',').map(|s| s.trim().to_string()).collect()
    };

    if names.len() != FIELD_COUNT {
        return Err(CaepiError::InvalidColumnConfig {
            path: path.to_path_buf(),
            found: names.len(),
        });
    }

    debug!(path = %path.display(), "loaded {} column names", names.len());
    Ok(names)
}
