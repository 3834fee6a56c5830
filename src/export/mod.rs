// src/export/mod.rs

pub mod delimited;
pub mod json;
pub mod parquet_file;

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{CaepiError, Result};
use crate::table::{CaTable, Record};

pub use json::{to_json_string, write_json};

static UNSAFE_FILE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_-]+").expect("file name pattern should compile"));

/// Used when a requested file name sanitizes down to nothing.
pub const DEFAULT_FILE_NAME: &str = "ca_export";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Parquet,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Parquet => "parquet",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Pick the current row for each requested CA.
///
/// The request is trimmed, blanks dropped and duplicates collapsed, keeping
/// the first occurrence. Output follows request order. If any CA is not in
/// the table the whole selection fails, naming every missing CA.
pub fn select<'a, S: AsRef<str>>(table: &'a CaTable, cas: &[S]) -> Result<Vec<Record<'a>>> {
    let mut wanted: Vec<&str> = Vec::with_capacity(cas.len());
    for ca in cas {
        let ca = ca.as_ref().trim();
        if !ca.is_empty() && !wanted.contains(&ca) {
            wanted.push(ca);
        }
    }

    let mut found = Vec::with_capacity(wanted.len());
    let mut missing = Vec::new();
    for ca in wanted {
        match table.current(ca) {
            Some(record) => found.push(record),
            None => missing.push(ca.to_string()),
        }
    }

    if !missing.is_empty() {
        warn!(missing = ?missing, "requested CAs not in table");
        return Err(CaepiError::RecordsNotFound { missing });
    }
    Ok(found)
}

/// Reduce a caller-supplied name to `[A-Za-z0-9_-]`, collapsing every run
/// of other characters to one `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let replaced = UNSAFE_FILE_CHARS.replace_all(name, "_");
    let trimmed = replaced.trim_matches('_');
    if trimmed.is_empty() {
        DEFAULT_FILE_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Select `cas` from `table` and write them to `<dir>/<name>.<ext>`.
/// Returns the path written.
pub fn export_to_file<S: AsRef<str>>(
    table: &CaTable,
    cas: &[S],
    name: &str,
    format: ExportFormat,
    dir: &Path,
) -> Result<PathBuf> {
    let records = select(table, cas)?;
    let path = dir.join(format!(
        "{}.{}",
        sanitize_file_name(name),
        format.extension()
    ));

    match format {
        ExportFormat::Json => {
            let file = std::fs::File::create(&path)?;
            write_json(&records, file)?;
        }
        ExportFormat::Parquet => parquet_file::write_parquet(table.columns(), &records, &path)?,
        ExportFormat::Csv => delimited::write_csv(table.columns(), &records, &path)?,
    }

    info!(path = %path.display(), rows = records.len(), "export written");
    Ok(path)
}
