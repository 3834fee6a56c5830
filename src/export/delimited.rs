// src/export/delimited.rs

use csv::Writer;
use std::path::Path;

use crate::error::Result;
use crate::table::Record;

/// Comma-separated file with a header row of column names.
pub fn write_csv(columns: &[String], records: &[Record<'_>], path: &Path) -> Result<()> {
    let mut wtr = Writer::from_path(path)?;
    wtr.write_record(columns)?;
    for record in records {
        wtr.write_record(record.values())?;
    }
    wtr.flush()?;
    Ok(())
}
