// src/export/json.rs

use std::io::Write;

use crate::error::Result;
use crate::table::Record;

/// JSON array of objects keyed by column name.
pub fn to_json_string(records: &[Record<'_>]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

pub fn write_json<W: Write>(records: &[Record<'_>], mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    Ok(())
}
