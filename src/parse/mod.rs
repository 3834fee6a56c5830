// src/parse/mod.rs

pub mod columns;
pub mod repair;

use csv::ReaderBuilder;
use std::{fs, path::Path};
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::{CaepiError, Result};
use crate::table::{CaTable, FIELD_COUNT, REGISTRATION_FIELD};

pub use columns::load_column_names;
pub use repair::{classify, split_unspaced_pipes, LineOutcome};

/// Counters from one pass over the raw file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseStats {
    /// Rows kept without repair (including padded ones).
    pub accepted: usize,
    /// Rows kept after the space-before-pipe re-split.
    pub repaired: usize,
    /// Rows that were shorter than [`FIELD_COUNT`] and got empty values appended.
    pub padded: usize,
    /// Lines diverted to the invalid-lines file.
    pub invalid: usize,
    /// Whether a leading header line was found and dropped.
    pub header_skipped: bool,
}

impl ParseStats {
    pub fn rows(&self) -> usize {
        self.accepted + self.repaired
    }
}

/// Rebuild the table from the local raw file.
pub fn build_table(config: &Config) -> Result<CaTable> {
    parse_raw_file(config).map(|(table, _)| table)
}

/// Rebuild the table from the local raw file and report what the pass did.
///
/// Lines still too wide after repair are written, one per line, to the
/// invalid-lines file, replacing whatever it held before. The file is left
/// alone when every line parsed.
#[instrument(level = "info", skip(config), fields(raw = %config.raw_file_path().display()))]
pub fn parse_raw_file(config: &Config) -> Result<(CaTable, ParseStats)> {
    let raw_path = config.raw_file_path();
    if !raw_path.exists() {
        return Err(CaepiError::MissingFile { path: raw_path });
    }
    let columns = load_column_names(&config.column_config_path())?;

    let (rows, invalid, stats) = read_rows(&raw_path)?;

    if !invalid.is_empty() {
        let invalid_path = config.invalid_lines_path();
        write_invalid_lines(&invalid_path, &invalid)?;
        warn!(
            count = invalid.len(),
            path = %invalid_path.display(),
            "wrote unrepairable lines"
        );
    }

    if rows.is_empty() {
        return Err(CaepiError::EmptyDataset { path: raw_path });
    }

    info!(
        rows = stats.rows(),
        accepted = stats.accepted,
        repaired = stats.repaired,
        padded = stats.padded,
        invalid = stats.invalid,
        "table built"
    );
    Ok((CaTable::new(columns, rows), stats))
}

fn read_rows(path: &Path) -> Result<(Vec<Vec<String>>, Vec<String>, ParseStats)> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'|')
        .quote(b'"')
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut stats = ParseStats::default();
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut invalid: Vec<String> = Vec::new();

    for result in rdr.byte_records() {
        let record = result?;
        let line_no = record.position().map(|p| p.line()).unwrap_or_default();
        let fields: Vec<String> = record
            .iter()
            .map(|f| String::from_utf8_lossy(f).into_owned())
            .collect();

        let (mut row, repaired) = match classify(fields) {
            LineOutcome::Accepted(row) => (row, false),
            LineOutcome::Repaired(row) => (row, true),
            LineOutcome::Invalid(line) => {
                debug!(line = line_no, "line still too wide after repair");
                stats.invalid += 1;
                invalid.push(line);
                continue;
            }
        };

        if rows.is_empty() && !stats.header_skipped && looks_like_header(&row) {
            debug!(line = line_no, "dropping header line");
            stats.header_skipped = true;
            continue;
        }

        if repaired {
            debug!(line = line_no, "repaired over-wide line");
            stats.repaired += 1;
        } else {
            stats.accepted += 1;
        }

        if row.len() < FIELD_COUNT {
            row.resize(FIELD_COUNT, String::new());
            stats.padded += 1;
        }
        rows.push(row);
    }

    Ok((rows, invalid, stats))
}

fn looks_like_header(row: &[String]) -> bool {
    row.get(REGISTRATION_FIELD)
        .map(|f| f.to_lowercase().contains("registro"))
        .unwrap_or(false)
}

fn write_invalid_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut body = lines.join("\n");
    body.push('\n');
    fs::write(path, body)?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::TempDir;

    use crate::parse::columns::tests::NAMES;

    pub(crate) fn line(n: usize, ca: &str) -> String {
        let mut f: Vec<String> = (0..n).map(|i| format!("v{}", i)).collect();
        f[0] = ca.to_string();
        f.join("|")
    }

    /// Work dir holding a column config and the given raw lines.
    pub(crate) fn workspace(raw_lines: &[String]) -> Result<(TempDir, Config)> {
        let dir = TempDir::new()?;
        let cfg = Config::new(dir.path());
        fs::write(cfg.column_config_path(), format!("{}\n", NAMES))?;
        fs::write(cfg.raw_file_path(), raw_lines.join("\n"))?;
        Ok((dir, cfg))
    }

    #[test]
    fn full_width_lines_are_kept_verbatim() -> Result<()> {
        let raw = vec![line(FIELD_COUNT, "100"), line(FIELD_COUNT, "200")];
        let (_dir, cfg) = workspace(&raw)?;

        let (table, stats) = parse_raw_file(&cfg)?;
        assert_eq!(table.len(), 2);
        assert_eq!(stats.accepted, 2);
        assert_eq!(stats.repaired, 0);
        let expected: Vec<&str> = raw[1].split('|').collect();
        assert_eq!(table.row(1).unwrap().values(), expected.as_slice());
        assert!(!cfg.invalid_lines_path().exists());
        Ok(())
    }

    #[test]
    fn headers_come_from_config() -> Result<()> {
        let (_dir, cfg) = workspace(&[line(FIELD_COUNT, "100")])?;
        let table = build_table(&cfg)?;
        let expected: Vec<&str> = NAMES.split(',').collect();
        assert_eq!(table.columns(), expected.as_slice());
        assert_eq!(table.row(0).unwrap().get("RegistroCA"), Some("100"));
        Ok(())
    }

    #[test]
    fn short_lines_are_padded() -> Result<()> {
        let (_dir, cfg) = workspace(&["A|B|C".to_string()])?;
        let (table, stats) = parse_raw_file(&cfg)?;
        let row = table.row(0).unwrap();
        assert_eq!(row.values().len(), FIELD_COUNT);
        assert_eq!(&row.values()[..3], ["A", "B", "C"]);
        assert!(row.values()[3..].iter().all(String::is_empty));
        assert_eq!(stats.padded, 1);
        Ok(())
    }

    #[test]
    fn quoted_delimiter_stays_in_field() -> Result<()> {
        let mut f: Vec<String> = (0..FIELD_COUNT).map(|i| format!("v{}", i)).collect();
        f[7] = "\"LUVA|NITRILICA\"".to_string();
        let (_dir, cfg) = workspace(&[f.join("|")])?;

        let table = build_table(&cfg)?;
        assert_eq!(table.row(0).unwrap().values()[7], "LUVA|NITRILICA");
        Ok(())
    }

    #[test]
    fn over_wide_line_with_spaced_pipe_is_repaired() -> Result<()> {
        let mut f: Vec<String> = (0..FIELD_COUNT + 1).map(|i| format!("v{}", i)).collect();
        f[8] = "CALCADO ".to_string();
        let (_dir, cfg) = workspace(&[f.join("|"), line(FIELD_COUNT, "200")])?;

        let (table, stats) = parse_raw_file(&cfg)?;
        assert_eq!(stats.repaired, 1);
        assert_eq!(table.len(), 2);
        let row = table.row(0).unwrap();
        assert_eq!(row.values().len(), FIELD_COUNT);
        assert_eq!(row.values()[8], "CALCADO |v9");
        Ok(())
    }

    fn spaced_line(width: usize, spaced: &[usize]) -> String {
        let mut f: Vec<String> = (0..width).map(|i| format!("v{}", i)).collect();
        for &i in spaced {
            f[i] = "X ".to_string();
        }
        f.join("|")
    }

    #[test]
    fn two_spaced_pipes_bring_a_wider_line_back_to_width() -> Result<()> {
        let (_dir, cfg) = workspace(&[spaced_line(FIELD_COUNT + 2, &[3, 6])])?;

        let (table, stats) = parse_raw_file(&cfg)?;
        assert_eq!(stats.repaired, 1);
        assert_eq!(stats.padded, 0);
        let row = table.row(0).unwrap();
        assert_eq!(row.values().len(), FIELD_COUNT);
        assert_eq!(row.values()[3], "X |v4");
        assert_eq!(row.values()[5], "X |v7");
        assert_eq!(row.values()[FIELD_COUNT - 1], "v20");
        Ok(())
    }

    #[test]
    fn repair_that_overshoots_is_padded() -> Result<()> {
        let raw = vec![spaced_line(FIELD_COUNT + 2, &[3, 6, 9]), line(FIELD_COUNT, "2")];
        let (_dir, cfg) = workspace(&raw)?;

        let (table, stats) = parse_raw_file(&cfg)?;
        assert_eq!(stats.repaired, 1);
        assert_eq!(stats.padded, 1);
        assert_eq!(stats.accepted, 1);
        assert!(table.rows().all(|r| r.values().len() == FIELD_COUNT));
        let row = table.row(0).unwrap();
        assert_eq!(row.values()[FIELD_COUNT - 2], "v20");
        assert_eq!(row.values()[FIELD_COUNT - 1], "");
        Ok(())
    }

    #[test]
    fn quoted_field_survives_repair_of_its_line() -> Result<()> {
        let mut f: Vec<String> = (0..FIELD_COUNT + 1).map(|i| format!("v{}", i)).collect();
        f[5] = "\"TAM P |M\"".to_string();
        f[8] = "CALCADO ".to_string();
        let (_dir, cfg) = workspace(&[f.join("|")])?;

        let (table, stats) = parse_raw_file(&cfg)?;
        assert_eq!(stats.repaired, 1);
        let row = table.row(0).unwrap();
        assert_eq!(row.values().len(), FIELD_COUNT);
        assert_eq!(row.values()[5], "TAM P |M");
        assert_eq!(row.values()[8], "CALCADO |v9");
        Ok(())
    }

    #[test]
    fn quoted_pipe_without_space_is_logged_unquoted() -> Result<()> {
        let mut f: Vec<String> = (0..FIELD_COUNT + 1).map(|i| format!("v{}", i)).collect();
        f[0] = "keep".to_string();
        f[4] = "\"A|B\"".to_string();
        f[8] = "CALCADO ".to_string();
        let (_dir, cfg) = workspace(&[line(FIELD_COUNT, "1"), f.join("|")])?;

        let (table, stats) = parse_raw_file(&cfg)?;
        assert_eq!(stats.invalid, 1);
        assert_eq!(table.len(), 1);
        let log = fs::read_to_string(cfg.invalid_lines_path())?;
        assert_eq!(log, format!("{}\n", f.join("|").replace('"', "")));
        Ok(())
    }

    #[test]
    fn unrepairable_line_goes_to_side_file() -> Result<()> {
        let bad = line(FIELD_COUNT + 1, "999");
        let (_dir, cfg) = workspace(&[line(FIELD_COUNT, "100"), bad.clone()])?;
        fs::write(cfg.invalid_lines_path(), "stale\nstale\nstale\n")?;

        let (table, stats) = parse_raw_file(&cfg)?;
        assert_eq!(stats.invalid, 1);
        assert_eq!(table.len(), 1);
        assert!(table.rows().all(|r| r.registration() != "999"));

        let log = fs::read_to_string(cfg.invalid_lines_path())?;
        assert_eq!(log, format!("{}\n", bad));
        Ok(())
    }

    #[test]
    fn leading_header_line_is_dropped() -> Result<()> {
        let header = NAMES.replace(',', "|");
        let (_dir, cfg) = workspace(&[header, line(FIELD_COUNT, "100")])?;

        let (table, stats) = parse_raw_file(&cfg)?;
        assert!(stats.header_skipped);
        assert_eq!(stats.accepted, 1);
        assert_eq!(table.len(), 1);
        assert_eq!(table.row(0).unwrap().registration(), "100");
        Ok(())
    }

    #[test]
    fn blank_lines_are_skipped() -> Result<()> {
        let raw = vec![line(FIELD_COUNT, "1"), String::new(), line(FIELD_COUNT, "2")];
        let (_dir, cfg) = workspace(&raw)?;
        assert_eq!(build_table(&cfg)?.len(), 2);
        Ok(())
    }

    #[test]
    fn nothing_usable_is_an_empty_dataset() -> Result<()> {
        let (_dir, cfg) = workspace(&[line(FIELD_COUNT + 1, "1")])?;
        let err = build_table(&cfg).unwrap_err();
        assert!(matches!(err, CaepiError::EmptyDataset { .. }));
        assert!(cfg.invalid_lines_path().exists());
        Ok(())
    }

    #[test]
    fn missing_inputs_are_reported() -> Result<()> {
        let (_dir, cfg) = workspace(&[line(FIELD_COUNT, "1")])?;
        fs::remove_file(cfg.column_config_path())?;
        assert!(matches!(
            build_table(&cfg).unwrap_err(),
            CaepiError::MissingFile { path } if path == cfg.column_config_path()
        ));

        fs::remove_file(cfg.raw_file_path())?;
        assert!(matches!(
            build_table(&cfg).unwrap_err(),
            CaepiError::MissingFile { path } if path == cfg.raw_file_path()
        ));
        Ok(())
    }

    #[test]
    fn reparsing_is_idempotent() -> Result<()> {
        let mut wide: Vec<String> = (0..FIELD_COUNT + 1).map(|i| format!("v{}", i)).collect();
        wide[3] = "X ".to_string();
        let raw = vec![
            line(FIELD_COUNT, "1"),
            wide.join("|"),
            "A|B".to_string(),
            line(FIELD_COUNT + 2, "bad"),
        ];
        let (_dir, cfg) = workspace(&raw)?;

        let first = parse_raw_file(&cfg)?;
        let second = parse_raw_file(&cfg)?;
        assert_eq!(first, second);
        assert_eq!(first.0.len(), 3);
        Ok(())
    }
}
