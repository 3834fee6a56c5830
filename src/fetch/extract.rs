// src/fetch/extract.rs

use std::{fs, io::Cursor, path::Path};
use tempfile::TempDir;
use tracing::{error, info};
use zip::ZipArchive;

use crate::error::{DownloadError, Result};

/// Unpack an in-memory ZIP and move `raw_file` from it into `dest_dir`.
///
/// Entries are first extracted into a staging directory inside `dest_dir`;
/// `dest_dir/raw_file` only appears once the whole archive has been read
/// cleanly. A payload that cannot be opened or read as a ZIP (including a
/// CRC mismatch partway through an entry) is reported as
/// [`DownloadError::InvalidArchive`]. Other entries are discarded with the
/// staging directory.
pub fn extract_archive(
    payload: &[u8],
    archive_name: &str,
    raw_file: &str,
    dest_dir: &Path,
) -> Result<()> {
    let invalid = |source: zip::result::ZipError| {
        error!(archive = archive_name, "unreadable archive: {}", source);
        DownloadError::InvalidArchive {
            archive: archive_name.to_string(),
            source,
        }
    };

    let mut archive = ZipArchive::new(Cursor::new(payload)).map_err(invalid)?;
    let entries = archive.len();

    let staging = TempDir::new_in(dest_dir)?;
    archive.extract(staging.path()).map_err(invalid)?;

    let staged = staging.path().join(raw_file);
    if !staged.is_file() {
        error!(raw = raw_file, "archive did not contain the raw file");
        return Err(DownloadError::RawFileNotInArchive {
            archive: archive_name.to_string(),
            raw_file: raw_file.to_string(),
        }
        .into());
    }
    fs::rename(&staged, dest_dir.join(raw_file))?;

    info!(
        archive = archive_name,
        entries,
        dest = %dest_dir.display(),
        "archive extracted"
    );
    Ok(())
}
