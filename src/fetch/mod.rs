// src/fetch/mod.rs

pub mod extract;
pub mod ftp;

use std::{fs, path::Path};
use tracing::{error, info, instrument, warn};

use crate::config::Config;
use crate::error::{DownloadError, Result};

pub use extract::extract_archive;
pub use ftp::FtpSource;

/// A remote directory holding the registry archive.
pub trait ArchiveSource {
    /// Names of the files in the directory.
    fn list(&mut self) -> Result<Vec<String>>;

    /// Full contents of one file.
    fn retrieve(&mut self, name: &str) -> Result<Vec<u8>>;

    /// End the session. Failures here never fail a fetch.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Download and extract the archive unless the raw file is already present.
/// A present raw file is trusted indefinitely.
pub fn ensure_raw_file_available(config: &Config) -> Result<()> {
    if config.raw_file_path().exists() {
        return Ok(());
    }
    info!("raw file absent, downloading");
    download(config)
}

/// Connect to the configured FTP server and fetch a fresh copy. One attempt.
pub fn download(config: &Config) -> Result<()> {
    let mut source = FtpSource::connect(&config.ftp)?;
    fetch_from(&mut source, config)
}

/// Fetch the archive from `source` and extract it into the work dir.
///
/// The archive must appear in the directory listing before anything local
/// is touched. Once it does, any existing raw file is deleted so that a
/// failed transfer cannot leave a stale copy looking current.
#[instrument(level = "info", skip(source, config), fields(archive = %config.ftp.archive_name))]
pub fn fetch_from<S: ArchiveSource>(source: &mut S, config: &Config) -> Result<()> {
    let archive = config.ftp.archive_name.as_str();

    let payload = retrieve_listed(source, config);
    if let Err(e) = source.close() {
        warn!("closing remote session failed: {}", e);
    }
    let payload = payload?;

    if payload.is_empty() {
        error!("downloaded archive is empty");
        return Err(DownloadError::EmptyPayload {
            archive: archive.to_string(),
        }
        .into());
    }
    info!(bytes = payload.len(), "archive downloaded");

    extract_archive(&payload, archive, &config.raw_file, &config.work_dir)
}

fn retrieve_listed<S: ArchiveSource>(source: &mut S, config: &Config) -> Result<Vec<u8>> {
    let archive = config.ftp.archive_name.as_str();

    let listing = source.list()?;
    if !listing.iter().any(|entry| is_same_file(entry, archive)) {
        error!(
            dir = %config.ftp.directory,
            entries = listing.len(),
            "archive not found in remote directory"
        );
        return Err(DownloadError::ArchiveNotListed {
            archive: archive.to_string(),
            directory: config.ftp.directory.clone(),
        }
        .into());
    }

    remove_if_exists(&config.raw_file_path())?;
    info!("archive found, downloading");
    source.retrieve(archive)
}

/// Some servers answer NLST with paths rather than bare names.
fn is_same_file(entry: &str, name: &str) -> bool {
    entry == name || entry.rsplit('/').next() == Some(name)
}

fn remove_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)?;
        info!(path = %path.display(), "removed previous raw file");
    }
    Ok(())
}
