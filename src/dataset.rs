// src/dataset.rs

use tracing::{info, instrument};

use crate::config::Config;
use crate::error::Result;
use crate::fetch::{self, ArchiveSource, FtpSource};
use crate::parse::{self, ParseStats};
use crate::table::CaTable;

/// Entry point for callers: owns the configuration and hands back a freshly
/// built table on every load. Nothing is cached between calls except the
/// raw file on disk.
#[derive(Debug, Clone)]
pub struct Dataset {
    config: Config,
}

impl Dataset {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch from FTP if the raw file is absent, then parse.
    pub fn load(&self) -> Result<CaTable> {
        self.load_with_stats().map(|(table, _)| table)
    }

    #[instrument(level = "info", skip(self))]
    pub fn load_with_stats(&self) -> Result<(CaTable, ParseStats)> {
        fetch::ensure_raw_file_available(&self.config)?;
        parse::parse_raw_file(&self.config)
    }

    /// Like [`Dataset::load_with_stats`] with a caller-provided source.
    pub fn load_from<S: ArchiveSource>(&self, source: &mut S) -> Result<(CaTable, ParseStats)> {
        if !self.config.raw_file_path().exists() {
            fetch::fetch_from(source, &self.config)?;
        }
        parse::parse_raw_file(&self.config)
    }

    /// Always download a fresh copy over FTP, then parse.
    pub fn refresh(&self) -> Result<(CaTable, ParseStats)> {
        let mut source = FtpSource::connect(&self.config.ftp)?;
        self.refresh_from(&mut source)
    }

    /// Replace the raw file from `source` whether or not one is present.
    #[instrument(level = "info", skip(self, source))]
    pub fn refresh_from<S: ArchiveSource>(&self, source: &mut S) -> Result<(CaTable, ParseStats)> {
        fetch::fetch_from(source, &self.config)?;
        info!("raw file refreshed");
        parse::parse_raw_file(&self.config)
    }
}
