//! Fetch, parse and repair the CAEPI registry of certified safety equipment.
//!
//! The registry is published as a pipe-delimited text file inside a ZIP
//! archive on an anonymous FTP server. [`Dataset::load`] downloads and
//! extracts it when the local copy is absent, then rebuilds a [`CaTable`]
//! from the raw file on every call.

pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod fetch;
pub mod parse;
pub mod query;
pub mod table;

pub use config::{Config, FtpConfig};
pub use dataset::Dataset;
pub use error::{CaepiError, DownloadError, Result};
pub use parse::{build_table, ParseStats};
pub use table::{CaTable, FIELD_COUNT};
