// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CaepiError>;

/// Reasons the fetch step gives up on the remote archive.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("archive {archive} not found in remote directory {directory}")]
    ArchiveNotListed { archive: String, directory: String },

    #[error("archive {archive} was downloaded with zero bytes")]
    EmptyPayload { archive: String },

    #[error("archive {archive} is not a readable ZIP")]
    InvalidArchive {
        archive: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("archive {archive} did not contain {raw_file}")]
    RawFileNotInArchive { archive: String, raw_file: String },
}

#[derive(Debug, Error)]
pub enum CaepiError {
    #[error("download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("required file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("no usable rows in {}", path.display())]
    EmptyDataset { path: PathBuf },

    #[error(
        "column config {} has {found} names, expected {}",
        path.display(),
        crate::table::FIELD_COUNT
    )]
    InvalidColumnConfig { path: PathBuf, found: usize },

    #[error("CAs not found: {}", missing.join(", "))]
    RecordsNotFound { missing: Vec<String> },

    #[error(transparent)]
    Ftp(#[from] suppaftp::FtpError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),
}
