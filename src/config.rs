// src/config.rs

use std::path::{Path, PathBuf};

static DEFAULT_FTP_HOST: &str = "ftp.mtps.gov.br";
static DEFAULT_FTP_DIRECTORY: &str = "portal/fiscalizacao/seguranca-e-saude-no-trabalho/caepi/";
static DEFAULT_ARCHIVE_NAME: &str = "tgg_export_caepi.zip";
static DEFAULT_RAW_FILE: &str = "tgg_export_caepi.txt";
static DEFAULT_COLUMN_CONFIG: &str = "config_nomes_colunas.csv";
static DEFAULT_INVALID_LINES: &str = "CAs_com_erros.txt";
static ANONYMOUS: &str = "anonymous";

/// Where the archive lives and how to log in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtpConfig {
    pub host: String,
    pub port: u16,
    pub directory: String,
    pub archive_name: String,
    pub user: String,
    pub password: String,
}

impl Default for FtpConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_FTP_HOST.to_string(),
            port: 21,
            directory: DEFAULT_FTP_DIRECTORY.to_string(),
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
            user: ANONYMOUS.to_string(),
            password: ANONYMOUS.to_string(),
        }
    }
}

impl FtpConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Remote source plus the local file names, all resolved against `work_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub work_dir: PathBuf,
    pub ftp: FtpConfig,
    pub raw_file: String,
    pub column_config: String,
    pub invalid_lines: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Config {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            ftp: FtpConfig::default(),
            raw_file: DEFAULT_RAW_FILE.to_string(),
            column_config: DEFAULT_COLUMN_CONFIG.to_string(),
            invalid_lines: DEFAULT_INVALID_LINES.to_string(),
        }
    }

    pub fn raw_file_path(&self) -> PathBuf {
        self.resolve(&self.raw_file)
    }

    pub fn column_config_path(&self) -> PathBuf {
        self.resolve(&self.column_config)
    }

    pub fn invalid_lines_path(&self) -> PathBuf {
        self.resolve(&self.invalid_lines)
    }

    fn resolve(&self, name: &str) -> PathBuf {
        Path::new(&self.work_dir).join(name)
    }
}
