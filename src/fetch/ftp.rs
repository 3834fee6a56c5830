// src/fetch/ftp.rs

use suppaftp::types::{FileType, Mode};
use suppaftp::{FtpError, FtpStream};
use tracing::{debug, error, info};

use super::ArchiveSource;
use crate::config::FtpConfig;
use crate::error::Result;

/// An anonymous, passive-mode session parked in the archive's directory.
pub struct FtpSource {
    stream: FtpStream,
}

impl FtpSource {
    /// Connect, log in, switch to passive mode and change into the
    /// configured directory. Transport errors are logged and returned as-is.
    pub fn connect(cfg: &FtpConfig) -> Result<Self> {
        let addr = cfg.address();
        debug!(addr = %addr, "connecting to FTP server");
        let mut stream = logged(FtpStream::connect(&addr), "connect")?;
        logged(stream.login(&cfg.user, &cfg.password), "login")?;
        stream.set_mode(Mode::Passive);
        logged(stream.cwd(&cfg.directory), "cwd")?;
        info!(addr = %addr, dir = %cfg.directory, "FTP session ready");
        Ok(Self { stream })
    }
}

impl ArchiveSource for FtpSource {
    fn list(&mut self) -> Result<Vec<String>> {
        logged(self.stream.nlst(None), "nlst")
    }

    fn retrieve(&mut self, name: &str) -> Result<Vec<u8>> {
        logged(self.stream.transfer_type(FileType::Binary), "type")?;
        let cursor = logged(self.stream.retr_as_buffer(name), "retr")?;
        Ok(cursor.into_inner())
    }

    fn close(&mut self) -> Result<()> {
        logged(self.stream.quit(), "quit")
    }
}

fn logged<T>(res: std::result::Result<T, FtpError>, step: &str) -> Result<T> {
    res.map_err(|e| {
        error!(step, "FTP operation failed: {}", e);
        e.into()
    })
}
