use anyhow::{bail, Context, Result};
use caepi::{
    export::{self, ExportFormat, DEFAULT_FILE_NAME},
    Config, Dataset,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Download and query the CAEPI registry of certified safety equipment.
#[derive(Debug, Parser)]
#[command(name = "caepi", version)]
struct Cli {
    /// Directory holding the raw file, column config and invalid-lines file
    #[arg(long, env = "CAEPI_WORK_DIR", default_value = ".")]
    work_dir: PathBuf,

    #[arg(long, env = "CAEPI_FTP_HOST")]
    ftp_host: Option<String>,

    #[arg(long, env = "CAEPI_FTP_DIR")]
    ftp_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Download a fresh copy of the archive, replacing the local raw file
    Fetch,
    /// Load the table (downloading if needed) and print parse counts
    Build,
    /// Print the current record for a CA
    Show { ca: String },
    /// Print every record for a CA
    History { ca: String },
    /// Print whether a CA is currently valid
    Valid { ca: String },
    /// Write the current records for a list of CAs to a file
    Export {
        #[arg(long, value_enum, default_value_t = FormatArg::Json)]
        format: FormatArg,
        #[arg(long, default_value = DEFAULT_FILE_NAME)]
        name: String,
        /// Output directory (defaults to the work dir)
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(required = true)]
        cas: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Parquet,
    Csv,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Parquet => ExportFormat::Parquet,
            FormatArg::Csv => ExportFormat::Csv,
        }
    }
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) resolve config ───────────────────────────────────────────
    let cli = Cli::parse();
    let mut config = Config::new(&cli.work_dir);
    if let Some(host) = cli.ftp_host {
        config.ftp.host = host;
    }
    if let Some(dir) = cli.ftp_dir {
        config.ftp.directory = dir;
    }
    let dataset = Dataset::new(config);

    // ─── 3) run ──────────────────────────────────────────────────────
    match cli.command {
        Command::Fetch => {
            let (_, stats) = dataset.refresh().context("fetching archive")?;
            info!(rows = stats.rows(), "fetch complete");
        }
        Command::Build => {
            let (table, stats) = dataset.load_with_stats().context("loading dataset")?;
            println!("rows:      {}", table.len());
            println!("accepted:  {}", stats.accepted);
            println!("repaired:  {}", stats.repaired);
            println!("padded:    {}", stats.padded);
            println!("invalid:   {}", stats.invalid);
            if stats.invalid > 0 {
                println!(
                    "invalid lines written to {}",
                    dataset.config().invalid_lines_path().display()
                );
            }
        }
        Command::Show { ca } => {
            let table = dataset.load()?;
            match table.current(&ca) {
                Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
                None => bail!("CA {} not found", ca),
            }
        }
        Command::History { ca } => {
            let table = dataset.load()?;
            match table.history(&ca) {
                Some(records) => println!("{}", export::to_json_string(&records)?),
                None => bail!("CA {} not found", ca),
            }
        }
        Command::Valid { ca } => {
            let table = dataset.load()?;
            match table.is_valid(&ca) {
                Some(valid) => println!("{}", valid),
                None => bail!("CA {} not found", ca),
            }
        }
        Command::Export {
            format,
            name,
            out_dir,
            cas,
        } => {
            let table = dataset.load()?;
            let dir = out_dir.unwrap_or_else(|| dataset.config().work_dir.clone());
            let path = export::export_to_file(&table, cas.as_slice(), &name, format.into(), &dir)
                .with_context(|| format!("exporting to {}", dir.display()))?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_format_flag_maps_onto_library_format() {
        let cli = Cli::try_parse_from(["caepi", "export", "--format", "parquet", "123"]).unwrap();
        match cli.command {
            Command::Export { format, cas, .. } => {
                assert_eq!(ExportFormat::from(format), ExportFormat::Parquet);
                assert_eq!(cas, vec!["123".to_string()]);
            }
            other => panic!("expected export, got {:?}", other),
        }

        let cli = Cli::try_parse_from(["caepi", "export", "1"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Export { format: FormatArg::Json, .. }
        ));
        assert!(Cli::try_parse_from(["caepi", "export", "--format", "xml", "1"]).is_err());
    }
}
