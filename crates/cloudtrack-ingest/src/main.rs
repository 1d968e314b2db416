//! CloudTrack Ingest - trajectory file ingestion tool

use anyhow::Result;
use clap::Parser;
use cloudtrack_common::logging::{init_logging, LogConfig, LogLevel};
use cloudtrack_ingest::config::Config;
use cloudtrack_ingest::loader::{self, FileOutcome};
use cloudtrack_ingest::sink::PgSink;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "cloudtrack-ingest")]
#[command(author, version, about = "CloudTrack trajectory file ingestion tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Parser, Debug)]
enum Command {
    /// Create the cloudids and dataset tables if they do not exist
    Setup,

    /// Bulk-load every historical file in a directory
    Bulk {
        /// Directory to scan (defaults to the configured historical mount)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Append one newly arrived file
    Incremental {
        /// File name inside the configured ingestion mount, or a full path
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env()?;
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }
    init_logging(&log_config)?;

    let config = Config::load()?;
    let mut sink = PgSink::connect(&config.database).await?;

    match cli.command {
        Command::Setup => {
            sink.ensure_tables().await?;
        },
        Command::Bulk { dir } => {
            let directory = dir.unwrap_or(config.storage.historical_dir);
            let report = loader::bulk_load(&directory, &mut sink).await?;
            info!(
                accepted = report.accepted,
                rejected = report.rejected.len(),
                failed = report.failed.len(),
                rows = report.rows,
                "Bulk ingestion finished"
            );
        },
        Command::Incremental { file } => {
            let path = if file.is_absolute() || file.components().count() > 1 {
                file
            } else {
                config.storage.ingestion_dir.join(file)
            };
            match loader::incremental_load(&path, &mut sink).await? {
                FileOutcome::Accepted { .. } => {},
                FileOutcome::Rejected(reason) => {
                    anyhow::bail!("file rejected: {}", reason);
                },
            }
        },
    }

    Ok(())
}
