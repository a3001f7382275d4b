//! Ingester CLI surface (§6.4): `ingest <path> [--batch-size N] [--skip M] [--no-count] [--resume]`.
//!
//! Exits 0 on completion, 1 on a fatal error (including a user abort via
//! Ctrl-C, which is treated the same as any other unwound cancellation —
//! §5: "any in-flight batch transaction is rolled back").

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use geocoder_co::ingest::checkpoint::{Checkpoint, DEFAULT_CHECKPOINT_PATH};
use geocoder_co::{Config, GeoJsonIngester, IngestOptions, PgAddressStore};

#[derive(Parser)]
#[command(author, version, about = "Bulk-load reference addresses from a line-delimited GeoJSON file", long_about = None)]
struct Cli {
    /// Path to the line-delimited GeoJSON source file.
    path: PathBuf,

    /// Rows per transactional upsert batch.
    #[arg(long, default_value_t = 1_000)]
    batch_size: usize,

    /// Number of leading lines to skip (resuming a prior run). Ignored
    /// when `--resume` is also given.
    #[arg(long, default_value_t = 0)]
    skip: u64,

    /// Disable the pre-scan line count used to estimate an ETA.
    #[arg(long, default_value_t = false)]
    no_count: bool,

    /// Resume from the checkpoint file left by a prior interrupted run,
    /// instead of an explicit `--skip`. A checkpoint file that exists but
    /// isn't a valid line count is a fatal error, not a silent restart
    /// from zero.
    #[arg(long, default_value_t = false)]
    resume: bool,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let exit_code = match run(cli).await {
        Ok(stats) => {
            tracing::info!(%stats, "ingestion finished");
            0
        }
        Err(e) => {
            tracing::error!(error = %e, "ingestion failed");
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<geocoder_co::IngestStats, geocoder_co::AppError> {
    let config = Config::from_env()?;
    let pool = geocoder_co::database::create_pool(&config).await?;
    let store = Arc::new(PgAddressStore::new(pool));
    let ingester = GeoJsonIngester::new(store);

    let checkpoint_path = PathBuf::from(DEFAULT_CHECKPOINT_PATH);
    let skip = if cli.resume {
        let checkpoint = Checkpoint::new(checkpoint_path.clone());
        match checkpoint.read_for_resume().await? {
            Some(checkpointed) => {
                tracing::info!(checkpointed, "resuming from checkpoint");
                checkpointed
            }
            None => {
                tracing::info!("no checkpoint file found, resuming from the start");
                0
            }
        }
    } else {
        cli.skip
    };

    let options = IngestOptions {
        batch_size: cli.batch_size,
        skip,
        count_lines: !cli.no_count,
        checkpoint_path,
    };

    ingester.ingest_file(&cli.path, options).await
}

fn init_tracing() {
    let filter = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|level| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
