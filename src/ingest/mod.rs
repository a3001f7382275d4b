//! GeoJSON ingester (component C, §4.8): streams a line-delimited GeoJSON
//! source into the address store in batched, transactional, resumable
//! upserts.

pub mod checkpoint;
pub mod reader;
pub mod stats;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use crate::models::NewAddress;
use crate::repositories::AddressStore;
use crate::utils::errors::AppError;

pub use checkpoint::Checkpoint;
pub use stats::IngestStats;

const CHECKPOINT_EVERY_N_BATCHES: u64 = 10;

#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub batch_size: usize,
    pub skip: u64,
    /// Pre-scan the file once to count total lines, enabling an ETA in
    /// the surfaced stats (§4.8, §6.4's `--no-count` disables this).
    pub count_lines: bool,
    pub checkpoint_path: PathBuf,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            batch_size: 1_000,
            skip: 0,
            count_lines: true,
            checkpoint_path: PathBuf::from(checkpoint::DEFAULT_CHECKPOINT_PATH),
        }
    }
}

pub struct GeoJsonIngester {
    store: Arc<dyn AddressStore>,
}

impl GeoJsonIngester {
    pub fn new(store: Arc<dyn AddressStore>) -> Self {
        Self { store }
    }

    pub async fn ingest_file(
        &self,
        path: &Path,
        options: IngestOptions,
    ) -> Result<IngestStats, AppError> {
        let total_lines_hint = if options.count_lines {
            Some(count_lines(path).await?)
        } else {
            None
        };

        let mut stats = IngestStats::new(Instant::now());
        if let Some(total) = total_lines_hint {
            stats = stats.with_total_lines_hint(total);
        }

        let checkpoint = Checkpoint::new(options.checkpoint_path.clone());
        let file = tokio::fs::File::open(path).await?;
        let mut lines = BufReader::new(file).lines();

        let mut skipped_so_far = 0u64;
        let mut batch: Vec<NewAddress> = Vec::with_capacity(options.batch_size);
        let mut batches_committed = 0u64;

        while let Some(line) = lines.next_line().await? {
            if skipped_so_far < options.skip {
                skipped_so_far += 1;
                stats.lines_processed += 1;
                continue;
            }

            stats.lines_processed += 1;
            match reader::parse_line(&line) {
                Ok(Some(address)) => batch.push(address),
                Ok(None) => stats.skipped += 1,
                Err(e) => {
                    error!(error = %e, "malformed GeoJSON line, skipping");
                    stats.errors += 1;
                }
            }

            if batch.len() >= options.batch_size {
                self.commit_batch(&mut batch, &mut stats).await;
                batches_committed += 1;
                if batches_committed % CHECKPOINT_EVERY_N_BATCHES == 0 {
                    checkpoint.write(stats.lines_processed).await?;
                }
                info!(%stats, "ingest progress");
            }
        }

        if !batch.is_empty() {
            self.commit_batch(&mut batch, &mut stats).await;
        }

        checkpoint.clear().await?;
        info!(%stats, "ingest complete");
        Ok(stats)
    }

    /// Upserts one batch as a single transaction (§4.8). A failed batch
    /// is rolled back and counted as an error, never re-raised — the run
    /// continues with the next batch.
    async fn commit_batch(&self, batch: &mut Vec<NewAddress>, stats: &mut IngestStats) {
        let taken = std::mem::take(batch);
        let batch_len = taken.len() as u64;
        match self.store.upsert_batch(taken).await {
            Ok(written) => stats.inserted_or_updated += written as u64,
            Err(e) => {
                error!(error = %e, batch_len, "batch upsert failed, rolled back");
                stats.errors += batch_len;
            }
        }
    }
}

async fn count_lines(path: &Path) -> Result<u64, AppError> {
    let file = tokio::fs::File::open(path).await?;
    let mut lines = BufReader::new(file).lines();
    let mut count = 0u64;
    while lines.next_line().await?.is_some() {
        count += 1;
    }
    Ok(count)
}
