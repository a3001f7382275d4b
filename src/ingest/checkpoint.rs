//! Resumable-ingest checkpoint file (§4.8, §6.4).
//!
//! A plain-text integer at `./import_checkpoint.txt` by default: the
//! count of lines processed so far, including any initial `--skip`.
//! Written atomically every 10 batches, removed on clean completion.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::utils::errors::AppError;

pub const DEFAULT_CHECKPOINT_PATH: &str = "./import_checkpoint.txt";

pub struct Checkpoint {
    path: PathBuf,
}

impl Checkpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> Self {
        Self::new(DEFAULT_CHECKPOINT_PATH)
    }

    /// Reads the checkpointed line count, `None` if no checkpoint file
    /// exists or its contents aren't a valid integer.
    pub async fn read(&self) -> Option<u64> {
        let contents = fs::read_to_string(&self.path).await.ok()?;
        contents.trim().parse().ok()
    }

    /// Reads the checkpoint for an explicit resume (`--resume`, §6.4):
    /// `Ok(None)` if no checkpoint file exists (nothing to resume from),
    /// `Ok(Some(n))` on a valid count. Unlike [`Checkpoint::read`], a
    /// checkpoint file that *exists but is corrupt* is a real failure
    /// here — the caller asked explicitly to resume, and silently
    /// treating a corrupt file as "start from zero" would replay
    /// already-ingested lines.
    pub async fn read_for_resume(&self) -> Result<Option<u64>, AppError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        contents
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| AppError::Ingest(format!("checkpoint file {:?} does not contain a valid line count: {:?}", self.path, contents.trim())))
    }

    /// Writes `lines_processed`, replacing any previous checkpoint via a
    /// write-to-temp-then-rename so a crash mid-write can't corrupt it.
    pub async fn write(&self, lines_processed: u64) -> Result<(), AppError> {
        let tmp_path = tmp_path_for(&self.path);
        fs::write(&tmp_path, lines_processed.to_string()).await?;
        fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }

    /// Removes the checkpoint file; a missing file is not an error (§4.8:
    /// "removed on clean completion").
    pub async fn clear(&self) -> Result<(), AppError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_a_count() {
        let dir = std::env::temp_dir().join(format!("geocoder_co_checkpoint_test_{}", std::process::id()));
        let checkpoint = Checkpoint::new(dir);
        checkpoint.write(42).await.unwrap();
        assert_eq!(checkpoint.read().await, Some(42));
        checkpoint.clear().await.unwrap();
        assert_eq!(checkpoint.read().await, None);
    }

    #[tokio::test]
    async fn clearing_a_missing_checkpoint_is_not_an_error() {
        let dir = std::env::temp_dir().join(format!("geocoder_co_checkpoint_missing_{}", std::process::id()));
        let checkpoint = Checkpoint::new(dir);
        assert!(checkpoint.clear().await.is_ok());
    }

    #[tokio::test]
    async fn read_for_resume_is_none_when_no_checkpoint_exists() {
        let dir = std::env::temp_dir().join(format!("geocoder_co_checkpoint_resume_missing_{}", std::process::id()));
        let checkpoint = Checkpoint::new(dir);
        assert_eq!(checkpoint.read_for_resume().await.unwrap(), None);
    }

    #[tokio::test]
    async fn read_for_resume_returns_the_checkpointed_count() {
        let dir = std::env::temp_dir().join(format!("geocoder_co_checkpoint_resume_ok_{}", std::process::id()));
        let checkpoint = Checkpoint::new(dir);
        checkpoint.write(4_200).await.unwrap();
        assert_eq!(checkpoint.read_for_resume().await.unwrap(), Some(4_200));
        checkpoint.clear().await.unwrap();
    }

    #[tokio::test]
    async fn read_for_resume_errors_on_a_corrupt_checkpoint() {
        let path = std::env::temp_dir().join(format!("geocoder_co_checkpoint_resume_corrupt_{}", std::process::id()));
        fs::write(&path, b"not-a-number").await.unwrap();
        let checkpoint = Checkpoint::new(path.clone());
        let err = checkpoint.read_for_resume().await.unwrap_err();
        assert!(matches!(err, AppError::Ingest(_)));
        fs::remove_file(&path).await.ok();
    }
}
