//! Filesystem artifact sink
//!
//! Writes each batch as a file in a configured directory. Opens with
//! `create_new` so a name collision surfaces as `SinkConflict` instead of a
//! silent overwrite, and calls `sync_all` before reporting the write durable.

use crate::adapters::sink::traits::ArtifactSink;
use crate::domain::batch::ExportBatch;
use crate::domain::{LedgerSyncError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Filesystem-backed artifact sink
pub struct FilesystemSink {
    directory: PathBuf,
}

impl FilesystemSink {
    /// Creates a sink rooted at `directory`
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Directory this sink writes into
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

#[async_trait]
impl ArtifactSink for FilesystemSink {
    async fn write_batch(&self, batch: &ExportBatch) -> Result<()> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| {
                LedgerSyncError::ExportFailed(format!(
                    "Failed to create export directory {}: {}",
                    self.directory.display(),
                    e
                ))
            })?;

        let path = self.directory.join(&batch.file_name);
        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(LedgerSyncError::SinkConflict(format!(
                    "Artifact already exists: {}",
                    path.display()
                )));
            }
            Err(e) => {
                return Err(LedgerSyncError::ExportFailed(format!(
                    "Failed to create artifact {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let payload = batch.payload()?;
        file.write_all(payload.as_bytes()).await.map_err(|e| {
            LedgerSyncError::ExportFailed(format!(
                "Failed to write artifact {}: {}",
                path.display(),
                e
            ))
        })?;

        file.sync_all().await.map_err(|e| {
            LedgerSyncError::ExportFailed(format!(
                "Failed to sync artifact {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(
            file_name = %batch.file_name,
            entries = batch.len(),
            "Batch artifact written"
        );

        Ok(())
    }
}
