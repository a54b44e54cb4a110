//! In-memory artifact sink for tests
//!
//! Stores batch payloads in a map keyed by file name, with the same
//! conflict semantics as the filesystem sink and a one-shot failure switch
//! for exercising the sink-failure path.

use crate::adapters::sink::traits::ArtifactSink;
use crate::domain::batch::ExportBatch;
use crate::domain::{LedgerSyncError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Map-backed sink with failure injection
#[derive(Default)]
pub struct MemorySink {
    artifacts: Mutex<HashMap<String, String>>,
    fail_next_write: AtomicBool,
}

impl MemorySink {
    /// Creates an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a one-shot write failure
    pub fn fail_next_write(&self) {
        self.fail_next_write.store(true, Ordering::SeqCst);
    }

    /// Returns a written artifact's payload, if present
    pub fn artifact(&self, file_name: &str) -> Option<String> {
        self.artifacts
            .lock()
            .expect("sink mutex poisoned")
            .get(file_name)
            .cloned()
    }

    /// Number of artifacts written
    pub fn artifact_count(&self) -> usize {
        self.artifacts.lock().expect("sink mutex poisoned").len()
    }
}

#[async_trait]
impl ArtifactSink for MemorySink {
    async fn write_batch(&self, batch: &ExportBatch) -> Result<()> {
        if self.fail_next_write.swap(false, Ordering::SeqCst) {
            return Err(LedgerSyncError::ExportFailed(format!(
                "Simulated sink failure for {}",
                batch.file_name
            )));
        }

        let payload = batch.payload()?;
        let mut artifacts = self
            .artifacts
            .lock()
            .map_err(|_| LedgerSyncError::ExportFailed("sink mutex poisoned".to_string()))?;
        if artifacts.contains_key(&batch.file_name) {
            return Err(LedgerSyncError::SinkConflict(format!(
                "Artifact already exists: {}",
                batch.file_name
            )));
        }
        artifacts.insert(batch.file_name.clone(), payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::RecordKind;
    use chrono::Utc;

    fn empty_batch(prefix: &str) -> ExportBatch {
        ExportBatch::new(prefix, RecordKind::Payment, Utc::now(), Vec::new())
    }

    #[tokio::test]
    async fn test_write_and_read_back() {
        let sink = MemorySink::new();
        let batch = empty_batch("erp_export");
        sink.write_batch(&batch).await.unwrap();
        assert_eq!(sink.artifact(&batch.file_name).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_conflict_on_same_name() {
        let sink = MemorySink::new();
        let batch = empty_batch("erp_export");
        sink.write_batch(&batch).await.unwrap();
        let err = sink.write_batch(&batch).await.unwrap_err();
        assert!(matches!(err, LedgerSyncError::SinkConflict(_)));
        assert_eq!(sink.artifact_count(), 1);
    }

    #[tokio::test]
    async fn test_injected_failure_is_one_shot() {
        let sink = MemorySink::new();
        sink.fail_next_write();
        let batch = empty_batch("erp_export");

        let err = sink.write_batch(&batch).await.unwrap_err();
        assert!(matches!(err, LedgerSyncError::ExportFailed(_)));
        assert_eq!(sink.artifact_count(), 0);

        sink.write_batch(&batch).await.unwrap();
        assert_eq!(sink.artifact_count(), 1);
    }
}
