//! Artifact sink abstraction
//!
//! One batch artifact per successful `GenerateExport` call. A sink write must
//! be durable before it returns: the reconciler mutates record state only
//! after this confirmation.

use crate::domain::batch::ExportBatch;
use crate::domain::Result;
use async_trait::async_trait;

/// Artifact sink trait for export batch files
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Write a batch under its derived file name
    ///
    /// # Errors
    ///
    /// Returns [`LedgerSyncError::SinkConflict`](crate::domain::LedgerSyncError::SinkConflict)
    /// if an artifact with the same name already exists (never overwrites),
    /// or [`LedgerSyncError::ExportFailed`](crate::domain::LedgerSyncError::ExportFailed)
    /// for any other write failure.
    async fn write_batch(&self, batch: &ExportBatch) -> Result<()>;
}
