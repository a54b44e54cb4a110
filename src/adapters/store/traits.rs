//! Record store abstraction
//!
//! This module defines the trait that record store adapters must implement
//! to work with the export reconciler. The reconciler is the only writer of
//! `export_status` and the only creator of audit ledger rows.

use crate::domain::audit::ExportAudit;
use crate::domain::ids::RecordId;
use crate::domain::record::{RecordKind, RecordRow};
use crate::domain::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Result of the status + audit commit for one export batch
#[derive(Debug, Clone)]
pub struct CommitOutcome {
    /// Ids claimed by this commit: they were `pending` and are now `exported`,
    /// each with a new success audit row
    pub exported: Vec<RecordId>,

    /// Ids that were no longer `pending` at commit time (claimed by a
    /// concurrent export); excluded from this call's success set
    pub stale: Vec<RecordId>,
}

impl CommitOutcome {
    /// Returns true if every requested record was claimed
    pub fn is_complete(&self) -> bool {
        self.stale.is_empty()
    }
}

/// Record store trait for financial record and audit ledger persistence
///
/// Implementations must make `commit_exported` atomic: either every claimed
/// record gets both its status update and its audit row, or none do. Claims
/// are conditional on `export_status == pending` so two concurrent exports
/// can never both mark the same record exported.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// List all records of a kind with `export_status == pending`,
    /// denormalized for export
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    async fn list_pending(&self, kind: RecordKind) -> Result<Vec<RecordRow>>;

    /// Resolve a set of record ids to their denormalized rows
    ///
    /// Returns only the rows that exist; the caller detects unresolvable ids
    /// by comparing against the requested set. Row order is unspecified.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    async fn fetch_by_ids(&self, kind: RecordKind, ids: &[RecordId]) -> Result<Vec<RecordRow>>;

    /// Atomically mark records exported and append success audit rows
    ///
    /// Only records still in `pending` are claimed; the rest are reported in
    /// [`CommitOutcome::stale`]. The whole commit is a single transaction.
    ///
    /// # Arguments
    ///
    /// * `kind` - Record kind of every id
    /// * `ids` - Record ids resolved by the caller
    /// * `file_name` - Batch artifact name, recorded for operator reconciliation
    /// * `exported_at` - Batch generation timestamp recorded in audit rows
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot commit; in that case no
    /// status or audit change is visible.
    async fn commit_exported(
        &self,
        kind: RecordKind,
        ids: &[RecordId],
        file_name: &str,
        exported_at: DateTime<Utc>,
    ) -> Result<CommitOutcome>;

    /// Append one failed-outcome audit row per record
    ///
    /// Used after a partial commit so the ledger always reflects the true
    /// outcome of every attempt. Does not touch `export_status`.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    async fn append_failure_audits(
        &self,
        kind: RecordKind,
        ids: &[RecordId],
        error: &str,
        attempted_at: DateTime<Utc>,
    ) -> Result<()>;

    /// The `limit` most recent audit ledger rows, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying query fails.
    async fn audit_history(&self, limit: usize) -> Result<Vec<ExportAudit>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_outcome_complete() {
        let outcome = CommitOutcome {
            exported: vec![RecordId::new(1).unwrap()],
            stale: Vec::new(),
        };
        assert!(outcome.is_complete());
    }

    #[test]
    fn test_commit_outcome_incomplete() {
        let outcome = CommitOutcome {
            exported: Vec::new(),
            stale: vec![RecordId::new(2).unwrap()],
        };
        assert!(!outcome.is_complete());
    }
}
