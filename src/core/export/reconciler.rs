//! Export reconciler
//!
//! Coordinates one export attempt end to end: resolve the caller's record
//! selection, write the batch artifact, then commit status updates and audit
//! rows in a single store transaction. The artifact write happens strictly
//! before any store mutation, so a sink failure leaves every record pending
//! and the ledger untouched.

use super::outcome::{ExportOutcome, PendingOverview};
use crate::adapters::sink::ArtifactSink;
use crate::adapters::store::RecordStore;
use crate::config::schema::{ExportConfig, SinkConfig};
use crate::domain::audit::ExportAudit;
use crate::domain::batch::ExportBatch;
use crate::domain::ids::RecordId;
use crate::domain::principal::{Principal, Role};
use crate::domain::record::{RecordKind, RecordRow};
use crate::domain::{LedgerSyncError, Result};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Reconciler settings, resolved from configuration
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Roles permitted to generate exports and read the audit history
    pub allowed_roles: Vec<Role>,
    /// Batch artifact file name prefix
    pub file_prefix: String,
    /// Default number of rows returned by the history operation
    pub history_limit: usize,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            allowed_roles: vec![Role::Admin, Role::Accountant],
            file_prefix: "erp_export".to_string(),
            history_limit: 100,
        }
    }
}

impl ReconcilerConfig {
    /// Builds reconciler settings from the export and sink config sections
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if the role allow-list contains an
    /// unknown role.
    pub fn from_settings(export: &ExportConfig, sink: &SinkConfig) -> Result<Self> {
        Ok(Self {
            allowed_roles: export.parsed_roles()?,
            file_prefix: sink.file_prefix.clone(),
            history_limit: export.history_limit,
        })
    }
}

/// Coordinates export generation against a record store and an artifact sink
pub struct ExportReconciler {
    store: Arc<dyn RecordStore>,
    sink: Arc<dyn ArtifactSink>,
    config: ReconcilerConfig,
}

impl ExportReconciler {
    /// Creates a reconciler over the given store and sink
    pub fn new(
        store: Arc<dyn RecordStore>,
        sink: Arc<dyn ArtifactSink>,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            store,
            sink,
            config,
        }
    }

    /// Records of one kind awaiting export, denormalized for display
    ///
    /// Read-only; any authenticated caller may inspect the pending set.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn list_pending(&self, kind: RecordKind) -> Result<Vec<RecordRow>> {
        self.store.list_pending(kind).await
    }

    /// Pending record counts across both kinds
    ///
    /// # Errors
    ///
    /// Returns an error if either store query fails.
    pub async fn pending_overview(&self) -> Result<PendingOverview> {
        let (invoices, payments) = futures::try_join!(
            self.store.list_pending(RecordKind::Invoice),
            self.store.list_pending(RecordKind::Payment),
        )?;
        Ok(PendingOverview {
            invoices: invoices.len(),
            payments: payments.len(),
        })
    }

    /// Generates one export batch for the given records
    ///
    /// The batch artifact is written first; only then are the records marked
    /// exported and their success audit rows appended, atomically. Records
    /// claimed by a concurrent export in the meantime are reported through
    /// [`LedgerSyncError::PartialCommit`] with a failed-outcome audit row
    /// each, and are never overwritten.
    ///
    /// Entry order in the artifact follows the caller-supplied id order.
    ///
    /// # Errors
    ///
    /// * `Unauthorized` - caller role is not in the allow-list
    /// * `InvalidInput` - empty selection, duplicate ids or unresolvable ids;
    ///   nothing is written or mutated
    /// * `SinkConflict` / `ExportFailed` - artifact write failed; no store
    ///   mutation happened
    /// * `PartialCommit` - artifact exists but not every record was confirmed
    pub async fn generate_export(
        &self,
        principal: &Principal,
        kind: RecordKind,
        ids: &[RecordId],
    ) -> Result<ExportOutcome> {
        self.authorize(principal, "generate exports")?;

        if ids.is_empty() {
            return Err(LedgerSyncError::InvalidInput(
                "Export selection is empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for id in ids {
            if !seen.insert(*id) {
                return Err(LedgerSyncError::InvalidInput(format!(
                    "Duplicate record id in selection: {id}"
                )));
            }
        }

        let rows = self.store.fetch_by_ids(kind, ids).await?;
        let by_id: HashMap<RecordId, &RecordRow> =
            rows.iter().map(|row| (row.id(), row)).collect();

        let missing: Vec<String> = ids
            .iter()
            .filter(|id| !by_id.contains_key(id))
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(LedgerSyncError::InvalidInput(format!(
                "Unknown {kind} ids: {}",
                missing.join(", ")
            )));
        }

        let generated_at = Utc::now();
        let entries = ids
            .iter()
            .map(|id| by_id[id].snapshot())
            .collect::<Vec<_>>();
        let batch = ExportBatch::new(&self.config.file_prefix, kind, generated_at, entries);
        let checksum = batch.checksum()?;

        tracing::info!(
            kind = %kind,
            file_name = %batch.file_name,
            records = batch.len(),
            subject = %principal.subject,
            "Writing export batch"
        );

        self.sink.write_batch(&batch).await?;

        // The commit runs on its own task so cancelling this future after the
        // artifact exists cannot leave the claim half-applied.
        let store = Arc::clone(&self.store);
        let commit_ids = ids.to_vec();
        let file_name = batch.file_name.clone();
        let commit = tokio::spawn(async move {
            store
                .commit_exported(kind, &commit_ids, &file_name, generated_at)
                .await
        });

        let outcome = match commit.await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(err)) => {
                return self
                    .fail_commit(kind, ids, &batch.file_name, &err.to_string(), 0)
                    .await;
            }
            Err(err) => {
                return self
                    .fail_commit(
                        kind,
                        ids,
                        &batch.file_name,
                        &format!("Commit task failed: {err}"),
                        0,
                    )
                    .await;
            }
        };

        if !outcome.is_complete() {
            let exported = outcome.exported.len();
            return self
                .fail_commit(
                    kind,
                    &outcome.stale,
                    &batch.file_name,
                    "Record was no longer pending at commit time",
                    exported,
                )
                .await;
        }

        tracing::info!(
            kind = %kind,
            file_name = %batch.file_name,
            records = outcome.exported.len(),
            "Export batch committed"
        );

        Ok(ExportOutcome {
            file_name: batch.file_name,
            record_count: outcome.exported.len(),
            checksum,
            exported_at: generated_at,
        })
    }

    /// The most recent audit ledger rows, newest first
    ///
    /// A `limit` of `None` uses the configured default.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for roles outside the allow-list,
    /// `InvalidInput` for a zero limit, or a store error.
    pub async fn history(
        &self,
        principal: &Principal,
        limit: Option<usize>,
    ) -> Result<Vec<ExportAudit>> {
        self.authorize(principal, "read export history")?;

        let limit = limit.unwrap_or(self.config.history_limit);
        if limit == 0 {
            return Err(LedgerSyncError::InvalidInput(
                "History limit must be at least 1".to_string(),
            ));
        }

        self.store.audit_history(limit).await
    }

    fn authorize(&self, principal: &Principal, action: &str) -> Result<()> {
        if self.config.allowed_roles.contains(&principal.role) {
            Ok(())
        } else {
            tracing::warn!(
                subject = %principal.subject,
                role = %principal.role,
                action = action,
                "Denied export operation"
            );
            Err(LedgerSyncError::unauthorized(
                principal.role.as_str(),
                action,
            ))
        }
    }

    /// Appends failed-outcome audit rows and surfaces the partial result
    async fn fail_commit(
        &self,
        kind: RecordKind,
        failed_ids: &[RecordId],
        file_name: &str,
        error: &str,
        exported: usize,
    ) -> Result<ExportOutcome> {
        tracing::error!(
            kind = %kind,
            file_name = %file_name,
            exported = exported,
            failed = failed_ids.len(),
            error = %error,
            "Export commit incomplete"
        );

        let detail = format!("{error} (batch {file_name})");
        if let Err(audit_err) = self
            .store
            .append_failure_audits(kind, failed_ids, &detail, Utc::now())
            .await
        {
            // The ledger could not record the failure; the partial-commit
            // error below still names every unconfirmed record.
            tracing::error!(
                kind = %kind,
                file_name = %file_name,
                error = %audit_err,
                "Failed to append failure audit rows"
            );
        }

        Err(LedgerSyncError::PartialCommit {
            file_name: file_name.to_string(),
            exported,
            failed: failed_ids.to_vec(),
        })
    }
}
