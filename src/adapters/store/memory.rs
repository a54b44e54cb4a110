//! In-memory record store
//!
//! Backs the `memory` store backend and the test suites. The commit step runs
//! inside one mutex-guarded section, giving the same all-or-nothing and
//! conditional-claim semantics as the PostgreSQL transaction.

use crate::adapters::store::traits::{CommitOutcome, RecordStore};
use crate::domain::audit::ExportAudit;
use crate::domain::ids::RecordId;
use crate::domain::record::{ExportStatus, InvoiceRow, PaymentRow, RecordKind, RecordRow};
use crate::domain::{LedgerSyncError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone)]
struct StoredInvoice {
    row: InvoiceRow,
    export_status: ExportStatus,
}

#[derive(Debug, Clone)]
struct StoredPayment {
    row: PaymentRow,
    export_status: ExportStatus,
}

#[derive(Debug, Default)]
struct MemoryInner {
    invoices: BTreeMap<i64, StoredInvoice>,
    payments: BTreeMap<i64, StoredPayment>,
    audits: Vec<ExportAudit>,
}

/// Mutex-guarded in-memory store
///
/// `fail_next_commit` lets tests exercise the partial-commit path: the next
/// `commit_exported` call fails without touching any state, as a rolled-back
/// transaction would.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
    fail_next_commit: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an invoice with the given export status
    pub fn insert_invoice(&self, row: InvoiceRow, export_status: ExportStatus) {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.invoices.insert(
            row.id.value(),
            StoredInvoice { row, export_status },
        );
    }

    /// Seeds a payment with the given export status
    pub fn insert_payment(&self, row: PaymentRow, export_status: ExportStatus) {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.payments.insert(
            row.id.value(),
            StoredPayment { row, export_status },
        );
    }

    /// Arms a one-shot commit failure
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Returns a record's export status, if the record exists
    pub fn export_status_of(&self, kind: RecordKind, id: RecordId) -> Option<ExportStatus> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        match kind {
            RecordKind::Invoice => inner.invoices.get(&id.value()).map(|r| r.export_status),
            RecordKind::Payment => inner.payments.get(&id.value()).map(|r| r.export_status),
        }
    }

    /// Total number of audit ledger rows
    pub fn audit_count(&self) -> usize {
        self.inner.lock().expect("store mutex poisoned").audits.len()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryInner>> {
        self.inner
            .lock()
            .map_err(|_| LedgerSyncError::Store("store mutex poisoned".to_string()))
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_pending(&self, kind: RecordKind) -> Result<Vec<RecordRow>> {
        let inner = self.lock()?;
        let rows = match kind {
            RecordKind::Invoice => inner
                .invoices
                .values()
                .filter(|r| r.export_status == ExportStatus::Pending)
                .map(|r| RecordRow::Invoice(r.row.clone()))
                .collect(),
            RecordKind::Payment => inner
                .payments
                .values()
                .filter(|r| r.export_status == ExportStatus::Pending)
                .map(|r| RecordRow::Payment(r.row.clone()))
                .collect(),
        };
        Ok(rows)
    }

    async fn fetch_by_ids(&self, kind: RecordKind, ids: &[RecordId]) -> Result<Vec<RecordRow>> {
        let inner = self.lock()?;
        let rows = match kind {
            RecordKind::Invoice => ids
                .iter()
                .filter_map(|id| inner.invoices.get(&id.value()))
                .map(|r| RecordRow::Invoice(r.row.clone()))
                .collect(),
            RecordKind::Payment => ids
                .iter()
                .filter_map(|id| inner.payments.get(&id.value()))
                .map(|r| RecordRow::Payment(r.row.clone()))
                .collect(),
        };
        Ok(rows)
    }

    async fn commit_exported(
        &self,
        kind: RecordKind,
        ids: &[RecordId],
        file_name: &str,
        exported_at: DateTime<Utc>,
    ) -> Result<CommitOutcome> {
        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(LedgerSyncError::Store(format!(
                "Simulated commit failure for batch {file_name}"
            )));
        }

        let mut inner = self.lock()?;
        let mut exported = Vec::new();
        let mut stale = Vec::new();

        // Conditional claim: only records still pending transition
        for id in ids {
            let claimed = match kind {
                RecordKind::Invoice => inner
                    .invoices
                    .get_mut(&id.value())
                    .filter(|r| r.export_status == ExportStatus::Pending)
                    .map(|r| r.export_status = ExportStatus::Exported)
                    .is_some(),
                RecordKind::Payment => inner
                    .payments
                    .get_mut(&id.value())
                    .filter(|r| r.export_status == ExportStatus::Pending)
                    .map(|r| r.export_status = ExportStatus::Exported)
                    .is_some(),
            };
            if claimed {
                exported.push(*id);
            } else {
                stale.push(*id);
            }
        }

        for id in &exported {
            inner
                .audits
                .push(ExportAudit::success(kind, *id, exported_at));
        }

        Ok(CommitOutcome { exported, stale })
    }

    async fn append_failure_audits(
        &self,
        kind: RecordKind,
        ids: &[RecordId],
        error: &str,
        attempted_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut inner = self.lock()?;
        for id in ids {
            inner
                .audits
                .push(ExportAudit::failed(kind, *id, error, attempted_at));
        }
        Ok(())
    }

    async fn audit_history(&self, limit: usize) -> Result<Vec<ExportAudit>> {
        let inner = self.lock()?;
        let mut rows: Vec<ExportAudit> = inner.audits.iter().rev().take(limit).cloned().collect();
        // rev() already yields newest first for an append-only vec; keep the
        // ordering stable when created_at ties occur within one commit
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}
