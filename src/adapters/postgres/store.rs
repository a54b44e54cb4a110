//! PostgreSQL record store
//!
//! Implements [`RecordStore`] against the financial tables and the
//! `erp_exports` audit ledger. Export rows are denormalized at query time:
//! invoices join their client, payments join their invoice.

use super::client::PostgresClient;
use super::models;
use crate::adapters::store::{CommitOutcome, RecordStore};
use crate::domain::audit::{AuditOutcome, ExportAudit};
use crate::domain::ids::RecordId;
use crate::domain::record::{RecordKind, RecordRow};
use crate::domain::{LedgerSyncError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

const INVOICE_PROJECTION: &str = "SELECT i.id, i.reference, i.status, i.total_amount, \
     i.issued_on, c.name AS client_name, c.address AS client_address \
     FROM invoices i JOIN clients c ON c.id = i.client_id";

const PAYMENT_PROJECTION: &str = "SELECT p.id, p.reference, p.amount, p.payment_date, \
     p.payment_method, i.reference AS invoice_reference \
     FROM payments p JOIN invoices i ON i.id = p.invoice_id";

const INSERT_AUDIT: &str = "INSERT INTO erp_exports \
     (id, record_kind, record_id, outcome, error_message, export_date, created_at) \
     VALUES ($1, $2, $3, $4, $5, $6, $7)";

/// PostgreSQL-backed record store
pub struct PostgresStore {
    client: Arc<PostgresClient>,
}

impl PostgresStore {
    /// Creates a store over an existing client
    pub fn new(client: Arc<PostgresClient>) -> Self {
        Self { client }
    }

    fn rows_to_records(kind: RecordKind, rows: &[tokio_postgres::Row]) -> Result<Vec<RecordRow>> {
        rows.iter()
            .map(|row| match kind {
                RecordKind::Invoice => models::invoice_from_row(row).map(RecordRow::Invoice),
                RecordKind::Payment => models::payment_from_row(row).map(RecordRow::Payment),
            })
            .collect()
    }

    fn table(kind: RecordKind) -> &'static str {
        match kind {
            RecordKind::Invoice => "invoices",
            RecordKind::Payment => "payments",
        }
    }

    fn projection(kind: RecordKind) -> &'static str {
        match kind {
            RecordKind::Invoice => INVOICE_PROJECTION,
            RecordKind::Payment => PAYMENT_PROJECTION,
        }
    }

    fn id_column(kind: RecordKind) -> &'static str {
        match kind {
            RecordKind::Invoice => "i.id",
            RecordKind::Payment => "p.id",
        }
    }
}

#[async_trait]
impl RecordStore for PostgresStore {
    async fn list_pending(&self, kind: RecordKind) -> Result<Vec<RecordRow>> {
        let conn = self.client.get_connection().await?;

        let query = format!(
            "{} WHERE {}.export_status = 'pending' ORDER BY {}",
            Self::projection(kind),
            match kind {
                RecordKind::Invoice => "i",
                RecordKind::Payment => "p",
            },
            Self::id_column(kind),
        );

        let rows = conn
            .query(query.as_str(), &[])
            .await
            .map_err(|e| LedgerSyncError::Store(format!("Failed to list pending {kind}s: {e}")))?;

        Self::rows_to_records(kind, &rows)
    }

    async fn fetch_by_ids(&self, kind: RecordKind, ids: &[RecordId]) -> Result<Vec<RecordRow>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.client.get_connection().await?;
        let raw_ids: Vec<i64> = ids.iter().map(RecordId::value).collect();

        let query = format!(
            "{} WHERE {} = ANY($1)",
            Self::projection(kind),
            Self::id_column(kind),
        );

        let rows = conn
            .query(query.as_str(), &[&raw_ids])
            .await
            .map_err(|e| LedgerSyncError::Store(format!("Failed to fetch {kind}s by id: {e}")))?;

        Self::rows_to_records(kind, &rows)
    }

    async fn commit_exported(
        &self,
        kind: RecordKind,
        ids: &[RecordId],
        file_name: &str,
        exported_at: DateTime<Utc>,
    ) -> Result<CommitOutcome> {
        let mut conn = self.client.get_connection().await?;
        let tx = conn
            .transaction()
            .await
            .map_err(|e| LedgerSyncError::Store(format!("Failed to begin transaction: {e}")))?;

        let raw_ids: Vec<i64> = ids.iter().map(RecordId::value).collect();

        // The claim is conditional on pending so a record already taken by a
        // concurrent export is skipped, not overwritten.
        let claim_query = format!(
            "UPDATE {} SET export_status = 'exported' \
             WHERE id = ANY($1) AND export_status = 'pending' RETURNING id",
            Self::table(kind),
        );
        let claimed_rows = tx
            .query(claim_query.as_str(), &[&raw_ids])
            .await
            .map_err(|e| LedgerSyncError::Store(format!("Failed to claim {kind}s: {e}")))?;

        let mut claimed: Vec<i64> = Vec::with_capacity(claimed_rows.len());
        for row in &claimed_rows {
            let id: i64 = row
                .try_get(0)
                .map_err(|e| LedgerSyncError::Store(format!("Claim returned no id: {e}")))?;
            claimed.push(id);
        }

        let insert = tx
            .prepare(INSERT_AUDIT)
            .await
            .map_err(|e| LedgerSyncError::Store(format!("Failed to prepare audit insert: {e}")))?;

        let created_at = Utc::now();
        for id in &claimed {
            tx.execute(
                &insert,
                &[
                    &Uuid::new_v4(),
                    &kind.as_str(),
                    id,
                    &AuditOutcome::Success.as_str(),
                    &None::<String>,
                    &Some(exported_at),
                    &created_at,
                ],
            )
            .await
            .map_err(|e| LedgerSyncError::Store(format!("Failed to append audit row: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| LedgerSyncError::Store(format!("Failed to commit export batch: {e}")))?;

        // Caller order is preserved when partitioning into claimed and stale.
        let mut exported = Vec::new();
        let mut stale = Vec::new();
        for id in ids {
            if claimed.contains(&id.value()) {
                exported.push(*id);
            } else {
                stale.push(*id);
            }
        }

        tracing::debug!(
            kind = %kind,
            file_name = %file_name,
            exported = exported.len(),
            stale = stale.len(),
            "Export commit applied"
        );

        Ok(CommitOutcome { exported, stale })
    }

    async fn append_failure_audits(
        &self,
        kind: RecordKind,
        ids: &[RecordId],
        error: &str,
        attempted_at: DateTime<Utc>,
    ) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let conn = self.client.get_connection().await?;
        let insert = conn
            .prepare(INSERT_AUDIT)
            .await
            .map_err(|e| LedgerSyncError::Store(format!("Failed to prepare audit insert: {e}")))?;

        let created_at = Utc::now();
        for id in ids {
            conn.execute(
                &insert,
                &[
                    &Uuid::new_v4(),
                    &kind.as_str(),
                    &id.value(),
                    &AuditOutcome::Failed.as_str(),
                    &Some(error.to_string()),
                    &Some(attempted_at),
                    &created_at,
                ],
            )
            .await
            .map_err(|e| {
                LedgerSyncError::Store(format!("Failed to append failure audit: {e}"))
            })?;
        }

        Ok(())
    }

    async fn audit_history(&self, limit: usize) -> Result<Vec<ExportAudit>> {
        let conn = self.client.get_connection().await?;

        let rows = conn
            .query(
                "SELECT id, record_kind, record_id, outcome, error_message, \
                 export_date, created_at \
                 FROM erp_exports ORDER BY created_at DESC, id LIMIT $1",
                &[&(limit as i64)],
            )
            .await
            .map_err(|e| LedgerSyncError::Store(format!("Failed to load audit history: {e}")))?;

        rows.iter().map(models::audit_from_row).collect()
    }
}
