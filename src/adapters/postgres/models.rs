//! Row-to-DTO conversions for the PostgreSQL store

use crate::domain::audit::{AuditOutcome, ExportAudit};
use crate::domain::ids::RecordId;
use crate::domain::record::{InvoiceRow, PaymentRow, RecordKind};
use crate::domain::{LedgerSyncError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tokio_postgres::Row;
use uuid::Uuid;

fn record_id(row: &Row, column: &str) -> Result<RecordId> {
    let raw: i64 = row
        .try_get(column)
        .map_err(|e| LedgerSyncError::Store(format!("Missing {column} column: {e}")))?;
    RecordId::new(raw).map_err(LedgerSyncError::Store)
}

fn get<'a, T: tokio_postgres::types::FromSql<'a>>(row: &'a Row, column: &str) -> Result<T> {
    row.try_get(column)
        .map_err(|e| LedgerSyncError::Store(format!("Missing {column} column: {e}")))
}

/// Converts an invoice projection row (invoices JOIN clients)
pub fn invoice_from_row(row: &Row) -> Result<InvoiceRow> {
    Ok(InvoiceRow {
        id: record_id(row, "id")?,
        reference: get::<String>(row, "reference")?,
        status: get::<String>(row, "status")?,
        amount: get::<Decimal>(row, "total_amount")?,
        issued_on: get::<NaiveDate>(row, "issued_on")?,
        client_name: get::<String>(row, "client_name")?,
        client_address: get::<String>(row, "client_address")?,
    })
}

/// Converts a payment projection row (payments JOIN invoices)
pub fn payment_from_row(row: &Row) -> Result<PaymentRow> {
    Ok(PaymentRow {
        id: record_id(row, "id")?,
        reference: get::<String>(row, "reference")?,
        amount: get::<Decimal>(row, "amount")?,
        paid_on: get::<NaiveDate>(row, "payment_date")?,
        method: get::<String>(row, "payment_method")?,
        invoice_reference: get::<String>(row, "invoice_reference")?,
    })
}

/// Converts an erp_exports ledger row
pub fn audit_from_row(row: &Row) -> Result<ExportAudit> {
    let kind_raw: String = get(row, "record_kind")?;
    let outcome_raw: String = get(row, "outcome")?;

    Ok(ExportAudit {
        id: get::<Uuid>(row, "id")?,
        record_kind: kind_raw
            .parse::<RecordKind>()
            .map_err(LedgerSyncError::Store)?,
        record_id: record_id(row, "record_id")?,
        outcome: outcome_raw
            .parse::<AuditOutcome>()
            .map_err(LedgerSyncError::Store)?,
        error_message: get::<Option<String>>(row, "error_message")?,
        exported_at: get::<Option<DateTime<Utc>>>(row, "export_date")?,
        created_at: get::<DateTime<Utc>>(row, "created_at")?,
    })
}
