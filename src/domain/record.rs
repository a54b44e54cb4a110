//! Financial record kinds, export statuses and flat projections
//!
//! The reconciler consumes flat DTOs produced by explicit joins at the store
//! boundary, never live object graphs. Snapshot types define the exact field
//! order written into an export artifact.

use crate::domain::ids::RecordId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of financial record eligible for export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Client invoice
    Invoice,
    /// Payment against an invoice
    Payment,
}

impl RecordKind {
    /// Returns the kind as the lowercase string used in storage and file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Payment => "payment",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "invoice" => Ok(Self::Invoice),
            "payment" => Ok(Self::Payment),
            other => Err(format!(
                "Invalid record kind: {other}. Must be one of: invoice, payment"
            )),
        }
    }
}

/// Export status of a financial record
///
/// Transitions only `pending -> exported` and `pending -> failed`. The
/// reconciler never auto-retries; resetting `failed` back to `pending` is an
/// external operator action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportStatus {
    /// Awaiting export
    Pending,
    /// Successfully exported
    Exported,
    /// Export attempted and failed
    Failed,
}

impl ExportStatus {
    /// Returns the status as the lowercase string used in storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Exported => "exported",
            Self::Failed => "failed",
        }
    }
}

impl Default for ExportStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for ExportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "exported" => Ok(Self::Exported),
            "failed" => Ok(Self::Failed),
            other => Err(format!(
                "Invalid export status: {other}. Must be one of: pending, exported, failed"
            )),
        }
    }
}

/// Flat invoice projection with client denormalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRow {
    /// Store identifier
    pub id: RecordId,
    /// Immutable invoice reference, unique across invoices
    pub reference: String,
    /// Invoice lifecycle status (draft, sent, paid, overdue)
    pub status: String,
    /// Invoice total, non-negative
    pub amount: Decimal,
    /// Issue date
    pub issued_on: NaiveDate,
    /// Denormalized client name
    pub client_name: String,
    /// Denormalized client postal address
    pub client_address: String,
}

/// Flat payment projection with linked invoice denormalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRow {
    /// Store identifier
    pub id: RecordId,
    /// Immutable payment reference, unique across payments
    pub reference: String,
    /// Payment amount, non-negative
    pub amount: Decimal,
    /// Payment date
    pub paid_on: NaiveDate,
    /// Payment method (bank_transfer, check, cash)
    pub method: String,
    /// Reference of the invoice this payment settles
    pub invoice_reference: String,
}

/// A resolved financial record, already denormalized for export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordRow {
    Invoice(InvoiceRow),
    Payment(PaymentRow),
}

impl RecordRow {
    /// Returns the record's store identifier
    pub fn id(&self) -> RecordId {
        match self {
            Self::Invoice(row) => row.id,
            Self::Payment(row) => row.id,
        }
    }

    /// Returns the record's kind
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Invoice(_) => RecordKind::Invoice,
            Self::Payment(_) => RecordKind::Payment,
        }
    }

    /// Returns the record's immutable reference string
    pub fn reference(&self) -> &str {
        match self {
            Self::Invoice(row) => &row.reference,
            Self::Payment(row) => &row.reference,
        }
    }

    /// Builds the ERP-facing snapshot for this record
    pub fn snapshot(&self) -> RecordSnapshot {
        match self {
            Self::Invoice(row) => RecordSnapshot::Invoice(InvoiceSnapshot {
                invoice_reference: row.reference.clone(),
                date: row.issued_on,
                client: ClientSnapshot {
                    name: row.client_name.clone(),
                    address: row.client_address.clone(),
                },
                amount: row.amount,
                status: row.status.clone(),
            }),
            Self::Payment(row) => RecordSnapshot::Payment(PaymentSnapshot {
                payment_reference: row.reference.clone(),
                date: row.paid_on,
                amount: row.amount,
                method: row.method.clone(),
                invoice_reference: row.invoice_reference.clone(),
            }),
        }
    }
}

/// Denormalized client fields embedded in an invoice snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSnapshot {
    pub name: String,
    pub address: String,
}

/// Invoice entry as written into an export artifact
///
/// Field order is stable and load-bearing for the external system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceSnapshot {
    pub invoice_reference: String,
    pub date: NaiveDate,
    pub client: ClientSnapshot,
    pub amount: Decimal,
    pub status: String,
}

/// Payment entry as written into an export artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSnapshot {
    pub payment_reference: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub method: String,
    pub invoice_reference: String,
}

/// One serialized entry of an export batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordSnapshot {
    Invoice(InvoiceSnapshot),
    Payment(PaymentSnapshot),
}
