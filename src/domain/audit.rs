//! Export audit ledger rows
//!
//! Every attempted export of a record appends exactly one audit row. Rows are
//! never mutated after creation; the ledger, not the mutable `export_status`
//! column, is the source of truth for what was attempted and when.

use crate::domain::ids::RecordId;
use crate::domain::record::RecordKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Outcome recorded for one export attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    /// Attempt recorded but not yet resolved
    Pending,
    /// Record confirmed exported in this attempt
    Success,
    /// Record not confirmed exported in this attempt
    Failed,
}

impl AuditOutcome {
    /// Returns the outcome as the lowercase string used in storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AuditOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            other => Err(format!(
                "Invalid audit outcome: {other}. Must be one of: pending, success, failed"
            )),
        }
    }
}

/// One row of the append-only export audit ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportAudit {
    /// Ledger row identifier
    pub id: Uuid,
    /// Kind of the record this attempt targeted
    pub record_kind: RecordKind,
    /// Identifier of the targeted record
    pub record_id: RecordId,
    /// Outcome of the attempt
    pub outcome: AuditOutcome,
    /// Failure detail, present only for failed outcomes
    pub error_message: Option<String>,
    /// Batch export timestamp, present when an artifact was produced
    pub exported_at: Option<DateTime<Utc>>,
    /// Ledger row creation timestamp
    pub created_at: DateTime<Utc>,
}

impl ExportAudit {
    /// Creates a success row for a record confirmed exported at `exported_at`
    pub fn success(kind: RecordKind, record_id: RecordId, exported_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            record_kind: kind,
            record_id,
            outcome: AuditOutcome::Success,
            error_message: None,
            exported_at: Some(exported_at),
            created_at: Utc::now(),
        }
    }

    /// Creates a failed row carrying the failure detail
    pub fn failed(
        kind: RecordKind,
        record_id: RecordId,
        error: impl Into<String>,
        attempted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            record_kind: kind,
            record_id,
            outcome: AuditOutcome::Failed,
            error_message: Some(error.into()),
            exported_at: Some(attempted_at),
            created_at: Utc::now(),
        }
    }

    /// Returns true if this row records a confirmed export
    pub fn is_success(&self) -> bool {
        self.outcome == AuditOutcome::Success
    }
}
