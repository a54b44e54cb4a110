//! Domain error types
//!
//! Single error hierarchy for the crate. All variants carry domain-level
//! detail and never expose third-party types.

use crate::domain::ids::RecordId;
use thiserror::Error;

/// Main LedgerSync error type
///
/// `PartialCommit` is the only variant describing partial effect: the batch
/// artifact exists but some records were not confirmed exported. Every record
/// in its `failed` list also has a failed-outcome row in the audit ledger.
#[derive(Debug, Error)]
pub enum LedgerSyncError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Missing, malformed or unresolvable caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Caller role is not in the export allow-list
    #[error("Unauthorized: role `{role}` is not permitted to {action}")]
    Unauthorized { role: String, action: String },

    /// Artifact name collision in the sink
    #[error("Sink conflict: {0}")]
    SinkConflict(String),

    /// Export failed before any store mutation
    #[error("Export failed: {0}")]
    ExportFailed(String),

    /// Batch written but some status/audit commits did not complete
    #[error(
        "Partial commit for batch {file_name}: {exported} exported, {} not confirmed",
        failed.len()
    )]
    PartialCommit {
        file_name: String,
        exported: usize,
        failed: Vec<RecordId>,
    },

    /// Record store errors
    #[error("Store error: {0}")]
    Store(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl LedgerSyncError {
    /// Builds an `Unauthorized` error for an attempted action
    pub fn unauthorized(role: impl Into<String>, action: impl Into<String>) -> Self {
        Self::Unauthorized {
            role: role.into(),
            action: action.into(),
        }
    }
}

impl From<std::io::Error> for LedgerSyncError {
    fn from(err: std::io::Error) -> Self {
        LedgerSyncError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerSyncError {
    fn from(err: serde_json::Error) -> Self {
        LedgerSyncError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for LedgerSyncError {
    fn from(err: toml::de::Error) -> Self {
        LedgerSyncError::Configuration(format!("TOML parse error: {err}"))
    }
}
