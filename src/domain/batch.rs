//! Ephemeral export batch
//!
//! One batch per `GenerateExport` call: an ordered list of record snapshots,
//! a generation timestamp and a stable file name. The batch is written once to
//! the artifact sink and never persisted as an entity.

use crate::domain::record::{RecordKind, RecordSnapshot};
use crate::domain::Result;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// An export batch ready to be written to the artifact sink
#[derive(Debug, Clone)]
pub struct ExportBatch {
    /// Kind of every record in the batch
    pub kind: RecordKind,
    /// File name derived from kind + generation timestamp
    pub file_name: String,
    /// Generation timestamp, also the export timestamp recorded in audit rows
    pub generated_at: DateTime<Utc>,
    /// Snapshots in caller-supplied order
    pub entries: Vec<RecordSnapshot>,
}

impl ExportBatch {
    /// Creates a batch, deriving its file name from prefix, kind and timestamp
    ///
    /// The timestamp format matches the external system's ingest convention:
    /// `{prefix}_{kind}_{YYYYmmdd_HHMMSS}.json`.
    pub fn new(
        prefix: &str,
        kind: RecordKind,
        generated_at: DateTime<Utc>,
        entries: Vec<RecordSnapshot>,
    ) -> Self {
        let file_name = format!(
            "{}_{}_{}.json",
            prefix,
            kind.as_str(),
            generated_at.format("%Y%m%d_%H%M%S")
        );
        Self {
            kind,
            file_name,
            generated_at,
            entries,
        }
    }

    /// Number of entries in the batch
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the batch has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes the batch entries as the artifact payload
    ///
    /// Pretty-printed JSON array, one object per record, stable field order.
    pub fn payload(&self) -> Result<String> {
        let payload = serde_json::to_string_pretty(&self.entries)?;
        Ok(payload)
    }

    /// SHA-256 checksum of the artifact payload, hex encoded
    pub fn checksum(&self) -> Result<String> {
        let payload = self.payload()?;
        let mut hasher = Sha256::new();
        hasher.update(payload.as_bytes());
        let digest = hasher.finalize();
        Ok(digest.iter().map(|b| format!("{b:02x}")).collect())
    }
}
