//! Export operation results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of a fully successful export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOutcome {
    /// Name of the batch artifact written to the sink
    pub file_name: String,
    /// Number of records confirmed exported
    pub record_count: usize,
    /// SHA-256 checksum of the artifact payload, hex encoded
    pub checksum: String,
    /// Batch generation timestamp recorded in the audit rows
    pub exported_at: DateTime<Utc>,
}

/// Counts of records awaiting export, per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOverview {
    pub invoices: usize,
    pub payments: usize,
}

impl PendingOverview {
    /// Total pending records across both kinds
    pub fn total(&self) -> usize {
        self.invoices + self.payments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_overview_total() {
        let overview = PendingOverview {
            invoices: 3,
            payments: 2,
        };
        assert_eq!(overview.total(), 5);
    }
}
