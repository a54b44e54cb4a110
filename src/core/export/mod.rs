//! Export generation and reconciliation

pub mod outcome;
pub mod reconciler;

pub use outcome::{ExportOutcome, PendingOverview};
pub use reconciler::{ExportReconciler, ReconcilerConfig};
