//! Result type alias for LedgerSync

use super::errors::LedgerSyncError;

/// Result type alias used throughout the crate for fallible operations
pub type Result<T> = std::result::Result<T, LedgerSyncError>;
