//! Domain models and types for LedgerSync.
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`RecordId`])
//! - **Financial record projections** ([`InvoiceRow`], [`PaymentRow`], [`RecordRow`])
//! - **The audit ledger row** ([`ExportAudit`])
//! - **The ephemeral export batch** ([`ExportBatch`])
//! - **Caller identity** ([`Principal`], [`Role`])
//! - **Error types** ([`LedgerSyncError`]) and the [`Result`] alias
//!
//! # Type Safety
//!
//! Identifiers use the newtype pattern so an invoice id can never be passed
//! where a raw integer is expected without validation:
//!
//! ```rust
//! use ledgersync::domain::RecordId;
//!
//! let id = RecordId::new(42).unwrap();
//! assert!(RecordId::new(-1).is_err());
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T>`]:
//!
//! ```rust
//! use ledgersync::domain::{LedgerSyncError, Result};
//!
//! fn example() -> Result<()> {
//!     Err(LedgerSyncError::InvalidInput("empty id set".to_string()))
//! }
//! ```

pub mod audit;
pub mod batch;
pub mod errors;
pub mod ids;
pub mod principal;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use audit::{AuditOutcome, ExportAudit};
pub use batch::ExportBatch;
pub use errors::LedgerSyncError;
pub use ids::RecordId;
pub use principal::{Principal, Role};
pub use record::{
    ClientSnapshot, ExportStatus, InvoiceRow, InvoiceSnapshot, PaymentRow, PaymentSnapshot,
    RecordKind, RecordRow, RecordSnapshot,
};
pub use result::Result;
