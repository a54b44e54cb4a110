//! Record store abstraction and backends
//!
//! - [`traits`] - the [`RecordStore`] seam consumed by the reconciler
//! - [`memory`] - mutex-guarded in-memory backend (tests, `memory` backend)

pub mod memory;
pub mod traits;

pub use memory::MemoryStore;
pub use traits::{CommitOutcome, RecordStore};

use crate::adapters::postgres::{PostgresClient, PostgresStore};
use crate::config::schema::StoreBackend;
use crate::config::LedgerSyncConfig;
use crate::domain::{LedgerSyncError, Result};
use std::sync::Arc;

/// Creates the record store named by `store_backend`
///
/// The PostgreSQL backend verifies connectivity and ensures the schema
/// before returning.
///
/// # Errors
///
/// Returns an error if the backend is misconfigured or unreachable.
pub async fn create_record_store(config: &LedgerSyncConfig) -> Result<Arc<dyn RecordStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory record store; data will not persist");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let pg_config = config.postgres.as_ref().ok_or_else(|| {
                LedgerSyncError::Configuration(
                    "postgres section is required when store_backend is postgres".to_string(),
                )
            })?;

            let client = Arc::new(PostgresClient::new(pg_config)?);
            client.test_connection().await?;
            client.ensure_schema().await?;

            Ok(Arc::new(PostgresStore::new(client)))
        }
    }
}
