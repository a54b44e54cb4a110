//! CLI command implementations

pub mod export;
pub mod history;
pub mod init;
pub mod pending;
pub mod validate;

use crate::adapters::sink::FilesystemSink;
use crate::adapters::store::create_record_store;
use crate::config::LedgerSyncConfig;
use crate::core::export::{ExportReconciler, ReconcilerConfig};
use std::sync::Arc;

/// Builds a reconciler from configuration, connecting the store backend
pub(crate) async fn build_reconciler(
    config: &LedgerSyncConfig,
) -> crate::domain::Result<ExportReconciler> {
    let store = create_record_store(config).await?;
    let sink = Arc::new(FilesystemSink::new(&config.sink.directory));
    let reconciler_config = ReconcilerConfig::from_settings(&config.export, &config.sink)?;
    Ok(ExportReconciler::new(store, sink, reconciler_config))
}
