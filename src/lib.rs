// LedgerSync - ERP Export Reconciler
// Copyright (c) 2026 LedgerSync Contributors
// Licensed under the MIT License

//! # LedgerSync - ERP Export Reconciler
//!
//! LedgerSync selects pending financial records from a business-management
//! database, writes them as JSON export batches for an external ERP system,
//! and reconciles export state with an append-only audit ledger.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Selecting** pending invoices and payments, denormalized for export
//! - **Writing** one immutable batch artifact per export attempt
//! - **Committing** status updates and success audit rows atomically
//! - **Recording** every attempt, failed or not, in the audit ledger
//!
//! ## Architecture
//!
//! LedgerSync follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Export generation and reconciliation
//! - [`adapters`] - Record stores (PostgreSQL, in-memory) and artifact sinks
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ledgersync::adapters::sink::FilesystemSink;
//! use ledgersync::adapters::store::MemoryStore;
//! use ledgersync::core::export::{ExportReconciler, ReconcilerConfig};
//! use ledgersync::domain::principal::{Principal, Role};
//! use ledgersync::domain::record::RecordKind;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryStore::new());
//!     let sink = Arc::new(FilesystemSink::new("exports"));
//!     let reconciler = ExportReconciler::new(store, sink, ReconcilerConfig::default());
//!
//!     let caller = Principal::new("marie@example.com", Role::Accountant);
//!     let pending = reconciler.list_pending(RecordKind::Invoice).await?;
//!     let ids: Vec<_> = pending.iter().map(|row| row.id()).collect();
//!
//!     let outcome = reconciler
//!         .generate_export(&caller, RecordKind::Invoice, &ids)
//!         .await?;
//!     println!("Wrote {} ({} records)", outcome.file_name, outcome.record_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! LedgerSync uses the [`domain::LedgerSyncError`] type for all errors. The
//! `PartialCommit` variant is the one partial-effect case: the batch artifact
//! exists but some records were not confirmed exported. Those records keep
//! `export_status = pending` and each has a failed-outcome audit row.
//!
//! ## Logging
//!
//! LedgerSync uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn, error};
//!
//! info!("Starting export");
//! warn!(record_id = 42, "Record no longer pending at commit time");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
