//! Integration tests for the export reconciler
//!
//! Exercises the full selection -> artifact -> commit flow against the
//! in-memory store and sink, including partial-failure paths.

use ledgersync::adapters::sink::{ArtifactSink, MemorySink};
use ledgersync::adapters::store::{MemoryStore, RecordStore};
use ledgersync::core::export::{ExportReconciler, ReconcilerConfig};
use ledgersync::domain::audit::AuditOutcome;
use ledgersync::domain::ids::RecordId;
use ledgersync::domain::principal::{Principal, Role};
use ledgersync::domain::record::{ExportStatus, InvoiceRow, PaymentRow, RecordKind};
use ledgersync::domain::LedgerSyncError;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::sync::Arc;

fn invoice(id: i64, reference: &str) -> InvoiceRow {
    InvoiceRow {
        id: RecordId::new(id).unwrap(),
        reference: reference.to_string(),
        status: "sent".to_string(),
        amount: dec!(1250.50),
        issued_on: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        client_name: "Durand BTP".to_string(),
        client_address: "12 rue des Lilas, Lyon".to_string(),
    }
}

fn payment(id: i64, reference: &str) -> PaymentRow {
    PaymentRow {
        id: RecordId::new(id).unwrap(),
        reference: reference.to_string(),
        amount: dec!(980.00),
        paid_on: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
        method: "bank_transfer".to_string(),
        invoice_reference: "INV-2026-001".to_string(),
    }
}

fn accountant() -> Principal {
    Principal::new("marie@example.com", Role::Accountant)
}

fn ids(raw: &[i64]) -> Vec<RecordId> {
    raw.iter().map(|id| RecordId::new(*id).unwrap()).collect()
}

fn setup() -> (Arc<MemoryStore>, Arc<MemorySink>, ExportReconciler) {
    let store = Arc::new(MemoryStore::new());
    let sink = Arc::new(MemorySink::new());
    let reconciler = ExportReconciler::new(
        Arc::clone(&store) as Arc<dyn RecordStore>,
        Arc::clone(&sink) as Arc<dyn ArtifactSink>,
        ReconcilerConfig::default(),
    );
    (store, sink, reconciler)
}

#[tokio::test]
async fn successful_export_writes_artifact_and_commits_all() {
    let (store, sink, reconciler) = setup();
    store.insert_invoice(invoice(1, "INV-2026-001"), ExportStatus::Pending);
    store.insert_invoice(invoice(2, "INV-2026-002"), ExportStatus::Pending);

    let outcome = reconciler
        .generate_export(&accountant(), RecordKind::Invoice, &ids(&[1, 2]))
        .await
        .unwrap();

    assert_eq!(outcome.record_count, 2);
    assert_eq!(outcome.checksum.len(), 64);
    assert!(outcome.file_name.starts_with("erp_export_invoice_"));
    assert!(outcome.file_name.ends_with(".json"));

    // Exactly one artifact, containing both entries in selection order
    assert_eq!(sink.artifact_count(), 1);
    let payload = sink.artifact(&outcome.file_name).unwrap();
    let entries: serde_json::Value = serde_json::from_str(&payload).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 2);
    assert_eq!(entries[0]["invoice_reference"], "INV-2026-001");
    assert_eq!(entries[1]["invoice_reference"], "INV-2026-002");
    assert_eq!(entries[0]["client"]["name"], "Durand BTP");
    assert_eq!(entries[0]["amount"], "1250.50");
    assert_eq!(entries[0]["date"], "2026-03-14");

    // Both records claimed, one success audit row each
    for id in ids(&[1, 2]) {
        assert_eq!(
            store.export_status_of(RecordKind::Invoice, id),
            Some(ExportStatus::Exported)
        );
    }
    let history = store.audit_history(10).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|row| row.is_success()));
    assert!(history
        .iter()
        .all(|row| row.exported_at == Some(outcome.exported_at)));
}

#[tokio::test]
async fn unknown_id_rejects_whole_selection_without_side_effects() {
    let (store, sink, reconciler) = setup();
    store.insert_invoice(invoice(1, "INV-2026-001"), ExportStatus::Pending);

    let err = reconciler
        .generate_export(&accountant(), RecordKind::Invoice, &ids(&[1, 99]))
        .await
        .unwrap_err();

    match err {
        LedgerSyncError::InvalidInput(msg) => assert!(msg.contains("99")),
        other => panic!("expected InvalidInput, got {other:?}"),
    }

    assert_eq!(sink.artifact_count(), 0);
    assert_eq!(store.audit_count(), 0);
    assert_eq!(
        store.export_status_of(RecordKind::Invoice, RecordId::new(1).unwrap()),
        Some(ExportStatus::Pending)
    );
}

#[tokio::test]
async fn sink_failure_leaves_records_pending_and_ledger_empty() {
    let (store, sink, reconciler) = setup();
    store.insert_invoice(invoice(1, "INV-2026-001"), ExportStatus::Pending);
    sink.fail_next_write();

    let err = reconciler
        .generate_export(&accountant(), RecordKind::Invoice, &ids(&[1]))
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerSyncError::ExportFailed(_)));
    assert_eq!(sink.artifact_count(), 0);
    assert_eq!(store.audit_count(), 0);
    assert_eq!(
        store.export_status_of(RecordKind::Invoice, RecordId::new(1).unwrap()),
        Some(ExportStatus::Pending)
    );
}

#[tokio::test]
async fn commit_failure_surfaces_partial_commit_with_failure_audits() {
    let (store, sink, reconciler) = setup();
    store.insert_invoice(invoice(1, "INV-2026-001"), ExportStatus::Pending);
    store.insert_invoice(invoice(2, "INV-2026-002"), ExportStatus::Pending);
    store.fail_next_commit();

    let err = reconciler
        .generate_export(&accountant(), RecordKind::Invoice, &ids(&[1, 2]))
        .await
        .unwrap_err();

    let (file_name, exported, failed) = match err {
        LedgerSyncError::PartialCommit {
            file_name,
            exported,
            failed,
        } => (file_name, exported, failed),
        other => panic!("expected PartialCommit, got {other:?}"),
    };

    // Artifact exists, nothing was claimed
    assert_eq!(exported, 0);
    assert_eq!(failed, ids(&[1, 2]));
    assert!(sink.artifact(&file_name).is_some());
    for id in ids(&[1, 2]) {
        assert_eq!(
            store.export_status_of(RecordKind::Invoice, id),
            Some(ExportStatus::Pending)
        );
    }

    // One failed audit row per unconfirmed record, naming the batch
    let history = store.audit_history(10).await.unwrap();
    assert_eq!(history.len(), 2);
    for row in &history {
        assert_eq!(row.outcome, AuditOutcome::Failed);
        assert!(row.error_message.as_deref().unwrap().contains(&file_name));
    }
}

#[tokio::test]
async fn record_claimed_by_concurrent_export_is_reported_stale() {
    let (store, _sink, reconciler) = setup();
    store.insert_invoice(invoice(1, "INV-2026-001"), ExportStatus::Pending);
    store.insert_invoice(invoice(2, "INV-2026-002"), ExportStatus::Pending);

    // A competing export already claimed record 2
    let claimed_at = chrono::Utc::now();
    let competing = store
        .commit_exported(
            RecordKind::Invoice,
            &ids(&[2]),
            "erp_export_invoice_other.json",
            claimed_at,
        )
        .await
        .unwrap();
    assert!(competing.is_complete());

    let err = reconciler
        .generate_export(&accountant(), RecordKind::Invoice, &ids(&[1, 2]))
        .await
        .unwrap_err();

    let (exported, failed) = match err {
        LedgerSyncError::PartialCommit {
            exported, failed, ..
        } => (exported, failed),
        other => panic!("expected PartialCommit, got {other:?}"),
    };

    // Record 1 was claimed by this export; record 2 kept its earlier claim
    assert_eq!(exported, 1);
    assert_eq!(failed, ids(&[2]));
    assert_eq!(
        store.export_status_of(RecordKind::Invoice, RecordId::new(1).unwrap()),
        Some(ExportStatus::Exported)
    );
    assert_eq!(
        store.export_status_of(RecordKind::Invoice, RecordId::new(2).unwrap()),
        Some(ExportStatus::Exported)
    );

    // Ledger: success for the earlier claim, success for record 1,
    // failed for this attempt's stale record 2
    let history = store.audit_history(10).await.unwrap();
    assert_eq!(history.len(), 3);
    let failed_rows: Vec<_> = history.iter().filter(|r| !r.is_success()).collect();
    assert_eq!(failed_rows.len(), 1);
    assert_eq!(failed_rows[0].record_id, RecordId::new(2).unwrap());
}

#[tokio::test]
async fn disjoint_kinds_export_concurrently() {
    let (store, sink, reconciler) = setup();
    store.insert_invoice(invoice(1, "INV-2026-001"), ExportStatus::Pending);
    store.insert_payment(payment(1, "PAY-0042"), ExportStatus::Pending);
    let reconciler = Arc::new(reconciler);

    let r1 = Arc::clone(&reconciler);
    let r2 = Arc::clone(&reconciler);
    let caller = accountant();
    let selection = ids(&[1]);
    let (a, b) = tokio::join!(
        r1.generate_export(&caller, RecordKind::Invoice, &selection),
        r2.generate_export(&caller, RecordKind::Payment, &selection),
    );

    let a = a.unwrap();
    let b = b.unwrap();
    assert_ne!(a.file_name, b.file_name);
    assert_eq!(sink.artifact_count(), 2);
    assert_eq!(store.audit_count(), 2);
}

#[tokio::test]
async fn list_pending_filters_and_denormalizes() {
    let (store, _sink, reconciler) = setup();
    store.insert_invoice(invoice(1, "INV-2026-001"), ExportStatus::Pending);
    store.insert_invoice(invoice(2, "INV-2026-002"), ExportStatus::Exported);
    store.insert_invoice(invoice(3, "INV-2026-003"), ExportStatus::Failed);
    store.insert_payment(payment(1, "PAY-0042"), ExportStatus::Pending);

    let pending = reconciler.list_pending(RecordKind::Invoice).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].reference(), "INV-2026-001");
    match &pending[0] {
        ledgersync::domain::record::RecordRow::Invoice(row) => {
            assert_eq!(row.client_name, "Durand BTP");
            assert_eq!(row.client_address, "12 rue des Lilas, Lyon");
        }
        other => panic!("expected invoice row, got {other:?}"),
    }

    let overview = reconciler.pending_overview().await.unwrap();
    assert_eq!(overview.invoices, 1);
    assert_eq!(overview.payments, 1);
}

#[tokio::test]
async fn history_is_newest_first_and_append_only() {
    let (store, _sink, reconciler) = setup();
    store.insert_invoice(invoice(1, "INV-2026-001"), ExportStatus::Pending);
    store.insert_payment(payment(1, "PAY-0042"), ExportStatus::Pending);

    reconciler
        .generate_export(&accountant(), RecordKind::Invoice, &ids(&[1]))
        .await
        .unwrap();
    let after_first = reconciler.history(&accountant(), None).await.unwrap();
    assert_eq!(after_first.len(), 1);

    reconciler
        .generate_export(&accountant(), RecordKind::Payment, &ids(&[1]))
        .await
        .unwrap();
    let after_second = reconciler.history(&accountant(), None).await.unwrap();

    // Earlier rows are still present and ordering is newest first
    assert_eq!(after_second.len(), 2);
    assert_eq!(after_second[0].record_kind, RecordKind::Payment);
    assert_eq!(after_second[1].id, after_first[0].id);
    assert!(after_second[0].created_at >= after_second[1].created_at);

    // An explicit limit truncates
    let limited = reconciler.history(&accountant(), Some(1)).await.unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].record_kind, RecordKind::Payment);
}

#[tokio::test]
async fn export_and_history_are_denied_outside_allow_list() {
    let (store, sink, reconciler) = setup();
    store.insert_invoice(invoice(1, "INV-2026-001"), ExportStatus::Pending);

    for role in [Role::Commercial, Role::Director] {
        let caller = Principal::new("paul@example.com", role);

        let err = reconciler
            .generate_export(&caller, RecordKind::Invoice, &ids(&[1]))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerSyncError::Unauthorized { .. }));

        let err = reconciler.history(&caller, None).await.unwrap_err();
        assert!(matches!(err, LedgerSyncError::Unauthorized { .. }));
    }

    // Denied attempts leave no trace
    assert_eq!(sink.artifact_count(), 0);
    assert_eq!(store.audit_count(), 0);

    // Listing the pending set needs no particular role
    let pending = reconciler.list_pending(RecordKind::Invoice).await.unwrap();
    assert_eq!(pending.len(), 1);
}

#[tokio::test]
async fn failed_status_is_terminal_for_selection() {
    let (store, _sink, reconciler) = setup();
    store.insert_invoice(invoice(1, "INV-2026-001"), ExportStatus::Failed);

    // A failed record resolves but is stale at commit time, so the attempt
    // surfaces as a partial commit rather than silently re-exporting it
    let err = reconciler
        .generate_export(&accountant(), RecordKind::Invoice, &ids(&[1]))
        .await
        .unwrap_err();

    match err {
        LedgerSyncError::PartialCommit {
            exported, failed, ..
        } => {
            assert_eq!(exported, 0);
            assert_eq!(failed, ids(&[1]));
        }
        other => panic!("expected PartialCommit, got {other:?}"),
    }
    assert_eq!(
        store.export_status_of(RecordKind::Invoice, RecordId::new(1).unwrap()),
        Some(ExportStatus::Failed)
    );
}
