//! Pending command implementation
//!
//! Shows records awaiting export, either as a per-kind table or as an
//! overview of both kinds.

use crate::config::load_config;
use crate::domain::record::{RecordKind, RecordRow};
use clap::Args;

/// Arguments for the pending command
#[derive(Args, Debug)]
pub struct PendingArgs {
    /// Restrict to one record kind (invoice or payment)
    #[arg(long)]
    pub kind: Option<String>,
}

impl PendingArgs {
    /// Execute the pending command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Listing pending records");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let kind = match &self.kind {
            Some(raw) => match raw.parse::<RecordKind>() {
                Ok(k) => Some(k),
                Err(e) => {
                    eprintln!("Invalid --kind: {e}");
                    return Ok(3);
                }
            },
            None => None,
        };

        let reconciler = match super::build_reconciler(&config).await {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Failed to connect to record store: {e}");
                return Ok(4);
            }
        };

        match kind {
            Some(kind) => {
                let rows = match reconciler.list_pending(kind).await {
                    Ok(rows) => rows,
                    Err(e) => {
                        eprintln!("Failed to list pending {kind}s: {e}");
                        return Ok(5);
                    }
                };

                if rows.is_empty() {
                    println!("No pending {kind}s.");
                    return Ok(0);
                }

                println!("Found {} pending {}(s):", rows.len(), kind);
                println!();
                print_rows(&rows);
            }
            None => {
                let overview = match reconciler.pending_overview().await {
                    Ok(o) => o,
                    Err(e) => {
                        eprintln!("Failed to load pending overview: {e}");
                        return Ok(5);
                    }
                };

                println!("Pending records:");
                println!("  Invoices: {}", overview.invoices);
                println!("  Payments: {}", overview.payments);
                println!("  Total:    {}", overview.total());
                println!();
                println!("Use --kind to list individual records.");
            }
        }

        Ok(0)
    }
}

fn print_rows(rows: &[RecordRow]) {
    println!(
        "{:<8} {:<20} {:<12} {:<12} {:<30}",
        "Id", "Reference", "Amount", "Date", "Counterparty"
    );
    println!("{}", "-".repeat(84));

    for row in rows {
        match row {
            RecordRow::Invoice(inv) => {
                println!(
                    "{:<8} {:<20} {:<12} {:<12} {:<30}",
                    inv.id,
                    inv.reference,
                    inv.amount.to_string(),
                    inv.issued_on.format("%Y-%m-%d").to_string(),
                    inv.client_name
                );
            }
            RecordRow::Payment(pay) => {
                println!(
                    "{:<8} {:<20} {:<12} {:<12} {:<30}",
                    pay.id,
                    pay.reference,
                    pay.amount.to_string(),
                    pay.paid_on.format("%Y-%m-%d").to_string(),
                    pay.invoice_reference
                );
            }
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_args_defaults() {
        let args = PendingArgs { kind: None };
        assert!(args.kind.is_none());
    }
}
