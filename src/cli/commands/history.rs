//! History command implementation
//!
//! Displays the export audit ledger, newest rows first.

use crate::config::load_config;
use crate::domain::principal::{Principal, Role};
use crate::domain::LedgerSyncError;
use clap::Args;

/// Arguments for the history command
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Maximum number of rows to show (defaults to the configured limit)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Caller role (admin, commercial, director, accountant)
    #[arg(long)]
    pub role: String,

    /// Caller identity recorded in logs
    #[arg(long, default_value = "cli")]
    pub actor: String,
}

impl HistoryArgs {
    /// Execute the history command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Reading export history");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let role = match self.role.parse::<Role>() {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Invalid --role: {e}");
                return Ok(3);
            }
        };
        let principal = Principal::new(self.actor.clone(), role);

        let reconciler = match super::build_reconciler(&config).await {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Failed to connect to record store: {e}");
                return Ok(4);
            }
        };

        let rows = match reconciler.history(&principal, self.limit).await {
            Ok(rows) => rows,
            Err(e @ LedgerSyncError::Unauthorized { .. })
            | Err(e @ LedgerSyncError::InvalidInput(_)) => {
                eprintln!("History request rejected: {e}");
                return Ok(3);
            }
            Err(e) => {
                eprintln!("Failed to load export history: {e}");
                return Ok(5);
            }
        };

        if rows.is_empty() {
            println!("No export history found.");
            println!("Run 'ledgersync export' to generate a batch.");
            return Ok(0);
        }

        println!("Found {} audit row(s):", rows.len());
        println!();
        println!(
            "{:<10} {:<8} {:<10} {:<22} {:<40}",
            "Kind", "Record", "Outcome", "Exported At", "Error"
        );
        println!("{}", "-".repeat(92));

        for row in &rows {
            let exported_at = row
                .exported_at
                .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string());

            println!(
                "{:<10} {:<8} {:<10} {:<22} {:<40}",
                row.record_kind,
                row.record_id,
                row.outcome,
                exported_at,
                row.error_message.as_deref().unwrap_or("-")
            );
        }
        println!();

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_args_defaults() {
        let args = HistoryArgs {
            limit: None,
            role: "admin".to_string(),
            actor: "cli".to_string(),
        };

        assert!(args.limit.is_none());
        assert_eq!(args.actor, "cli");
    }
}
