//! Export command implementation
//!
//! Generates one export batch for a comma-separated record selection. The
//! caller's role stands in for the identity the upstream web layer would
//! attach; credentials are never checked here.

use crate::config::load_config;
use crate::domain::ids::RecordId;
use crate::domain::principal::{Principal, Role};
use crate::domain::record::RecordKind;
use crate::domain::LedgerSyncError;
use clap::Args;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Record kind to export (invoice or payment)
    #[arg(long)]
    pub kind: String,

    /// Record id(s) to export (comma-separated)
    #[arg(long)]
    pub ids: String,

    /// Caller role (admin, commercial, director, accountant)
    #[arg(long)]
    pub role: String,

    /// Caller identity recorded in logs
    #[arg(long, default_value = "cli")]
    pub actor: String,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Configuration validation failed");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let kind = match self.kind.parse::<RecordKind>() {
            Ok(k) => k,
            Err(e) => {
                eprintln!("Invalid --kind: {e}");
                return Ok(3);
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

        let ids = match parse_ids(&self.ids) {
            Ok(ids) => ids,
            Err(e) => {
                eprintln!("Invalid --ids: {e}");
                return Ok(3);
            }
        };

        if !self.yes {
            println!("Export Selection:");
            println!("  Kind: {kind}");
            println!("  Records: {}", ids.len());
            println!("  Caller: {principal}");
            println!("  Sink directory: {}", config.sink.directory);
            println!();
            print!("Proceed with export? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Export cancelled.");
                return Ok(0);
            }
        }

        let reconciler = match super::build_reconciler(&config).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize export");
                eprintln!("Failed to initialize export: {e}");
                return Ok(4);
            }
        };

        match reconciler.generate_export(&principal, kind, &ids).await {
            Ok(outcome) => {
                println!();
                println!("Export Summary:");
                println!("  File: {}", outcome.file_name);
                println!("  Records exported: {}", outcome.record_count);
                println!("  Checksum (SHA-256): {}", outcome.checksum);
                println!(
                    "  Exported at: {}",
                    outcome.exported_at.format("%Y-%m-%d %H:%M:%S UTC")
                );
                println!();
                println!("Export completed successfully.");
                Ok(0)
            }
            Err(LedgerSyncError::PartialCommit {
                file_name,
                exported,
                failed,
            }) => {
                println!();
                println!("Export partially committed:");
                println!("  File: {file_name}");
                println!("  Records confirmed: {exported}");
                println!(
                    "  Records not confirmed: {}",
                    failed
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                println!();
                println!("The batch artifact exists; unconfirmed records stay pending");
                println!("and each has a failed audit row. Review the ledger with");
                println!("'ledgersync history' before re-exporting.");
                Ok(1)
            }
            Err(e @ LedgerSyncError::Unauthorized { .. })
            | Err(e @ LedgerSyncError::InvalidInput(_)) => {
                eprintln!("Export rejected: {e}");
                Ok(3)
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "generate_export");
                eprintln!("Export failed: {e}");
                Ok(5)
            }
        }
    }
}

/// Parses a comma-separated id list
fn parse_ids(input: &str) -> Result<Vec<RecordId>, String> {
    let ids: Result<Vec<RecordId>, String> = input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<RecordId>())
        .collect();

    let ids = ids?;
    if ids.is_empty() {
        return Err("id list is empty".to_string());
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ids_valid() {
        let ids = parse_ids("1, 2,3").unwrap();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[0].value(), 1);
        assert_eq!(ids[2].value(), 3);
    }

    #[test]
    fn test_parse_ids_rejects_garbage() {
        assert!(parse_ids("1,x").is_err());
        assert!(parse_ids("0").is_err());
        assert!(parse_ids("").is_err());
        assert!(parse_ids(" , ").is_err());
    }

    #[test]
    fn test_export_args_defaults() {
        let args = ExportArgs {
            kind: "invoice".to_string(),
            ids: "1,2".to_string(),
            role: "accountant".to_string(),
            actor: "cli".to_string(),
            yes: false,
        };

        assert!(!args.yes);
        assert_eq!(args.actor, "cli");
    }
}
