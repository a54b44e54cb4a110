//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for LedgerSync using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// LedgerSync - ERP export reconciler
#[derive(Parser, Debug)]
#[command(name = "ledgersync")]
#[command(version, about, long_about = None)]
#[command(author = "LedgerSync Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "ledgersync.toml", env = "LEDGERSYNC_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LEDGERSYNC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List records awaiting export
    Pending(commands::pending::PendingArgs),

    /// Generate an export batch for selected records
    Export(commands::export::ExportArgs),

    /// Show the export audit ledger, newest first
    History(commands::history::HistoryArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_pending() {
        let cli = Cli::parse_from(["ledgersync", "pending"]);
        assert_eq!(cli.config, "ledgersync.toml");
        assert!(matches!(cli.command, Commands::Pending(_)));
    }

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from([
            "ledgersync",
            "export",
            "--kind",
            "invoice",
            "--ids",
            "1,2,3",
            "--role",
            "accountant",
        ]);
        assert!(matches!(cli.command, Commands::Export(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["ledgersync", "--config", "custom.toml", "pending"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["ledgersync", "--log-level", "debug", "pending"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_history() {
        let cli = Cli::parse_from(["ledgersync", "history", "--role", "admin"]);
        assert!(matches!(cli.command, Commands::History(_)));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["ledgersync", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["ledgersync", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
