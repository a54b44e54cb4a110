//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::LedgerSyncConfig;
use crate::domain::errors::LedgerSyncError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`LedgerSyncConfig`]
/// 4. Applies environment variable overrides (`LEDGERSYNC_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, a referenced environment
/// variable is unset, TOML parsing fails, or validation fails.
pub fn load_config(path: impl AsRef<Path>) -> Result<LedgerSyncConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(LedgerSyncError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        LedgerSyncError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: LedgerSyncConfig = toml::from_str(&contents)
        .map_err(|e| LedgerSyncError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate()?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched so commented-out examples don't require
/// the variables they mention.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is valid");
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(LedgerSyncError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `LEDGERSYNC_*` prefix
///
/// Variables follow the pattern `LEDGERSYNC_<SECTION>_<KEY>`, e.g.
/// `LEDGERSYNC_SINK_DIRECTORY` or `LEDGERSYNC_EXPORT_HISTORY_LIMIT`.
fn apply_env_overrides(config: &mut LedgerSyncConfig) {
    if let Ok(val) = std::env::var("LEDGERSYNC_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("LEDGERSYNC_SINK_DIRECTORY") {
        config.sink.directory = val;
    }
    if let Ok(val) = std::env::var("LEDGERSYNC_SINK_FILE_PREFIX") {
        config.sink.file_prefix = val;
    }

    if let Ok(val) = std::env::var("LEDGERSYNC_EXPORT_HISTORY_LIMIT") {
        if let Ok(limit) = val.parse() {
            config.export.history_limit = limit;
        }
    }
    if let Ok(val) = std::env::var("LEDGERSYNC_EXPORT_ALLOWED_ROLES") {
        config.export.allowed_roles = val
            .split(',')
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
    }

    if let Some(ref mut pg) = config.postgres {
        if let Ok(val) = std::env::var("LEDGERSYNC_POSTGRES_CONNECTION_STRING") {
            pg.connection_string = crate::config::secret::secret_string(val);
        }
        if let Ok(val) = std::env::var("LEDGERSYNC_POSTGRES_MAX_CONNECTIONS") {
            if let Ok(max) = val.parse() {
                pg.max_connections = max;
            }
        }
    }

    if let Ok(val) = std::env::var("LEDGERSYNC_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("LEDGERSYNC_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
