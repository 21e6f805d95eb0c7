//! Configuration file
//!
//! ```json
//! {
//!   "data_dir": "/var/lib/loandb",
//!   "enforce_analytics_totals": false,
//!   "fsync": true,
//!   "log_level": "info"
//! }
//! ```
//!
//! Only `data_dir` is required.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::schema::ValidatorOptions;
use crate::store::StoreOptions;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    /// Reject analytics snapshots where approved + rejected > total
    #[serde(default)]
    pub enforce_analytics_totals: bool,

    /// Sync every log append (default true)
    #[serde(default = "default_fsync")]
    pub fsync: bool,

    /// Minimum log severity (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_fsync() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and apply its log level
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config = Self::from_json(&content)?;
        Logger::set_min_severity(config.severity()?);

        let path_str = path.display().to_string();
        log_event_with_fields(
            Event::ConfigLoaded,
            &[("config", path_str.as_str()), ("data_dir", config.data_dir.as_str())],
        );
        Ok(config)
    }

    /// Parse and validate configuration JSON
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }
        self.severity()?;
        Ok(())
    }

    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse()
            .map_err(|e: String| CliError::config_error(format!("Invalid log_level: {}", e)))
    }

    pub fn validator_options(&self) -> ValidatorOptions {
        ValidatorOptions {
            enforce_analytics_totals: self.enforce_analytics_totals,
        }
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            validator: self.validator_options(),
            fsync: self.fsync,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_json(r#"{"data_dir": "/tmp/loandb"}"#).unwrap();
        assert!(!config.enforce_analytics_totals);
        assert!(config.fsync);
        assert_eq!(config.severity().unwrap(), Severity::Info);
        assert_eq!(config.store_options(), StoreOptions::default());
    }

    #[test]
    fn test_missing_data_dir() {
        let err = Config::from_json(r#"{"fsync": false}"#).unwrap_err();
        assert_eq!(err.code_str(), "LOAN_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_invalid_log_level() {
        let err = Config::from_json(r#"{"data_dir": "/tmp/x", "log_level": "loud"}"#).unwrap_err();
        assert!(err.message().contains("log_level"));
    }

    #[test]
    fn test_analytics_totals_option() {
        let config =
            Config::from_json(r#"{"data_dir": "/tmp/x", "enforce_analytics_totals": true}"#).unwrap();
        assert!(config.store_options().validator.enforce_analytics_totals);
    }
}
