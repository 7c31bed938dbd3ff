//! # Configuration State
//!
//! Terminal configuration loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`LANCHE_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ApiError;
use lanche_core::advisory::DEFAULT_MODEL;
use lanche_core::StockPolicy;

/// Default seconds before an advisory request is abandoned.
pub const DEFAULT_ADVISORY_TIMEOUT_SECS: u64 = 30;

/// Terminal configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalConfig {
    /// Store name (displayed on receipts and in logs)
    pub store_name: String,

    /// Explicit database file; `None` means the platform data directory.
    pub database_path: Option<PathBuf>,

    /// What a sale does when an ingredient would go below zero.
    pub stock_policy: StockPolicy,

    /// Text-generation service settings.
    pub advisory: AdvisoryConfig,
}

/// Settings for the advisory client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryConfig {
    /// Never serialized: the config may be logged or shown.
    #[serde(skip)]
    pub api_key: Option<String>,

    pub model: String,

    pub timeout: Duration,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        AdvisoryConfig {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_ADVISORY_TIMEOUT_SECS),
        }
    }
}

impl Default for TerminalConfig {
    /// Returns default configuration suitable for development.
    ///
    /// ## Default Values
    /// - Store: "Lanchonete"
    /// - Database: platform data directory
    /// - Overselling allowed
    /// - Advisory disabled (no key)
    fn default() -> Self {
        TerminalConfig {
            store_name: "Lanchonete".to_string(),
            database_path: None,
            stock_policy: StockPolicy::AllowNegative,
            advisory: AdvisoryConfig::default(),
        }
    }
}

impl TerminalConfig {
    /// Creates a TerminalConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `LANCHE_STORE_NAME`: Override store name
    /// - `LANCHE_DB_PATH`: Use a custom database file
    /// - `LANCHE_REJECT_OVERSELL`: `true`/`1`/`yes` refuses sales that would
    ///   drive an ingredient negative
    /// - `LANCHE_ADVISORY_API_KEY`: Enables the advisory client
    /// - `LANCHE_ADVISORY_MODEL`: Override the model name
    /// - `LANCHE_ADVISORY_TIMEOUT_SECS`: Override the request timeout
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = TerminalConfig::default();

        if let Some(store_name) = lookup("LANCHE_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(path) = lookup("LANCHE_DB_PATH") {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Some(flag) = lookup("LANCHE_REJECT_OVERSELL") {
            if parse_flag(&flag) {
                config.stock_policy = StockPolicy::RejectNegative;
            }
        }

        config.advisory.api_key = lookup("LANCHE_ADVISORY_API_KEY").filter(|k| !k.trim().is_empty());

        if let Some(model) = lookup("LANCHE_ADVISORY_MODEL") {
            config.advisory.model = model;
        }

        if let Some(secs) = lookup("LANCHE_ADVISORY_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) if secs > 0 => config.advisory.timeout = Duration::from_secs(secs),
                _ => warn!(value = %secs, "Ignoring invalid LANCHE_ADVISORY_TIMEOUT_SECS"),
            }
        }

        config
    }

    /// Resolves the database file, creating the data directory if needed.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.lanche.pos/lanche.db`
    /// - **Windows**: `%APPDATA%\lanche\pos\lanche.db`
    /// - **Linux**: `~/.local/share/pos/lanche.db`
    pub fn resolve_database_path(&self) -> Result<PathBuf, ApiError> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let proj_dirs = ProjectDirs::from("com", "lanche", "pos")
            .ok_or_else(|| ApiError::internal("Could not determine app data directory"))?;

        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir).map_err(|e| {
            ApiError::internal(format!("Could not create {}: {}", data_dir.display(), e))
        })?;

        Ok(data_dir.join("lanche.db"))
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> TerminalConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        TerminalConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.store_name, "Lanchonete");
        assert_eq!(config.stock_policy, StockPolicy::AllowNegative);
        assert!(config.advisory.api_key.is_none());
        assert_eq!(config.advisory.model, DEFAULT_MODEL);
        assert_eq!(config.advisory.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("LANCHE_STORE_NAME", "Lanche do Zé"),
            ("LANCHE_DB_PATH", "/tmp/lanche.db"),
            ("LANCHE_REJECT_OVERSELL", "TRUE"),
            ("LANCHE_ADVISORY_API_KEY", "secret"),
            ("LANCHE_ADVISORY_TIMEOUT_SECS", "5"),
        ]);
        assert_eq!(config.store_name, "Lanche do Zé");
        assert_eq!(config.resolve_database_path().unwrap(), PathBuf::from("/tmp/lanche.db"));
        assert_eq!(config.stock_policy, StockPolicy::RejectNegative);
        assert_eq!(config.advisory.api_key.as_deref(), Some("secret"));
        assert_eq!(config.advisory.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = config_from(&[
            ("LANCHE_REJECT_OVERSELL", "maybe"),
            ("LANCHE_ADVISORY_API_KEY", "  "),
            ("LANCHE_ADVISORY_TIMEOUT_SECS", "soon"),
        ]);
        assert_eq!(config.stock_policy, StockPolicy::AllowNegative);
        assert!(config.advisory.api_key.is_none());
        assert_eq!(config.advisory.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_api_key_not_serialized() {
        let config = config_from(&[("LANCHE_ADVISORY_API_KEY", "secret")]);
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
