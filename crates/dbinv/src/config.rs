//! Inventory source configuration

use std::path::{Path, PathBuf};

use eyre::WrapErr;
use serde::Deserialize;

use dbinv_db::DbConfig;

/// Suffix a file must carry to be accepted as a dbinv inventory source
pub const SOURCE_SUFFIX: &str = ".dbinv.toml";

/// Top-level inventory source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database connection parameters
    pub database: DbConfig,
    /// Optional override for the inventory scan query
    pub query: Option<String>,
}

impl Config {
    /// True when the file name carries the plugin suffix
    #[must_use]
    pub fn is_inventory_source(path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(SOURCE_SUFFIX))
    }

    /// Load configuration from an accepted source file
    ///
    /// # Errors
    /// Returns an error when the file name does not carry the plugin
    /// suffix, or when the file cannot be read or parsed.
    pub fn load(path: &PathBuf) -> eyre::Result<Self> {
        if !Self::is_inventory_source(path) {
            eyre::bail!(
                "not a dbinv inventory source (expected a file ending in {SOURCE_SUFFIX}): {}",
                path.display()
            );
        }
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns an error when the TOML is malformed or fields are missing.
    pub fn parse(content: &str) -> eyre::Result<Self> {
        let config: Config = toml::from_str(content).wrap_err("invalid configuration")?;
        Ok(config)
    }
}
