// ⚙️ Config - ledger.toml loading
//
// Read from the working directory or an explicit path. Every section is
// optional; missing keys fall back to the defaults below.

use crate::numeric::NumericInput;
use crate::pagination::{DEFAULT_COMPACT_PAGE_SIZE, DEFAULT_PAGE_SIZE_OPTIONS};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "ledger.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub pagination: PaginationConfig,
    pub input: InputConfig,
    pub server: ServerConfig,

    /// Optional JSON snapshot to start from instead of the demo statement.
    pub seed: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Compact view page size for newly created tables.
    pub default_page_size: usize,

    /// Page sizes the compact view may switch between.
    pub page_size_options: Vec<usize>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_COMPACT_PAGE_SIZE,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// How `update_value` treats text that is not a clean number.
    pub numeric_input: NumericInput,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
        }
    }
}

impl LedgerConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: LedgerConfig =
            toml::from_str(content).context("Failed to parse ledger config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config: {}", path.display()))
    }

    /// Load `path` if given, else `ledger.toml` in `dir` if it exists, else defaults.
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = path {
            debug!(path = %path.display(), "loading explicit config");
            return Self::load(path);
        }

        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.exists() {
            debug!(path = %candidate.display(), "loading discovered config");
            Self::load(&candidate)
        } else {
            debug!("no {} found, using defaults", CONFIG_FILE_NAME);
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        let pagination = &self.pagination;
        if pagination.page_size_options.is_empty() {
            bail!("pagination.page_size_options must not be empty");
        }
        if pagination.page_size_options.contains(&0) {
            bail!("pagination.page_size_options must all be positive");
        }
        if !pagination
            .page_size_options
            .contains(&pagination.default_page_size)
        {
            bail!(
                "pagination.default_page_size {} is not one of {:?}",
                pagination.default_page_size,
                pagination.page_size_options
            );
        }
        Ok(())
    }
}
