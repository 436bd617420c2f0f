//! JSON settings file for `assetembed generate`
//!
//! Lookup order:
//! 1. `--config <PATH>`, which must exist
//! 2. `./assetembed.json`, used only when present
//!
//! Every field is optional; command-line flags take precedence.

use anyhow::{Context, Result};
use assetembed::Encoding;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "assetembed.json";

/// Settings loaded from a JSON file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmbedConfig {
    pub package: Option<String>,
    pub function: Option<String>,
    pub output: Option<PathBuf>,
    pub encoding: Option<Encoding>,
    pub concurrent: Option<bool>,
    pub jobs: Option<NonZeroUsize>,
}

impl EmbedConfig {
    /// Load config from JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: EmbedConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file as JSON: {}", path.display()))?;

        log::debug!("loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    /// Load `./assetembed.json` if it exists
    pub fn discover() -> Result<Option<Self>> {
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        Self::from_file(path).map(Some)
    }
}
