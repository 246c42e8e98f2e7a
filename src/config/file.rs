//! Optional TOML file with default run options

use crate::types::SyncError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Options read from `--config <FILE>`. Unset keys fall back to the
/// built-in defaults; flags given on the command line win.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub delete: Option<bool>,
    pub dry_run: Option<bool>,
    pub verbose: Option<bool>,
    pub strict: Option<bool>,
    pub workers: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        let content = fs::read_to_string(path).map_err(|e| {
            SyncError::Config(format!("Cannot read config file {:?}: {}", path, e))
        })?;
        Self::parse(&content)
            .map_err(|msg| SyncError::Config(format!("Invalid config file {:?}: {}", path, msg)))
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}
