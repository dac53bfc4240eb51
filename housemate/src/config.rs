//! Session configuration for the home model.

use knowledge_engine::{ConfigError, EngineConfig, ErrorPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a HouseMate session.
///
/// ```toml
/// command_policy = "fail-fast"
///
/// [engine]
/// import_policy = "tolerant"
/// query_policy = "fail-fast"
/// no_match_sentinel = "<null>"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseMateConfig {
    /// Settings for the importer and query engine.
    pub engine: EngineConfig,

    /// Policy for command files. A duplicate entity under `tolerant` is
    /// logged and skipped; under `fail-fast` it aborts the file.
    pub command_policy: ErrorPolicy,
}

impl HouseMateConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Set the command policy.
    pub fn with_command_policy(mut self, policy: ErrorPolicy) -> Self {
        self.command_policy = policy;
        self
    }
}
