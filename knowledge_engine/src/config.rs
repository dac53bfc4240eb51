//! Engine configuration - error policies and output settings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::ConfigError;

/// Text printed in place of results when a query matches nothing.
pub const DEFAULT_NO_MATCH_SENTINEL: &str = "<null>";

/// How line-oriented processing reacts to a bad line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Report the failing line, skip it, and keep going.
    #[default]
    Tolerant,
    /// Abort on the first failing line.
    FailFast,
}

impl ErrorPolicy {
    pub fn is_fail_fast(self) -> bool {
        self == ErrorPolicy::FailFast
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorPolicy::Tolerant => "tolerant",
            ErrorPolicy::FailFast => "fail-fast",
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ErrorPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tolerant" => Ok(ErrorPolicy::Tolerant),
            "fail-fast" | "fail_fast" | "failfast" => Ok(ErrorPolicy::FailFast),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Configuration for the importer and the query engine.
///
/// Every field has a default, so an empty TOML document is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Policy for statement imports.
    pub import_policy: ErrorPolicy,

    /// Policy for query files.
    pub query_policy: ErrorPolicy,

    /// Line printed when a query has no matches.
    pub no_match_sentinel: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            import_policy: ErrorPolicy::Tolerant,
            query_policy: ErrorPolicy::FailFast,
            no_match_sentinel: DEFAULT_NO_MATCH_SENTINEL.to_string(),
        }
    }
}

impl EngineConfig {
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

    /// Set the import policy.
    pub fn with_import_policy(mut self, policy: ErrorPolicy) -> Self {
        self.import_policy = policy;
        self
    }

    /// Set the query policy.
    pub fn with_query_policy(mut self, policy: ErrorPolicy) -> Self {
        self.query_policy = policy;
        self
    }

    /// Set the no-match sentinel.
    pub fn with_no_match_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.no_match_sentinel = sentinel.into();
        self
    }
}
