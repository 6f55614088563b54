//! Configuration types for the proposal handler
//!
//! # Config File Format
//!
//! ```toml
//! noop_source = false
//! verify_selected_invariants = true
//!
//! [logging]
//! level = "info"
//! json = false
//! ```

use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Environment variable overriding [`ProposalHandlerConfig::noop_source`]
pub const ENV_NOOP_SOURCE: &str = "QC_PROPOSAL_NOOP_SOURCE";

/// Environment variable overriding [`ProposalHandlerConfig::verify_selected_invariants`]
pub const ENV_VERIFY_INVARIANTS: &str = "QC_PROPOSAL_VERIFY_INVARIANTS";

/// Environment variable overriding [`LoggingConfig::level`]
pub const ENV_LOG_LEVEL: &str = "QC_PROPOSAL_LOG_LEVEL";

/// Environment variable overriding [`LoggingConfig::json`]
pub const ENV_LOG_JSON: &str = "QC_PROPOSAL_LOG_JSON";

/// Runtime configuration for the proposal handler
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProposalHandlerConfig {
    /// Ignore the mempool and replay the engine's candidates in FIFO order
    pub noop_source: bool,

    /// Re-check byte, gas and sequence invariants after every build
    pub verify_selected_invariants: bool,

    /// Logging output
    pub logging: LoggingConfig,
}

impl Default for ProposalHandlerConfig {
    fn default() -> Self {
        Self {
            noop_source: false,
            verify_selected_invariants: true,
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ProposalHandlerConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_toml_str(&content)
    }

    /// Load a TOML file and apply `QC_PROPOSAL_*` overrides on top.
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> crate::error::Result<Self> {
        Ok(Self::load(path)?.apply_env_overrides()?)
    }

    /// Parse configuration from a TOML string. Missing keys take defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply `QC_PROPOSAL_*` overrides from the process environment.
    pub fn apply_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(ENV_NOOP_SOURCE) {
            self.noop_source = parse_bool(ENV_NOOP_SOURCE, &val)?;
        }
        if let Some(val) = lookup(ENV_VERIFY_INVARIANTS) {
            self.verify_selected_invariants = parse_bool(ENV_VERIFY_INVARIANTS, &val)?;
        }
        if let Some(val) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = val;
        }
        if let Some(val) = lookup(ENV_LOG_JSON) {
            self.logging.json = parse_bool(ENV_LOG_JSON, &val)?;
        }
        Ok(self)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
