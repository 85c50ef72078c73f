//! Driver configuration.
//!
//! ```toml
//! # contrail.toml
//! argument_mode = "deferred"   # or "eager" (default)
//! hop_log_interval = 50000     # 0 disables progress logging
//! ```
//!
//! Environment overrides: `CONTRAIL_ARGUMENT_MODE`, `CONTRAIL_HOP_LOG_INTERVAL`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const ARGUMENT_MODE_VAR: &str = "CONTRAIL_ARGUMENT_MODE";
pub const HOP_LOG_INTERVAL_VAR: &str = "CONTRAIL_HOP_LOG_INTERVAL";

/// Hops between two progress log lines
pub const DEFAULT_HOP_LOG_INTERVAL: u64 = 100_000;

/// What the driver does with thunk arguments before each call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentMode {
    /// Force every thunk argument before the call
    #[default]
    Eager,
    /// Pass thunks through; bodies force what they use
    Deferred,
}

impl std::str::FromStr for ArgumentMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eager" => Ok(ArgumentMode::Eager),
            "deferred" | "lazy" => Ok(ArgumentMode::Deferred),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    pub argument_mode: ArgumentMode,
    /// Emit a debug progress event every this many hops; 0 disables
    pub hop_log_interval: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            argument_mode: ArgumentMode::Eager,
            hop_log_interval: DEFAULT_HOP_LOG_INTERVAL,
        }
    }
}

impl RuntimeConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read a TOML file, then apply environment overrides
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?.with_env_overrides()?;
        debug!(
            target: "contrail::config",
            path = %path.display(),
            ?config,
            "loaded runtime config"
        );
        Ok(config)
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from `lookup`, keyed by environment variable name
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ARGUMENT_MODE_VAR) {
            self.argument_mode = value.parse().map_err(|_| ConfigError::InvalidEnv {
                var: ARGUMENT_MODE_VAR,
                value,
            })?;
        }
        if let Some(value) = lookup(HOP_LOG_INTERVAL_VAR) {
            self.hop_log_interval = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: HOP_LOG_INTERVAL_VAR,
                value,
            })?;
        }
        Ok(self)
    }

    pub fn with_argument_mode(mut self, mode: ArgumentMode) -> Self {
        self.argument_mode = mode;
        self
    }

    pub fn with_hop_log_interval(mut self, interval: u64) -> Self {
        self.hop_log_interval = interval;
        self
    }
}
