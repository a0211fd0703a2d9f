//! Workspace configuration.
//!
//! Supports loading configuration from:
//! 1. A YAML configuration file
//! 2. Environment variables (with `QSP_` prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values
//!
//! ```yaml
//! identity: my-workspace
//! location: westeurope
//! default_target: simulator
//! default_shots: 1000
//! targets:
//!   simulator:
//!     seed: 7
//!   quantinuum.sim:
//!     backend: api_validator
//!     gate_set: quantinuum
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::backend::BackendConfig;
use crate::error::HalError;

/// Environment variable names, in the order they are applied.
pub const ENV_IDENTITY: &str = "QSP_WORKSPACE_IDENTITY";
/// Workspace location (region).
pub const ENV_LOCATION: &str = "QSP_WORKSPACE_LOCATION";
/// Target used when none is given.
pub const ENV_DEFAULT_TARGET: &str = "QSP_DEFAULT_TARGET";
/// Shots used when none are given.
pub const ENV_DEFAULT_SHOTS: &str = "QSP_DEFAULT_SHOTS";
/// Job status poll interval in milliseconds.
pub const ENV_POLL_INTERVAL_MS: &str = "QSP_POLL_INTERVAL_MS";
/// Job timeout in seconds.
pub const ENV_JOB_TIMEOUT: &str = "QSP_JOB_TIMEOUT";

/// Settings for a connected workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Workspace identity (resource id or name).
    #[serde(default)]
    pub identity: Option<String>,

    /// Workspace location.
    #[serde(default)]
    pub location: Option<String>,

    /// Target used when a run does not name one.
    #[serde(default)]
    pub default_target: Option<String>,

    /// Shots used when a run does not give a count.
    #[serde(default = "default_shots")]
    pub default_shots: u32,

    /// Interval between job status polls, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Give up waiting for a job after this many seconds. No limit if unset.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// Targets by name.
    #[serde(default)]
    pub targets: BTreeMap<String, TargetConfig>,
}

/// One target entry in the workspace configuration.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Registered backend kind. Defaults to the target name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,

    /// Provider endpoint, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Provider token, if any.
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// Backend-specific settings.
    #[serde(flatten)]
    pub settings: serde_json::Map<String, serde_json::Value>,
}

impl TargetConfig {
    /// Target backed by the given registry kind.
    pub fn of_kind(kind: impl Into<String>) -> Self {
        Self {
            backend: Some(kind.into()),
            ..Self::default()
        }
    }

    /// Add a backend-specific setting.
    #[must_use]
    pub fn with_setting(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.settings.insert(key.into(), value);
        self
    }

    /// Registry kind for a target called `name`.
    pub fn kind<'a>(&'a self, name: &'a str) -> &'a str {
        self.backend.as_deref().unwrap_or(name)
    }

    /// Backend configuration for a target called `name`.
    pub fn backend_config(&self, name: &str) -> BackendConfig {
        BackendConfig {
            name: name.to_string(),
            endpoint: self.endpoint.clone(),
            token: self.token.clone(),
            extra: self.settings.clone(),
        }
    }
}

impl fmt::Debug for TargetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetConfig")
            .field("backend", &self.backend)
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("settings", &self.settings)
            .finish()
    }
}

fn default_shots() -> u32 {
    500
}

fn default_poll_interval_ms() -> u64 {
    500
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        WorkspaceConfig {
            identity: None,
            location: None,
            default_target: None,
            default_shots: default_shots(),
            poll_interval_ms: default_poll_interval_ms(),
            timeout_seconds: None,
            targets: BTreeMap::new(),
        }
    }
}

impl WorkspaceConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::IoError(format!("{}: {e}", path.as_ref().display()))
        })?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        serde_yaml_ng::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load configuration with the following precedence:
    /// 1. `base`, or the file at `config_file` if one is given
    /// 2. Environment variable overrides
    ///
    /// The result is validated.
    pub fn load(config_file: Option<&Path>, base: Self) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => base,
        };
        let config = config.merge_env();
        config.validate()?;
        Ok(config)
    }

    /// Merge process environment variables into this configuration.
    pub fn merge_env(self) -> Self {
        self.merge_env_from(|key| std::env::var(key).ok())
    }

    /// Merge variables from `lookup` into this configuration.
    ///
    /// Only variables that `lookup` returns override existing values.
    /// Numeric variables that fail to parse are ignored with a warning.
    pub fn merge_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup(ENV_IDENTITY) {
            self.identity = Some(v);
        }
        if let Some(v) = lookup(ENV_LOCATION) {
            self.location = Some(v);
        }
        if let Some(v) = lookup(ENV_DEFAULT_TARGET) {
            self.default_target = Some(v);
        }
        if let Some(v) = lookup(ENV_DEFAULT_SHOTS) {
            match v.parse() {
                Ok(val) => self.default_shots = val,
                Err(_) => warn!("Ignoring {ENV_DEFAULT_SHOTS}={v}: not an unsigned integer"),
            }
        }
        if let Some(v) = lookup(ENV_POLL_INTERVAL_MS) {
            match v.parse() {
                Ok(val) => self.poll_interval_ms = val,
                Err(_) => warn!("Ignoring {ENV_POLL_INTERVAL_MS}={v}: not an unsigned integer"),
            }
        }
        if let Some(v) = lookup(ENV_JOB_TIMEOUT) {
            match v.parse() {
                Ok(val) => self.timeout_seconds = Some(val),
                Err(_) => warn!("Ignoring {ENV_JOB_TIMEOUT}={v}: not an unsigned integer"),
            }
        }
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("identity", &self.identity), ("location", &self.location)] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(ConfigError::ValidationError(format!(
                    "{field} must not be empty; omit the field instead"
                )));
            }
        }

        if self.default_shots == 0 {
            return Err(ConfigError::ValidationError(
                "default_shots must be greater than 0".to_string(),
            ));
        }

        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "poll_interval_ms must be greater than 0".to_string(),
            ));
        }

        if self.timeout_seconds == Some(0) {
            return Err(ConfigError::ValidationError(
                "timeout_seconds must be greater than 0; omit the field to wait forever"
                    .to_string(),
            ));
        }

        if let Some(target) = &self.default_target {
            if !self.targets.contains_key(target) {
                return Err(ConfigError::ValidationError(format!(
                    "default_target '{target}' is not listed under targets"
                )));
            }
        }

        Ok(())
    }

    /// Poll interval as a duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Job timeout as a duration, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The file could not be read.
    #[error("IO error: {0}")]
    IoError(String),

    /// The file is not valid YAML for this schema.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A value is out of range or inconsistent.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for HalError {
    fn from(err: ConfigError) -> Self {
        HalError::Configuration(err.to_string())
    }
}
