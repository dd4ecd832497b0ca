//! Configuration types for the KVS retention standardizer.
//!
//! Configuration is loaded from a single YAML file and combined with CLI
//! overrides into one `StandardizerConfig`.
//!
//! # Example
//!
//! ```yaml
//! target_hours: 24
//! identifiers_file: files/kvs-arns.txt
//! logs:
//!   success_log: files/audit.txt
//!   failure_log: files/error.txt
//!   info_log: files/kvs-version.json
//! provider:
//!   profile: default
//!   region: us-east-1
//!   timeout_secs: 30
//! policy:
//!   on_failure: halt
//!   conflict_retries: 0
//! ```

pub mod logs;
pub mod policy;
pub mod provider;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use logs::LogsConfig;
pub use policy::{FailurePolicy, PolicyConfig};
pub use provider::ProviderConfig;

/// Complete standardizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StandardizerConfig {
    /// Retention every stream is converged to, in hours.
    #[serde(default = "default_target_hours")]
    pub target_hours: i64,

    /// File with one stream ARN per line.
    #[serde(default = "default_identifiers_file")]
    pub identifiers_file: PathBuf,

    #[serde(default)]
    pub logs: LogsConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub policy: PolicyConfig,
}

impl Default for StandardizerConfig {
    fn default() -> Self {
        Self {
            target_hours: default_target_hours(),
            identifiers_file: default_identifiers_file(),
            logs: LogsConfig::default(),
            provider: ProviderConfig::default(),
            policy: PolicyConfig::default(),
        }
    }
}

fn default_target_hours() -> i64 {
    24
}

fn default_identifiers_file() -> PathBuf {
    PathBuf::from("files/kvs-arns.txt")
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StandardizerConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration and resolve relative paths against the file's directory.
    pub fn load_with_context(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = Self::from_file(path)?;

        let base_dir = path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        config.identifiers_file = resolve(&base_dir, &config.identifiers_file);
        config.logs.success_log = resolve(&base_dir, &config.logs.success_log);
        config.logs.failure_log = resolve(&base_dir, &config.logs.failure_log);
        config.logs.info_log = resolve(&base_dir, &config.logs.info_log);

        Ok(config)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_hours < 0 {
            return Err(ConfigError::Config(format!(
                "target_hours must be non-negative, got {}",
                self.target_hours
            )));
        }
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::Config(
                "provider.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.provider.region.trim().is_empty() {
            return Err(ConfigError::Config("provider.region must not be empty".to_string()));
        }
        Ok(())
    }

    /// Serialize back to YAML (used by `kvs-retention config`).
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(ConfigError::from)
    }
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
