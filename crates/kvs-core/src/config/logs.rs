//! Outcome log configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where outcome records are appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogsConfig {
    /// Whether outcome logs are written at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// One `<identifier> - Success` line per successful mutation.
    #[serde(default = "default_success_log")]
    pub success_log: PathBuf,

    /// One `<identifier> - <detail>` line per failed lookup or mutation.
    #[serde(default = "default_failure_log")]
    pub failure_log: PathBuf,

    /// JSON Lines file with the observed state of already-compliant streams.
    #[serde(default = "default_info_log")]
    pub info_log: PathBuf,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            success_log: default_success_log(),
            failure_log: default_failure_log(),
            info_log: default_info_log(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_success_log() -> PathBuf {
    PathBuf::from("files/audit.txt")
}

fn default_failure_log() -> PathBuf {
    PathBuf::from("files/error.txt")
}

fn default_info_log() -> PathBuf {
    PathBuf::from("files/kvs-version.json")
}
