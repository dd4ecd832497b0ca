//! Provider (AWS) connection settings.
//!
//! Credentials themselves are never configured here; the adapter resolves them
//! through the SDK's default provider chain for the selected profile.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Named profile from the shared AWS config/credentials files.
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Region hosting the streams.
    #[serde(default = "default_region")]
    pub region: String,

    /// Upper bound for a single describe or update call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            region: default_region(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_profile() -> String {
    "default".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
