//! Batch failure handling.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the batch driver does after a FAILURE outcome.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop at the first failure and report it.
    #[default]
    Halt,
    /// Count the failure and move on to the next identifier.
    Continue,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Halt => write!(f, "halt"),
            Self::Continue => write!(f, "continue"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PolicyConfig {
    #[serde(default)]
    pub on_failure: FailurePolicy,

    /// Extra describe-and-update cycles allowed after a version conflict.
    /// Zero means a conflict is recorded as a failure immediately.
    #[serde(default)]
    pub conflict_retries: u32,
}
