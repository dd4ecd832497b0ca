use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// Configuration types shared across all crates
pub mod config;

pub use config::{
    ConfigError, FailurePolicy, LogsConfig, PolicyConfig, ProviderConfig, StandardizerConfig,
};

/// Opaque name of one managed stream (an ARN in practice).
///
/// The only validation is that the trimmed value is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceIdentifier(String);

impl ResourceIdentifier {
    /// Trim the input and reject it if nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of one stream as returned by a describe call.
///
/// Never cached: a fresh snapshot is taken at the start of every decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState {
    pub identifier: ResourceIdentifier,
    /// Optimistic-concurrency token; changes on every successful mutation.
    pub version_token: String,
    pub retention_hours: i64,
}

/// Which way a retention change goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdjustmentDirection {
    Increase,
    Decrease,
}

impl fmt::Display for AdjustmentDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increase => write!(f, "increase"),
            Self::Decrease => write!(f, "decrease"),
        }
    }
}

/// Classification of a failed convergence attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Stream not found or the describe call failed.
    Lookup,
    /// Version token was stale at write time.
    Conflict,
    /// Any other error from the mutation call.
    Provider,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lookup => write!(f, "lookup"),
            Self::Conflict => write!(f, "conflict"),
            Self::Provider => write!(f, "provider"),
        }
    }
}

/// Coarse outcome category, used for routing records to logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    Success,
    Failure,
    Info,
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::Failure => write!(f, "FAILURE"),
            Self::Info => write!(f, "INFO"),
        }
    }
}

/// What happened to one stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// Retention was changed.
    Success {
        direction: AdjustmentDirection,
        magnitude: u64,
    },
    /// Lookup or mutation failed; `detail` is the provider error verbatim.
    Failure { kind: FailureKind, detail: String },
    /// Already at target; carries the observed snapshot.
    Info { state: ResourceState },
}

impl Outcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success { .. } => OutcomeKind::Success,
            Self::Failure { .. } => OutcomeKind::Failure,
            Self::Info { .. } => OutcomeKind::Info,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }
}

/// One entry per processed identifier. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub identifier: ResourceIdentifier,
    #[serde(flatten)]
    pub outcome: Outcome,
    pub recorded_at: DateTime<Utc>,
}

impl OutcomeRecord {
    pub fn new(identifier: ResourceIdentifier, outcome: Outcome) -> Self {
        Self {
            identifier,
            outcome,
            recorded_at: Utc::now(),
        }
    }

    pub fn success(
        identifier: ResourceIdentifier,
        direction: AdjustmentDirection,
        magnitude: u64,
    ) -> Self {
        Self::new(
            identifier,
            Outcome::Success {
                direction,
                magnitude,
            },
        )
    }

    pub fn failure(
        identifier: ResourceIdentifier,
        kind: FailureKind,
        detail: impl Into<String>,
    ) -> Self {
        Self::new(
            identifier,
            Outcome::Failure {
                kind,
                detail: detail.into(),
            },
        )
    }

    pub fn info(state: ResourceState) -> Self {
        Self::new(state.identifier.clone(), Outcome::Info { state })
    }

    pub fn kind(&self) -> OutcomeKind {
        self.outcome.kind()
    }
}
