use async_trait::async_trait;
use kvs_core::{AdjustmentDirection, FailureKind, ResourceIdentifier, ResourceState};
use thiserror::Error;

/// Describe failed. Fatal for the identifier; never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The provider reports no such stream.
    #[error("{0}")]
    NotFound(String),
    /// The describe call itself failed, or returned an unusable response.
    #[error("{0}")]
    Describe(String),
}

/// Update failed. The message is the provider's error detail, unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    /// The version token was stale: the stream changed after it was described.
    #[error("{0}")]
    Conflict(String),
    /// Throttling, permissions, validation, transport, anything else.
    #[error("{0}")]
    Provider(String),
}

impl MutationError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Conflict(_) => FailureKind::Conflict,
            Self::Provider(_) => FailureKind::Provider,
        }
    }
}

#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Fetch the current version token and retention of one stream.
    async fn describe(
        &self,
        identifier: &ResourceIdentifier,
    ) -> Result<ResourceState, LookupError>;

    /// Change retention by `magnitude` hours in `direction`, conditional on
    /// `version_token` still being current. Must leave the stream untouched
    /// when the token is stale.
    async fn mutate(
        &self,
        identifier: &ResourceIdentifier,
        version_token: &str,
        direction: AdjustmentDirection,
        magnitude: u64,
    ) -> Result<(), MutationError>;
}
