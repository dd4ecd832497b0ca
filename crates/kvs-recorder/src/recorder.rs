//! Outcome recorder.
//!
//! The single entry point the convergence engine uses to persist what happened
//! to a stream. Storage is pluggable so the engine can be tested without files.

use kvs_core::{LogsConfig, Outcome, OutcomeRecord};
use std::sync::Arc;

use crate::error::RecorderError;
use crate::storage::{FileStorage, NullStorage, OutcomeStorage};

pub struct OutcomeRecorder {
    enabled: bool,
    storage: Arc<dyn OutcomeStorage>,
}

impl OutcomeRecorder {
    /// Create a recorder writing to the files named in `config`.
    pub fn new(config: &LogsConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        Self {
            enabled: true,
            storage: Arc::new(FileStorage::from_config(config)),
        }
    }

    /// Create a recorder with a custom storage backend.
    pub fn with_storage(storage: Arc<dyn OutcomeStorage>) -> Self {
        Self {
            enabled: true,
            storage,
        }
    }

    /// Create a disabled (no-op) recorder.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            storage: Arc::new(NullStorage::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append one outcome record.
    pub async fn record(&self, record: &OutcomeRecord) -> Result<(), RecorderError> {
        match &record.outcome {
            Outcome::Success {
                direction,
                magnitude,
            } => tracing::debug!(
                arn = %record.identifier,
                outcome = %record.kind(),
                %direction,
                magnitude,
                "Outcome recorded"
            ),
            Outcome::Failure { kind, detail } => tracing::debug!(
                arn = %record.identifier,
                outcome = %record.kind(),
                failure = %kind,
                detail = %detail,
                "Outcome recorded"
            ),
            Outcome::Info { state } => tracing::debug!(
                arn = %record.identifier,
                outcome = %record.kind(),
                version = %state.version_token,
                retention_hours = state.retention_hours,
                "Outcome recorded"
            ),
        }

        if !self.enabled {
            return Ok(());
        }
        self.storage.store(record).await
    }
}
