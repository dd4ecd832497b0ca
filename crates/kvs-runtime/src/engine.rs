//! Convergence engine: describe, decide, update with the version token, record.

use crate::client::{MutationError, ResourceClient};
use kvs_core::{AdjustmentDirection, FailureKind, Outcome, OutcomeRecord, ResourceIdentifier};
use kvs_recorder::{OutcomeRecorder, RecorderError};
use std::cmp::Ordering;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// What a stream needs, given its current retention and the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Compliant,
    Adjust {
        direction: AdjustmentDirection,
        magnitude: u64,
    },
}

/// Pure comparison. Magnitude is never zero: equality is `Compliant`.
pub fn decide(current_hours: i64, target_hours: i64) -> Decision {
    match current_hours.cmp(&target_hours) {
        Ordering::Equal => Decision::Compliant,
        Ordering::Less => Decision::Adjust {
            direction: AdjustmentDirection::Increase,
            magnitude: target_hours.abs_diff(current_hours),
        },
        Ordering::Greater => Decision::Adjust {
            direction: AdjustmentDirection::Decrease,
            magnitude: current_hours.abs_diff(target_hours),
        },
    }
}

/// Provider failures never surface here; they become FAILURE outcomes.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to record outcome for {identifier}: {source}")]
    Record {
        identifier: ResourceIdentifier,
        #[source]
        source: RecorderError,
    },
}

pub struct ConvergenceEngine {
    client: Arc<dyn ResourceClient>,
    recorder: Arc<OutcomeRecorder>,
    conflict_retries: u32,
}

impl ConvergenceEngine {
    pub fn new(client: Arc<dyn ResourceClient>, recorder: Arc<OutcomeRecorder>) -> Self {
        Self {
            client,
            recorder,
            conflict_retries: 0,
        }
    }

    /// Allow up to `retries` fresh describe-and-update cycles after a version
    /// conflict. Off by default.
    pub fn with_conflict_retries(mut self, retries: u32) -> Self {
        self.conflict_retries = retries;
        self
    }

    /// Converge one stream to `target_hours` and record exactly one outcome.
    pub async fn decide_and_apply(
        &self,
        identifier: &ResourceIdentifier,
        target_hours: i64,
    ) -> Result<OutcomeRecord, EngineError> {
        let outcome = self.converge(identifier, target_hours).await;
        let record = OutcomeRecord::new(identifier.clone(), outcome);

        self.recorder
            .record(&record)
            .await
            .map_err(|source| EngineError::Record {
                identifier: identifier.clone(),
                source,
            })?;

        Ok(record)
    }

    async fn converge(&self, identifier: &ResourceIdentifier, target_hours: i64) -> Outcome {
        let mut conflicts = 0u32;

        loop {
            let state = match self.client.describe(identifier).await {
                Ok(state) => state,
                Err(e) => {
                    warn!(arn = %identifier, error = %e, "Describe failed");
                    return Outcome::Failure {
                        kind: FailureKind::Lookup,
                        detail: e.to_string(),
                    };
                }
            };

            let (direction, magnitude) = match decide(state.retention_hours, target_hours) {
                Decision::Compliant => {
                    info!(
                        arn = %identifier,
                        retention_hours = state.retention_hours,
                        "Retention is correct"
                    );
                    return Outcome::Info { state };
                }
                Decision::Adjust {
                    direction,
                    magnitude,
                } => (direction, magnitude),
            };

            info!(
                arn = %identifier,
                %direction,
                magnitude,
                from = state.retention_hours,
                to = target_hours,
                "Adjusting retention"
            );

            match self
                .client
                .mutate(identifier, &state.version_token, direction, magnitude)
                .await
            {
                Ok(()) => {
                    return Outcome::Success {
                        direction,
                        magnitude,
                    };
                }
                Err(MutationError::Conflict(detail)) if conflicts < self.conflict_retries => {
                    conflicts += 1;
                    warn!(
                        arn = %identifier,
                        attempt = conflicts,
                        max = self.conflict_retries,
                        detail = %detail,
                        "Version conflict, re-describing"
                    );
                }
                Err(e) => {
                    warn!(arn = %identifier, failure = %e.kind(), error = %e, "Update failed");
                    return Outcome::Failure {
                        kind: e.kind(),
                        detail: e.to_string(),
                    };
                }
            }
        }
    }
}
