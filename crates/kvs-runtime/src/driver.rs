//! Batch driver: runs the engine over identifiers in order, one at a time.

use crate::engine::{ConvergenceEngine, EngineError};
use kvs_core::{FailureKind, FailurePolicy, Outcome, ResourceIdentifier};
use tracing::{Instrument, info, warn};
use uuid::Uuid;

/// The failure that stopped a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HaltReason {
    pub identifier: ResourceIdentifier,
    pub kind: FailureKind,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    /// Correlates this run's tracing output.
    pub run_id: Uuid,
    /// Identifiers for which an outcome was recorded.
    pub processed: usize,
    pub succeeded: usize,
    /// Already at target (INFO outcomes).
    pub compliant: usize,
    pub failed: usize,
    /// Set when the halt policy stopped the batch early.
    pub halted: Option<HaltReason>,
}

impl BatchSummary {
    fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            processed: 0,
            succeeded: 0,
            compliant: 0,
            failed: 0,
            halted: None,
        }
    }

    /// No failures and no halt.
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.halted.is_none()
    }
}

pub struct BatchDriver {
    engine: ConvergenceEngine,
    target_hours: i64,
    policy: FailurePolicy,
}

impl BatchDriver {
    pub fn new(engine: ConvergenceEngine, target_hours: i64) -> Self {
        Self {
            engine,
            target_hours,
            policy: FailurePolicy::Halt,
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Process `identifiers` in order.
    ///
    /// Returns `Err` only when an outcome could not be recorded; provider
    /// failures are reflected in the summary.
    pub async fn run<I>(&self, identifiers: I) -> Result<BatchSummary, EngineError>
    where
        I: IntoIterator<Item = ResourceIdentifier>,
    {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("batch", %run_id);

        async move {
            info!(
                target_hours = self.target_hours,
                policy = %self.policy,
                "Starting retention standardization"
            );

            let mut summary = BatchSummary::new(run_id);

            for identifier in identifiers {
                let record = self
                    .engine
                    .decide_and_apply(&identifier, self.target_hours)
                    .await?;
                summary.processed += 1;

                match record.outcome {
                    Outcome::Success { .. } => summary.succeeded += 1,
                    Outcome::Info { .. } => summary.compliant += 1,
                    Outcome::Failure { kind, detail } => {
                        summary.failed += 1;
                        if self.policy == FailurePolicy::Halt {
                            warn!(arn = %identifier, failure = %kind, "Halting batch");
                            summary.halted = Some(HaltReason {
                                identifier,
                                kind,
                                detail,
                            });
                            break;
                        }
                    }
                }
            }

            info!(
                processed = summary.processed,
                succeeded = summary.succeeded,
                compliant = summary.compliant,
                failed = summary.failed,
                halted = summary.halted.is_some(),
                "Batch finished"
            );

            Ok::<_, EngineError>(summary)
        }
        .instrument(span)
        .await
    }
}
