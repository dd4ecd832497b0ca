//! `kvs-retention run` - converge every listed stream to the target retention.

use anyhow::{Context, Result};
use clap::Args;
use kvs_adapter_aws::KinesisVideoClient;
use kvs_core::{FailurePolicy, StandardizerConfig};
use kvs_recorder::OutcomeRecorder;
use kvs_runtime::{BatchDriver, BatchSummary, ConvergenceEngine, ResourceClient, load_identifiers};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Exit status for a batch with failures or a halt.
pub const EXIT_FAILURES: u8 = 1;

/// Command-line overrides; each one wins over the config file.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// File with one stream ARN per line.
    #[arg(long, short)]
    pub identifiers: Option<PathBuf>,

    /// Retention every stream is converged to, in hours.
    #[arg(long)]
    pub target_hours: Option<i64>,

    /// AWS profile name.
    #[arg(long, env = "KVS_PROFILE")]
    pub profile: Option<String>,

    /// AWS region.
    #[arg(long, env = "KVS_REGION")]
    pub region: Option<String>,

    /// Timeout for each describe/update call, in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Keep going after a failed stream instead of halting the batch.
    #[arg(long, default_value_t = false)]
    pub continue_on_failure: bool,

    /// Re-describe and retry after a version conflict, up to this many times.
    #[arg(long)]
    pub conflict_retries: Option<u32>,
}

impl RunArgs {
    pub fn apply(self, mut config: StandardizerConfig) -> Result<StandardizerConfig> {
        if let Some(path) = self.identifiers {
            config.identifiers_file = path;
        }
        if let Some(hours) = self.target_hours {
            config.target_hours = hours;
        }
        if let Some(profile) = self.profile {
            config.provider.profile = profile;
        }
        if let Some(region) = self.region {
            config.provider.region = region;
        }
        if let Some(secs) = self.timeout_secs {
            config.provider.timeout_secs = secs;
        }
        if self.continue_on_failure {
            config.policy.on_failure = FailurePolicy::Continue;
        }
        if let Some(retries) = self.conflict_retries {
            config.policy.conflict_retries = retries;
        }

        config.validate().context("invalid run configuration")?;
        Ok(config)
    }
}

/// Run the batch against AWS and return the process exit status.
pub async fn execute(config: StandardizerConfig) -> Result<u8> {
    let client = Arc::new(KinesisVideoClient::new(&config.provider).await);
    execute_with(client, &config).await
}

/// Run the batch against any provider.
pub async fn execute_with(
    client: Arc<dyn ResourceClient>,
    config: &StandardizerConfig,
) -> Result<u8> {
    let identifiers = load_identifiers(&config.identifiers_file)?;
    info!(
        count = identifiers.len(),
        file = %config.identifiers_file.display(),
        "Loaded stream identifiers"
    );

    let recorder = Arc::new(OutcomeRecorder::new(&config.logs));
    let engine = ConvergenceEngine::new(client, recorder)
        .with_conflict_retries(config.policy.conflict_retries);
    let driver =
        BatchDriver::new(engine, config.target_hours).with_policy(config.policy.on_failure);

    let summary = driver.run(identifiers).await?;
    report(&summary, config.target_hours);

    Ok(exit_status(&summary))
}

pub fn exit_status(summary: &BatchSummary) -> u8 {
    if summary.is_clean() { 0 } else { EXIT_FAILURES }
}

fn summary_line(summary: &BatchSummary, target_hours: i64) -> String {
    let mark = if summary.is_clean() { "✔" } else { "✘" };
    format!(
        "{} Processed {} stream(s): {} updated, {} already at {}h, {} failed",
        mark,
        summary.processed,
        summary.succeeded,
        summary.compliant,
        target_hours,
        summary.failed
    )
}

fn report(summary: &BatchSummary, target_hours: i64) {
    println!("{}", summary_line(summary, target_hours));

    if let Some(halt) = &summary.halted {
        eprintln!();
        eprintln!("✘ Halted at {} ({} error):", halt.identifier, halt.kind);
        eprintln!("  {}", halt.detail);
        eprintln!("  Remaining streams were not processed; fix the cause and re-run.");
    }
}
