//! Batch-level behaviour of the convergence runtime against the in-memory provider.
//!
//! Run with: cargo test --package kvs-runtime --test batch_tests

use kvs_core::{
    AdjustmentDirection, FailureKind, FailurePolicy, LogsConfig, Outcome, OutcomeKind,
    ResourceIdentifier,
};
use kvs_recorder::{InfoEntry, MemoryStorage, OutcomeRecorder};
use kvs_runtime::memory::ClientCall;
use kvs_runtime::{
    BatchDriver, ConvergenceEngine, InMemoryResourceClient, MutationError, read_identifiers,
};
use std::io::Cursor;
use std::sync::Arc;

fn ids(raw: &[&str]) -> Vec<ResourceIdentifier> {
    raw.iter()
        .map(|s| ResourceIdentifier::parse(s).unwrap())
        .collect()
}

fn driver(
    client: &Arc<InMemoryResourceClient>,
    policy: FailurePolicy,
) -> (BatchDriver, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let recorder = Arc::new(OutcomeRecorder::with_storage(storage.clone()));
    let engine = ConvergenceEngine::new(client.clone(), recorder);
    (BatchDriver::new(engine, 24).with_policy(policy), storage)
}

fn kinds(storage: &MemoryStorage) -> Vec<OutcomeKind> {
    storage.records().iter().map(|r| r.kind()).collect()
}

/// Streams at 0, 48 and 24 hours converge with two updates and one INFO.
#[tokio::test]
async fn test_mixed_fleet_converges() {
    let client = Arc::new(
        InMemoryResourceClient::new()
            .with_stream("arn:stream:1", 0)
            .with_stream("arn:stream:2", 48)
            .with_stream("arn:stream:3", 24),
    );
    let (driver, storage) = driver(&client, FailurePolicy::Halt);

    let summary = driver
        .run(ids(&["arn:stream:1", "arn:stream:2", "arn:stream:3"]))
        .await
        .unwrap();

    assert_eq!(
        client.mutations(),
        vec![
            ClientCall::Mutate {
                identifier: ResourceIdentifier::parse("arn:stream:1").unwrap(),
                version_token: "v1".to_string(),
                direction: AdjustmentDirection::Increase,
                magnitude: 24,
            },
            ClientCall::Mutate {
                identifier: ResourceIdentifier::parse("arn:stream:2").unwrap(),
                version_token: "v1".to_string(),
                direction: AdjustmentDirection::Decrease,
                magnitude: 24,
            },
        ]
    );
    assert_eq!(
        kinds(&storage),
        vec![OutcomeKind::Success, OutcomeKind::Success, OutcomeKind::Info]
    );
    assert_eq!(summary.processed, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.compliant, 1);
    assert_eq!(summary.failed, 0);
    assert!(summary.is_clean());
}

/// A conflict on the first stream halts before the second is described.
#[tokio::test]
async fn test_conflict_halts_batch() {
    let client = Arc::new(
        InMemoryResourceClient::new()
            .with_stream("arn:stream:1", 0)
            .with_stream("arn:stream:2", 48),
    );
    client.fail_next_mutation(
        "arn:stream:1",
        MutationError::Conflict("VersionMismatchException".to_string()),
    );
    let (driver, storage) = driver(&client, FailurePolicy::Halt);

    let summary = driver
        .run(ids(&["arn:stream:1", "arn:stream:2"]))
        .await
        .unwrap();

    assert_eq!(kinds(&storage), vec![OutcomeKind::Failure]);
    assert_eq!(client.describe_count("arn:stream:2"), 0);
    assert_eq!(client.retention("arn:stream:2"), Some(48));

    let halted = summary.halted.as_ref().expect("batch should halt");
    assert_eq!(halted.identifier.as_str(), "arn:stream:1");
    assert_eq!(halted.kind, FailureKind::Conflict);
    assert_eq!(halted.detail, "VersionMismatchException");
    assert_eq!(summary.processed, 1);
    assert!(!summary.is_clean());
}

/// [A, B, C] with B failing: A recorded, B recorded as FAILURE, C never touched.
#[tokio::test]
async fn test_halt_after_middle_failure() {
    let client = Arc::new(
        InMemoryResourceClient::new()
            .with_stream("A", 10)
            .with_stream("B", 10)
            .with_stream("C", 10),
    );
    client.fail_next_mutation("B", MutationError::Provider("AccessDeniedException".to_string()));
    let (driver, storage) = driver(&client, FailurePolicy::Halt);

    let summary = driver.run(ids(&["A", "B", "C"])).await.unwrap();

    let records = storage.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].identifier.as_str(), "A");
    assert_eq!(records[0].kind(), OutcomeKind::Success);
    assert_eq!(records[1].identifier.as_str(), "B");
    assert_eq!(records[1].kind(), OutcomeKind::Failure);

    assert_eq!(client.describe_count("C"), 0);
    assert_eq!(client.retention("A"), Some(24));
    assert_eq!(client.retention("C"), Some(10));
    assert_eq!(summary.halted.map(|h| h.identifier.to_string()), Some("B".to_string()));
}

/// A missing stream counts as a failure for halting purposes.
#[tokio::test]
async fn test_lookup_failure_halts() {
    let client = Arc::new(InMemoryResourceClient::new().with_stream("arn:stream:2", 0));
    let (driver, _) = driver(&client, FailurePolicy::Halt);

    let summary = driver
        .run(ids(&["arn:stream:missing", "arn:stream:2"]))
        .await
        .unwrap();

    let halted = summary.halted.unwrap();
    assert_eq!(halted.kind, FailureKind::Lookup);
    assert_eq!(client.describe_count("arn:stream:2"), 0);
}

/// With the continue policy, failures are counted and later streams still converge.
#[tokio::test]
async fn test_continue_policy_processes_everything() {
    let client = Arc::new(
        InMemoryResourceClient::new()
            .with_stream("A", 0)
            .with_stream("C", 48),
    );
    let (driver, storage) = driver(&client, FailurePolicy::Continue);

    let summary = driver.run(ids(&["A", "missing", "C"])).await.unwrap();

    assert_eq!(
        kinds(&storage),
        vec![OutcomeKind::Success, OutcomeKind::Failure, OutcomeKind::Success]
    );
    assert_eq!(summary.processed, 3);
    assert_eq!(summary.failed, 1);
    assert!(summary.halted.is_none());
    assert!(!summary.is_clean());
    assert_eq!(client.retention("C"), Some(24));
}

/// Running the same batch twice: the second run performs zero mutations.
#[tokio::test]
async fn test_rerun_is_idempotent() {
    let client = Arc::new(
        InMemoryResourceClient::new()
            .with_stream("arn:stream:1", 0)
            .with_stream("arn:stream:2", 168),
    );
    let (driver, _) = driver(&client, FailurePolicy::Halt);
    let batch = ids(&["arn:stream:1", "arn:stream:2"]);

    driver.run(batch.clone()).await.unwrap();
    let after_first = client.mutations().len();
    assert_eq!(after_first, 2);

    let second = driver.run(batch).await.unwrap();
    assert_eq!(client.mutations().len(), after_first);
    assert_eq!(second.compliant, 2);
    assert_eq!(second.succeeded, 0);
}

#[tokio::test]
async fn test_empty_batch() {
    let client = Arc::new(InMemoryResourceClient::new());
    let (driver, storage) = driver(&client, FailurePolicy::Halt);

    let summary = driver.run(Vec::new()).await.unwrap();

    assert_eq!(summary.processed, 0);
    assert!(summary.is_clean());
    assert!(storage.records().is_empty());
}

/// End to end through the file recorder: identifier text in, three log files out.
#[tokio::test]
async fn test_file_logs_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let logs = LogsConfig {
        enabled: true,
        success_log: dir.path().join("files/audit.txt"),
        failure_log: dir.path().join("files/error.txt"),
        info_log: dir.path().join("files/kvs-version.json"),
    };

    let client = Arc::new(
        InMemoryResourceClient::new()
            .with_stream("arn:stream:1", 0)
            .with_stream("arn:stream:3", 24)
            .with_stream("arn:stream:4", 2),
    );
    client.fail_next_mutation(
        "arn:stream:4",
        MutationError::Provider("NotAuthorizedException: denied".to_string()),
    );

    let recorder = Arc::new(OutcomeRecorder::new(&logs));
    let engine = ConvergenceEngine::new(client.clone(), recorder);
    let driver = BatchDriver::new(engine, 24);

    let input = "arn:stream:1\n\narn:stream:3\narn:stream:4\narn:stream:5\n";
    let identifiers = read_identifiers(Cursor::new(input)).unwrap();
    let summary = driver.run(identifiers).await.unwrap();

    assert_eq!(summary.processed, 3);
    assert_eq!(
        std::fs::read_to_string(&logs.success_log).unwrap(),
        "arn:stream:1 - Success\n"
    );
    assert_eq!(
        std::fs::read_to_string(&logs.failure_log).unwrap(),
        "arn:stream:4 - NotAuthorizedException: denied\n"
    );

    let info = std::fs::read_to_string(&logs.info_log).unwrap();
    let entries: Vec<InfoEntry> = info
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].arn, "arn:stream:3");
    assert_eq!(entries[0].version, "v1");
    assert_eq!(entries[0].retention_hours, 24);

    assert_eq!(client.describe_count("arn:stream:5"), 0);
}

/// Outcome values carry the computed direction and magnitude.
#[tokio::test]
async fn test_success_records_carry_delta() {
    let client = Arc::new(InMemoryResourceClient::new().with_stream("arn:stream:1", 1));
    let (driver, storage) = driver(&client, FailurePolicy::Halt);

    driver.run(ids(&["arn:stream:1"])).await.unwrap();

    assert_eq!(
        storage.records()[0].outcome,
        Outcome::Success {
            direction: AdjustmentDirection::Increase,
            magnitude: 23,
        }
    );
}
