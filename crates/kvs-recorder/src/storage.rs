//! Outcome storage backends.

use crate::entry::{InfoEntry, failure_line, success_line};
use crate::error::RecorderError;
use async_trait::async_trait;
use kvs_core::{LogsConfig, Outcome, OutcomeRecord};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Trait for outcome storage backends.
#[async_trait]
pub trait OutcomeStorage: Send + Sync {
    /// Append one record. Implementations must never rewrite earlier records.
    async fn store(&self, record: &OutcomeRecord) -> Result<(), RecorderError>;
}

/// File storage: three append-only files, routed by outcome.
pub struct FileStorage {
    success_path: PathBuf,
    failure_path: PathBuf,
    info_path: PathBuf,
}

impl FileStorage {
    pub fn new(
        success_path: impl Into<PathBuf>,
        failure_path: impl Into<PathBuf>,
        info_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            success_path: success_path.into(),
            failure_path: failure_path.into(),
            info_path: info_path.into(),
        }
    }

    pub fn from_config(config: &LogsConfig) -> Self {
        Self::new(
            config.success_log.clone(),
            config.failure_log.clone(),
            config.info_log.clone(),
        )
    }

    pub fn success_path(&self) -> &Path {
        &self.success_path
    }

    pub fn failure_path(&self) -> &Path {
        &self.failure_path
    }

    pub fn info_path(&self) -> &Path {
        &self.info_path
    }
}

fn append_line(path: &Path, line: &str) -> Result<(), RecorderError> {
    let wrap = |source: std::io::Error| RecorderError::Append {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(wrap)?;
        }
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(wrap)?;
    writeln!(file, "{}", line).map_err(wrap)?;
    Ok(())
}

#[async_trait]
impl OutcomeStorage for FileStorage {
    async fn store(&self, record: &OutcomeRecord) -> Result<(), RecorderError> {
        match &record.outcome {
            Outcome::Success { .. } => {
                append_line(&self.success_path, &success_line(&record.identifier))
            }
            Outcome::Failure { detail, .. } => append_line(
                &self.failure_path,
                &failure_line(&record.identifier, detail),
            ),
            Outcome::Info { state } => {
                let json = InfoEntry::from_state(state, record.recorded_at).to_json_line()?;
                append_line(&self.info_path, &json)
            }
        }
    }
}

/// In-memory storage. Keeps records in arrival order for inspection.
#[derive(Default)]
pub struct MemoryStorage {
    records: RwLock<Vec<OutcomeRecord>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything stored so far.
    pub fn records(&self) -> Vec<OutcomeRecord> {
        self.records
            .read()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl OutcomeStorage for MemoryStorage {
    async fn store(&self, record: &OutcomeRecord) -> Result<(), RecorderError> {
        let mut records = self.records.write().map_err(|e| {
            RecorderError::StorageError(format!("Failed to acquire write lock: {}", e))
        })?;
        records.push(record.clone());
        Ok(())
    }
}

/// Discards everything.
pub struct NullStorage;

impl NullStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NullStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OutcomeStorage for NullStorage {
    async fn store(&self, _record: &OutcomeRecord) -> Result<(), RecorderError> {
        Ok(())
    }
}
