//! Identifier list input: one ARN per line.

use kvs_core::ResourceIdentifier;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read identifiers from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read identifiers in order. Lines are trimmed; blank lines are skipped.
pub fn read_identifiers<R: BufRead>(reader: R) -> std::io::Result<Vec<ResourceIdentifier>> {
    let mut identifiers = Vec::new();
    for line in reader.lines() {
        if let Some(id) = ResourceIdentifier::parse(&line?) {
            identifiers.push(id);
        }
    }
    Ok(identifiers)
}

pub fn load_identifiers(path: impl AsRef<Path>) -> Result<Vec<ResourceIdentifier>, SourceError> {
    let path = path.as_ref();
    let wrap = |source: std::io::Error| SourceError::Read {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(wrap)?;
    read_identifiers(BufReader::new(file)).map_err(wrap)
}
