//! Log line formats.

use chrono::{DateTime, Utc};
use kvs_core::{ResourceIdentifier, ResourceState};
use serde::{Deserialize, Serialize};

/// Format: `<arn> - Success`
pub fn success_line(identifier: &ResourceIdentifier) -> String {
    format!("{} - Success", identifier)
}

/// Format: `<arn> - <detail>`
///
/// The detail is written verbatim except that line breaks become spaces, so
/// each failure stays on one line of the log.
pub fn failure_line(identifier: &ResourceIdentifier, detail: &str) -> String {
    let flat: String = detail
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    format!("{} - {}", identifier, flat)
}

/// Info log entry for a stream that already meets the target.
///
/// Serialized as one JSON object per line so the file stays parseable as it
/// grows across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoEntry {
    pub arn: String,
    pub version: String,
    pub retention_hours: i64,
    pub recorded_at: DateTime<Utc>,
}

impl InfoEntry {
    pub fn from_state(state: &ResourceState, recorded_at: DateTime<Utc>) -> Self {
        Self {
            arn: state.identifier.to_string(),
            version: state.version_token.clone(),
            retention_hours: state.retention_hours,
            recorded_at,
        }
    }

    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
