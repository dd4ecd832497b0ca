//! In-memory [`ResourceClient`] with call capture, for tests.
//!
//! Version tokens are `v<n>` and advance on every applied mutation, so a write
//! carrying an old token is rejected with [`MutationError::Conflict`] exactly
//! like the real provider would.

use crate::client::{LookupError, MutationError, ResourceClient};
use async_trait::async_trait;
use kvs_core::{AdjustmentDirection, ResourceIdentifier, ResourceState};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Mutex;

/// One call made against the fake, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCall {
    Describe(ResourceIdentifier),
    Mutate {
        identifier: ResourceIdentifier,
        version_token: String,
        direction: AdjustmentDirection,
        magnitude: u64,
    },
}

#[derive(Debug, Clone)]
struct Stream {
    version: u64,
    retention_hours: i64,
}

impl Stream {
    fn token(&self) -> String {
        format!("v{}", self.version)
    }
}

#[derive(Default)]
pub struct InMemoryResourceClient {
    streams: Mutex<BTreeMap<ResourceIdentifier, Stream>>,
    calls: Mutex<Vec<ClientCall>>,
    injected: Mutex<HashMap<ResourceIdentifier, VecDeque<MutationError>>>,
    interference: Mutex<HashMap<ResourceIdentifier, u32>>,
    rewrites: Mutex<HashMap<ResourceIdentifier, i64>>,
}

impl InMemoryResourceClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert_stream`](Self::insert_stream).
    pub fn with_stream(self, identifier: &str, retention_hours: i64) -> Self {
        self.insert_stream(identifier, retention_hours);
        self
    }

    pub fn insert_stream(&self, identifier: &str, retention_hours: i64) {
        if let Some(id) = ResourceIdentifier::parse(identifier) {
            lock(&self.streams).insert(
                id,
                Stream {
                    version: 1,
                    retention_hours,
                },
            );
        }
    }

    /// Current retention, or `None` for an unknown stream.
    pub fn retention(&self, identifier: &str) -> Option<i64> {
        let id = ResourceIdentifier::parse(identifier)?;
        lock(&self.streams).get(&id).map(|s| s.retention_hours)
    }

    pub fn version_token(&self, identifier: &str) -> Option<String> {
        let id = ResourceIdentifier::parse(identifier)?;
        lock(&self.streams).get(&id).map(Stream::token)
    }

    /// Simulate another writer touching the stream: advance its version
    /// without changing retention.
    pub fn bump_version(&self, identifier: &str) {
        if let Some(id) = ResourceIdentifier::parse(identifier) {
            if let Some(stream) = lock(&self.streams).get_mut(&id) {
                stream.version += 1;
            }
        }
    }

    /// Make the next mutation of `identifier` fail with `error`, leaving state untouched.
    pub fn fail_next_mutation(&self, identifier: &str, error: MutationError) {
        if let Some(id) = ResourceIdentifier::parse(identifier) {
            lock(&self.injected).entry(id).or_default().push_back(error);
        }
    }

    /// For the next `times` describes of `identifier`, bump the version right
    /// after the snapshot is taken, so the following write sees a stale token.
    pub fn interfere_after_describe(&self, identifier: &str, times: u32) {
        if let Some(id) = ResourceIdentifier::parse(identifier) {
            lock(&self.interference).insert(id, times);
        }
    }

    /// On the next describe of `identifier`, let another writer set retention
    /// to `retention_hours` right after the snapshot is taken. The version
    /// advances with it. Consumed once.
    pub fn set_retention_after_describe(&self, identifier: &str, retention_hours: i64) {
        if let Some(id) = ResourceIdentifier::parse(identifier) {
            lock(&self.rewrites).insert(id, retention_hours);
        }
    }

    pub fn calls(&self) -> Vec<ClientCall> {
        lock(&self.calls).clone()
    }

    pub fn mutations(&self) -> Vec<ClientCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, ClientCall::Mutate { .. }))
            .collect()
    }

    pub fn describe_count(&self, identifier: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ClientCall::Describe(id) if id.as_str() == identifier))
            .count()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl ResourceClient for InMemoryResourceClient {
    async fn describe(
        &self,
        identifier: &ResourceIdentifier,
    ) -> Result<ResourceState, LookupError> {
        lock(&self.calls).push(ClientCall::Describe(identifier.clone()));

        let mut streams = lock(&self.streams);
        let stream = streams.get_mut(identifier).ok_or_else(|| {
            LookupError::NotFound(format!(
                "ResourceNotFoundException: stream {} does not exist",
                identifier
            ))
        })?;

        let state = ResourceState {
            identifier: identifier.clone(),
            version_token: stream.token(),
            retention_hours: stream.retention_hours,
        };

        let mut interference = lock(&self.interference);
        if let Some(remaining) = interference.get_mut(identifier) {
            if *remaining > 0 {
                *remaining -= 1;
                stream.version += 1;
            }
        }

        if let Some(retention_hours) = lock(&self.rewrites).remove(identifier) {
            stream.retention_hours = retention_hours;
            stream.version += 1;
        }

        Ok(state)
    }

    async fn mutate(
        &self,
        identifier: &ResourceIdentifier,
        version_token: &str,
        direction: AdjustmentDirection,
        magnitude: u64,
    ) -> Result<(), MutationError> {
        lock(&self.calls).push(ClientCall::Mutate {
            identifier: identifier.clone(),
            version_token: version_token.to_string(),
            direction,
            magnitude,
        });

        if let Some(error) = lock(&self.injected)
            .get_mut(identifier)
            .and_then(VecDeque::pop_front)
        {
            return Err(error);
        }

        let mut streams = lock(&self.streams);
        let stream = streams.get_mut(identifier).ok_or_else(|| {
            MutationError::Provider(format!(
                "ResourceNotFoundException: stream {} does not exist",
                identifier
            ))
        })?;

        if stream.token() != version_token {
            return Err(MutationError::Conflict(format!(
                "VersionMismatchException: version {} does not match current version {}",
                version_token,
                stream.token()
            )));
        }

        let delta = i64::try_from(magnitude).map_err(|_| {
            MutationError::Provider(format!(
                "InvalidArgumentException: change of {} hours is out of range",
                magnitude
            ))
        })?;
        let updated = match direction {
            AdjustmentDirection::Increase => stream.retention_hours + delta,
            AdjustmentDirection::Decrease => stream.retention_hours - delta,
        };
        if updated < 0 {
            return Err(MutationError::Provider(format!(
                "InvalidArgumentException: retention cannot drop below zero ({} - {})",
                stream.retention_hours, magnitude
            )));
        }

        stream.retention_hours = updated;
        stream.version += 1;
        Ok(())
    }
}
