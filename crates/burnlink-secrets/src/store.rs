//! Share storage backends.
//!
//! Defines the [`SecretStore`] trait, the single authority on whether a share
//! exists, and provides [`MemorySecretStore`], a sharded in-process map.
//! See [`crate::sqlite`] for the durable backend.
//!
//! The contract every backend upholds:
//!
//! - `insert` refuses an id that is already present.
//! - `consume` looks up, checks expiry, removes and returns the record as one
//!   atomic step. Of any number of concurrent `consume` calls for one id, at
//!   most one gets the record.
//! - An expired record is removed by `consume` and reported as
//!   [`ShareError::NotFound`], exactly like an absent one.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::error::{Result, ShareError};
use crate::types::{SecretId, SecretRecord};

/// Async trait for share storage backends.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Insert a record under `record.id`. Fails with
    /// [`ShareError::AlreadyExists`] if that id is taken.
    async fn insert(&self, record: SecretRecord) -> Result<()>;

    /// Atomically remove and return the record for `id`.
    async fn consume(&self, id: &SecretId) -> Result<SecretRecord>;

    /// Non-destructive existence hint. Never refreshes the TTL and must not be
    /// used to decide whether to call [`SecretStore::consume`].
    async fn peek_exists(&self, id: &SecretId) -> Result<bool>;

    /// Remove every expired record, one at a time. Returns how many were removed.
    async fn sweep_expired(&self) -> Result<usize>;

    /// Number of live (unexpired) records.
    async fn len(&self) -> Result<usize>;

    /// The clock this store checks expiry against.
    fn clock(&self) -> Arc<dyn Clock>;
}

/// In-memory share store.
///
/// Backed by a [`DashMap`], so every operation on an id only locks the shard
/// that id hashes to. `consume` is a single `remove` under that shard lock.
pub struct MemorySecretStore {
    records: DashMap<SecretId, SecretRecord>,
    clock: Arc<dyn Clock>,
}

impl Default for MemorySecretStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySecretStore {
    /// Create an empty store using wall-clock time.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store checking expiry against `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: DashMap::new(),
            clock,
        }
    }

    /// Records physically held, expired or not.
    #[cfg(test)]
    pub(crate) fn stored_count(&self) -> usize {
        self.records.len()
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn insert(&self, record: SecretRecord) -> Result<()> {
        match self.records.entry(record.id.clone()) {
            Entry::Occupied(_) => Err(ShareError::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn consume(&self, id: &SecretId) -> Result<SecretRecord> {
        let now = self.clock.now();
        match self.records.remove(id) {
            Some((_, record)) if !record.is_expired_at(now) => Ok(record),
            Some(_) => {
                debug!("evicted expired share on access");
                Err(ShareError::NotFound)
            }
            None => Err(ShareError::NotFound),
        }
    }

    async fn peek_exists(&self, id: &SecretId) -> Result<bool> {
        let now = self.clock.now();
        Ok(self
            .records
            .get(id)
            .map(|record| !record.is_expired_at(now))
            .unwrap_or(false))
    }

    async fn sweep_expired(&self) -> Result<usize> {
        let now = self.clock.now();

        // Collect first so no shard lock is held across removals.
        let expired: Vec<SecretId> = self
            .records
            .iter()
            .filter(|entry| entry.value().is_expired_at(now))
            .map(|entry| entry.key().clone())
            .collect();

        let mut removed = 0;
        for id in &expired {
            // Re-check under the shard lock: a concurrent consume may have won.
            if self
                .records
                .remove_if(id, |_, record| record.is_expired_at(now))
                .is_some()
            {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn len(&self) -> Result<usize> {
        let now = self.clock.now();
        Ok(self
            .records
            .iter()
            .filter(|entry| !entry.value().is_expired_at(now))
            .count())
    }

    fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }
}
