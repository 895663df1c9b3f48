//! In-memory reference implementations of [`KeyValueStore`] and
//! [`DistributedLock`], deterministic and suitable for tests and demos.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::debug;

use super::{DistributedLock, KeyValueStore, StoreError, StoreResult};

/// Tables of JSON documents keyed by id, listed in key order.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<HashMap<String, BTreeMap<String, Value>>>,
    syncs: AtomicUsize,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of [`KeyValueStore::force_sync_changes`] calls so far.
    #[must_use]
    pub fn sync_count(&self) -> usize {
        self.syncs.load(Ordering::Relaxed)
    }
}

impl KeyValueStore for InMemoryStore {
    fn get_one(&self, table: &str, key: &str) -> StoreResult<Option<Value>> {
        let guard = self
            .tables
            .read()
            .map_err(|_| StoreError::Backend("tables lock poisoned".to_string()))?;
        Ok(guard.get(table).and_then(|rows| rows.get(key)).cloned())
    }

    fn set_one(&self, table: &str, key: &str, value: Value) -> StoreResult<()> {
        let mut guard = self
            .tables
            .write()
            .map_err(|_| StoreError::Backend("tables lock poisoned".to_string()))?;
        guard
            .entry(table.to_owned())
            .or_default()
            .insert(key.to_owned(), value);
        Ok(())
    }

    fn delete_one(&self, table: &str, key: &str) -> StoreResult<()> {
        let mut guard = self
            .tables
            .write()
            .map_err(|_| StoreError::Backend("tables lock poisoned".to_string()))?;
        if let Some(rows) = guard.get_mut(table) {
            rows.remove(key);
        }
        Ok(())
    }

    fn get_all_as_list(&self, table: &str) -> StoreResult<Vec<Value>> {
        let guard = self
            .tables
            .read()
            .map_err(|_| StoreError::Backend("tables lock poisoned".to_string()))?;
        Ok(guard
            .get(table)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default())
    }

    fn force_sync_changes(&self) -> StoreResult<()> {
        self.syncs.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

struct Holder {
    owner: String,
    since: Instant,
}

/// A process-local lock with a time-to-live: a holder older than the TTL
/// can be displaced by another owner.
pub struct InMemoryLock {
    name: String,
    ttl: Duration,
    holder: Mutex<Option<Holder>>,
}

impl InMemoryLock {
    #[must_use]
    pub fn new(name: &str, ttl: Duration) -> Self {
        Self {
            name: name.to_owned(),
            ttl,
            holder: Mutex::new(None),
        }
    }

    /// Current owner, if the lock is held and not expired.
    #[must_use]
    pub fn owner(&self) -> Option<String> {
        let guard = self.holder.lock().ok()?;
        guard
            .as_ref()
            .filter(|h| h.since.elapsed() < self.ttl)
            .map(|h| h.owner.clone())
    }
}

impl DistributedLock for InMemoryLock {
    fn name(&self) -> &str {
        &self.name
    }

    fn lock(&self, owner: &str) -> StoreResult<()> {
        let mut guard = self
            .holder
            .lock()
            .map_err(|_| StoreError::Backend(format!("{} lock poisoned", self.name)))?;
        if let Some(current) = guard.as_ref() {
            if current.since.elapsed() < self.ttl {
                return Err(StoreError::LockHeld {
                    lock: self.name.clone(),
                });
            }
            debug!(lock = %self.name, previous = %current.owner, owner, "taking over expired lock");
        }
        *guard = Some(Holder {
            owner: owner.to_owned(),
            since: Instant::now(),
        });
        Ok(())
    }

    fn unlock(&self, owner: &str) -> StoreResult<()> {
        let mut guard = self
            .holder
            .lock()
            .map_err(|_| StoreError::Backend(format!("{} lock poisoned", self.name)))?;
        match guard.as_ref() {
            Some(current) if current.owner == owner => {
                *guard = None;
                Ok(())
            }
            _ => Err(StoreError::NotLockOwner {
                lock: self.name.clone(),
                owner: owner.to_owned(),
            }),
        }
    }
}
