//! Storage and locking interfaces consumed by the services.

pub mod memory;

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::error;

pub use memory::{InMemoryLock, InMemoryStore};

pub const FIRMWARE_RULE_TABLE: &str = "FirmwareRule4";
pub const FIRMWARE_RULE_TEMPLATE_TABLE: &str = "FirmwareRuleTemplate";
pub const FEATURE_RULE_TABLE: &str = "FeatureControlRule2";
pub const FEATURE_TABLE: &str = "XconfFeature";
pub const NAMESPACED_LIST_TABLE: &str = "GenericXconfNamedList";

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("lock '{lock}' is held by another owner")]
    LockHeld { lock: String },

    #[error("lock '{lock}' is not held by '{owner}'")]
    NotLockOwner { lock: String, owner: String },
}

/// A cache-backed key-value store of JSON documents grouped in tables.
pub trait KeyValueStore: Send + Sync {
    fn get_one(&self, table: &str, key: &str) -> StoreResult<Option<Value>>;

    fn set_one(&self, table: &str, key: &str, value: Value) -> StoreResult<()>;

    /// Deleting an absent key is not an error.
    fn delete_one(&self, table: &str, key: &str) -> StoreResult<()>;

    fn get_all_as_list(&self, table: &str) -> StoreResult<Vec<Value>>;

    /// Bring the local cache up to date with the backing store. Services
    /// call this after locking and before any read used for validation.
    fn force_sync_changes(&self) -> StoreResult<()>;
}

/// A named lock shared between service instances.
pub trait DistributedLock: Send + Sync {
    fn name(&self) -> &str;

    /// Take the lock for `owner`. Fails while any holder, `owner` included,
    /// still has it.
    fn lock(&self, owner: &str) -> StoreResult<()>;

    fn unlock(&self, owner: &str) -> StoreResult<()>;
}

/// Holds a [`DistributedLock`] for one owner and releases it on drop.
pub struct LockGuard<'a> {
    lock: &'a dyn DistributedLock,
    owner: String,
}

impl<'a> LockGuard<'a> {
    /// # Errors
    ///
    /// Returns whatever [`DistributedLock::lock`] returns, typically
    /// [`StoreError::LockHeld`].
    pub fn acquire(lock: &'a dyn DistributedLock, owner: &str) -> StoreResult<Self> {
        lock.lock(owner)?;
        Ok(Self {
            lock,
            owner: owner.to_owned(),
        })
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.lock.unlock(&self.owner) {
            error!(lock = self.lock.name(), owner = %self.owner, error = %err, "failed to release lock");
        }
    }
}

/// Typed view over one table.
pub struct Table<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Table<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Table<T> {}

impl<T: Serialize + DeserializeOwned> Table<T> {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// # Errors
    ///
    /// Backend failures, or a stored document that does not decode as `T`.
    pub fn get(&self, store: &dyn KeyValueStore, key: &str) -> StoreResult<Option<T>> {
        store
            .get_one(self.name, key)?
            .map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
            .transpose()
    }

    /// # Errors
    ///
    /// Backend or serialization failures.
    pub fn put(&self, store: &dyn KeyValueStore, key: &str, value: &T) -> StoreResult<()> {
        store.set_one(self.name, key, serde_json::to_value(value)?)
    }

    /// # Errors
    ///
    /// Backend failures.
    pub fn delete(&self, store: &dyn KeyValueStore, key: &str) -> StoreResult<()> {
        store.delete_one(self.name, key)
    }

    /// # Errors
    ///
    /// Backend failures, or any stored document that does not decode as `T`.
    pub fn all(&self, store: &dyn KeyValueStore) -> StoreResult<Vec<T>> {
        store
            .get_all_as_list(self.name)?
            .into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
            .collect()
    }
}
