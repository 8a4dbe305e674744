//! Mutex factory bound to a store and a key namespace.

use redis_mutex_store::{
    normalize_prefix, AtomicStore, MemoryStore, RedisStore, StoreConfig, StoreConnector,
    DEFAULT_PREFIX,
};
use std::sync::Arc;
use tracing::debug;

use crate::{DistributedMutex, MutexOptions, Result};

/// Creates [`DistributedMutex`] handles that share one store connection.
///
/// Lock keys are the client's prefix followed by the resource name.
#[derive(Clone)]
pub struct MutexClient {
    store: Arc<dyn AtomicStore>,
    prefix: String,
}

impl MutexClient {
    /// Create a client over an existing store. The prefix is normalized to
    /// end with `_` unless empty.
    pub fn new(store: Arc<dyn AtomicStore>, prefix: impl AsRef<str>) -> Self {
        Self {
            store,
            prefix: normalize_prefix(prefix.as_ref()),
        }
    }

    /// Client over a fresh in-process store with the default prefix.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), DEFAULT_PREFIX)
    }

    /// Open a dedicated Redis connection.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let store = RedisStore::connect(config).await?;
        Ok(Self::new(Arc::new(store), config.key_prefix()))
    }

    /// Connect through `connector`, reusing its connection when it has one.
    ///
    /// The prefix always comes from `config`, so a repeated init can move the
    /// key namespace even though the connection is reused.
    pub async fn init(connector: &StoreConnector, config: &StoreConfig) -> Result<Self> {
        let store = connector.init(config).await?;
        debug!(prefix = %config.key_prefix(), "Mutex client ready");
        Ok(Self::new(store, config.key_prefix()))
    }

    /// The shared store.
    pub fn store(&self) -> &Arc<dyn AtomicStore> {
        &self.store
    }

    /// Key namespace.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Lock key for a resource name.
    pub fn key_for(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    /// Create a handle for `name`.
    pub fn new_mutex(&self, name: &str, options: MutexOptions) -> Result<DistributedMutex> {
        DistributedMutex::new(Arc::clone(&self.store), self.key_for(name), options)
    }
}
