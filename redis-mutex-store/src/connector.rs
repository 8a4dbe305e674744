//! Init-once store connection.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{RedisStore, Result, StoreConfig};

/// Holds the process's Redis connection and hands out shared handles.
///
/// [`init`](Self::init) connects on the first successful call and returns the
/// same store on every later call, whatever configuration is passed. A failed
/// first call leaves the connector empty.
#[derive(Default)]
pub struct StoreConnector {
    slot: Mutex<Option<Arc<RedisStore>>>,
}

impl StoreConnector {
    /// Create an empty connector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect, or reuse the live connection.
    pub async fn init(&self, config: &StoreConfig) -> Result<Arc<RedisStore>> {
        let mut slot = self.slot.lock().await;

        if let Some(store) = slot.as_ref() {
            debug!("Reusing existing store connection");
            return Ok(Arc::clone(store));
        }

        match RedisStore::connect(config).await {
            Ok(store) => {
                let store = Arc::new(store);
                *slot = Some(Arc::clone(&store));
                Ok(store)
            }
            Err(e) => {
                warn!(address = %config.address, error = %e, "Store connection failed");
                Err(e)
            }
        }
    }

    /// The live connection, if any.
    pub async fn current(&self) -> Option<Arc<RedisStore>> {
        self.slot.lock().await.clone()
    }

    /// Whether a connection has been established.
    pub async fn is_connected(&self) -> bool {
        self.slot.lock().await.is_some()
    }
}
