//! Lease ownership over a single lock record.

use redis_mutex_store::{AtomicStore, Compared};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{MutexError, Result};

/// Generate a lease token unique across concurrent handles.
pub fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// A lock key paired with the token that proves ownership of it.
///
/// Every mutation is conditional on the stored value still being this
/// lease's token, so a handle can never release or extend a record written
/// by someone else.
pub(crate) struct Lease {
    store: Arc<dyn AtomicStore>,
    key: String,
    token: String,
    ttl: Duration,
}

impl Lease {
    pub(crate) fn new(store: Arc<dyn AtomicStore>, key: String, ttl: Duration) -> Self {
        Self {
            store,
            key,
            token: new_token(),
            ttl,
        }
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn token(&self) -> &str {
        &self.token
    }

    pub(crate) fn ttl(&self) -> Duration {
        self.ttl
    }

    /// One `SET NX` attempt. `false` means the key is held.
    pub(crate) async fn try_acquire(&self) -> Result<bool> {
        Ok(self.store.set_if_absent(&self.key, &self.token, self.ttl).await?)
    }

    pub(crate) async fn release(&self) -> Result<()> {
        match self.store.compare_and_delete(&self.key, &self.token).await? {
            Compared::Matched(1) => {
                debug!(key = %self.key, "Released lock");
                Ok(())
            }
            outcome => {
                warn!(key = %self.key, ?outcome, "Failed to release lock (not held or expired)");
                Err(MutexError::UnlockInvalid)
            }
        }
    }

    pub(crate) async fn refresh(&self) -> Result<()> {
        match self.store.compare_and_expire(&self.key, &self.token, self.ttl).await? {
            Compared::Matched(true) => {
                debug!(key = %self.key, ttl_ms = self.ttl.as_millis() as u64, "Refreshed lease");
                Ok(())
            }
            _ => Err(MutexError::RefreshTtlFailed),
        }
    }

    /// Remaining lease time, zero unless this lease holds the key.
    pub(crate) async fn remaining(&self) -> Result<Duration> {
        match self.store.compare_and_ttl(&self.key, &self.token).await? {
            Compared::Matched(millis) if millis > 0 => Ok(Duration::from_millis(millis as u64)),
            _ => Ok(Duration::ZERO),
        }
    }
}
