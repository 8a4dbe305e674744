//! Lease-based distributed mutex.

use async_trait::async_trait;
use parking_lot::Mutex;
use redis_mutex_store::AtomicStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::lease::Lease;
use crate::renewer::Renewer;
use crate::retry::RetryStrategy;
use crate::{MutexError, MutexOptions, Result};

/// Operations on a distributed lock.
#[async_trait]
pub trait Locker: Send + Sync {
    /// Acquire the lock, retrying until the timeout.
    async fn lock(&self) -> Result<()>;

    /// Release the lock if this handle still owns it.
    async fn unlock(&self) -> Result<()>;

    /// Reset the lease to its full TTL if this handle still owns it.
    async fn refresh_ttl(&self) -> Result<()>;

    /// Remaining lease time, zero when not held by this handle.
    async fn ttl(&self) -> Result<Duration>;
}

/// Handle for one holding session of a named lock.
///
/// The handle carries a lease token generated at construction; the token is
/// written as the lock record's value on acquisition and checked by every
/// later operation. Use one handle per acquisition: concurrent `lock` calls on
/// the same handle are not supported.
///
/// # Examples
///
/// ```rust,ignore
/// use redis_mutex_core::{DistributedMutex, MutexOptions};
/// use redis_mutex_store::MemoryStore;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let mutex = DistributedMutex::new(
///     Arc::new(MemoryStore::new()),
///     "mutex_orders",
///     MutexOptions::default().with_ttl(Duration::from_secs(10)),
/// )?;
///
/// mutex.lock().await?;
/// // critical section
/// mutex.unlock().await?;
/// ```
pub struct DistributedMutex {
    lease: Arc<Lease>,
    timeout: Duration,
    auto_refresh: bool,
    retry: Mutex<Box<dyn RetryStrategy>>,
    cancel: CancellationToken,
    renewer: Mutex<Option<Renewer>>,
}

impl DistributedMutex {
    /// Create a handle for `key` on `store`.
    pub fn new(
        store: Arc<dyn AtomicStore>,
        key: impl Into<String>,
        options: MutexOptions,
    ) -> Result<Self> {
        options.validate()?;

        Ok(Self {
            lease: Arc::new(Lease::new(store, key.into(), options.ttl)),
            timeout: options.timeout,
            auto_refresh: options.auto_refresh,
            retry: Mutex::new(options.retry),
            cancel: options.cancel,
            renewer: Mutex::new(None),
        })
    }

    /// Full lock key, prefix included.
    pub fn key(&self) -> &str {
        self.lease.key()
    }

    /// This handle's lease token.
    pub fn token(&self) -> &str {
        self.lease.token()
    }

    /// Configured lease TTL.
    pub fn lease_ttl(&self) -> Duration {
        self.lease.ttl()
    }

    /// Whether a background renewer is currently running.
    pub fn is_refreshing(&self) -> bool {
        self.renewer
            .lock()
            .as_ref()
            .is_some_and(|renewer| !renewer.is_finished())
    }

    /// Acquire the lock.
    ///
    /// Store errors are returned immediately. Contention is retried as the
    /// retry strategy directs until the timeout, yielding
    /// [`MutexError::LockFailed`]; cancelling the token during a wait yields
    /// [`MutexError::Cancelled`].
    pub async fn lock(&self) -> Result<()> {
        let deadline = Instant::now() + self.timeout;

        loop {
            if self.lease.try_acquire().await? {
                info!(key = %self.key(), "Acquired lock");
                if self.auto_refresh {
                    self.start_renewer();
                }
                return Ok(());
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(MutexError::LockFailed);
            }

            let after = self.retry.lock().after();
            if after.is_zero() {
                debug!(key = %self.key(), "Retry strategy gave up");
                return Err(MutexError::LockFailed);
            }
            let wait = after.min(deadline - now);

            debug!(
                key = %self.key(),
                wait_ms = wait.as_millis() as u64,
                "Lock held elsewhere, waiting to retry"
            );

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(MutexError::Cancelled),
                _ = sleep(wait) => {}
            }

            if Instant::now() >= deadline {
                return Err(MutexError::LockFailed);
            }
        }
    }

    /// Release the lock.
    ///
    /// Any renewer is told to stop first. Releasing a lock that expired, was
    /// taken over, or was already released fails with
    /// [`MutexError::UnlockInvalid`].
    pub async fn unlock(&self) -> Result<()> {
        self.stop_renewer();
        self.lease.release().await
    }

    /// Reset the lease to the configured TTL.
    pub async fn refresh_ttl(&self) -> Result<()> {
        self.lease.refresh().await
    }

    /// Remaining lease time, or zero when this handle does not hold the lock.
    pub async fn ttl(&self) -> Result<Duration> {
        self.lease.remaining().await
    }

    fn start_renewer(&self) {
        let renewer = Renewer::spawn(Arc::clone(&self.lease));
        if let Some(previous) = self.renewer.lock().replace(renewer) {
            previous.stop();
        }
    }

    fn stop_renewer(&self) {
        let renewer = self.renewer.lock().take();
        if let Some(renewer) = renewer {
            renewer.stop();
        }
    }
}

#[async_trait]
impl Locker for DistributedMutex {
    async fn lock(&self) -> Result<()> {
        DistributedMutex::lock(self).await
    }

    async fn unlock(&self) -> Result<()> {
        DistributedMutex::unlock(self).await
    }

    async fn refresh_ttl(&self) -> Result<()> {
        DistributedMutex::refresh_ttl(self).await
    }

    async fn ttl(&self) -> Result<Duration> {
        DistributedMutex::ttl(self).await
    }
}
