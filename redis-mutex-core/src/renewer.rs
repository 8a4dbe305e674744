//! Background lease renewal.

use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::lease::Lease;

/// A running renewal task.
///
/// The task refreshes the lease every `ttl / 2` until it is told to stop, its
/// stop sender is dropped, or a refresh fails. Failures end the task quietly;
/// the holder learns about a lost lease from `unlock` or `ttl`.
pub(crate) struct Renewer {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl Renewer {
    pub(crate) fn spawn(lease: Arc<Lease>) -> Self {
        let period = lease.ttl() / 2;
        let (stop, mut stopped) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = &mut stopped => {
                        debug!(key = %lease.key(), "Lease renewer stopped");
                        return;
                    }
                    _ = ticker.tick() => {
                        if let Err(e) = lease.refresh().await {
                            warn!(key = %lease.key(), error = %e, "Lease renewal failed, renewer exiting");
                            return;
                        }
                    }
                }
            }
        });

        Self { stop, handle }
    }

    /// Signal the task to stop. Does not wait for an in-flight refresh.
    pub(crate) fn stop(self) {
        let _ = self.stop.send(());
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redis_mutex_store::{AtomicStore, MemoryStore};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_renewer_extends_lease_until_stopped() {
        let store = MemoryStore::new();
        let lease = Arc::new(Lease::new(
            Arc::new(store.clone()),
            "mutex_renew".to_string(),
            Duration::from_millis(400),
        ));
        assert!(lease.try_acquire().await.unwrap());

        let renewer = Renewer::spawn(Arc::clone(&lease));
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(store.get("mutex_renew").await.unwrap().as_deref(), Some(lease.token()));
        assert!(!renewer.is_finished());

        renewer.stop();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(store.get("mutex_renew").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_renewer_exits_after_failed_refresh() {
        let store = MemoryStore::new();
        let lease = Arc::new(Lease::new(
            Arc::new(store.clone()),
            "mutex_lost".to_string(),
            Duration::from_millis(400),
        ));
        assert!(lease.try_acquire().await.unwrap());
        let renewer = Renewer::spawn(Arc::clone(&lease));

        store.compare_and_delete("mutex_lost", lease.token()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert!(renewer.is_finished());
    }
}
