//! In-process [`AtomicStore`] for tests and single-node development.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::{AtomicStore, Compared, Result};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// TTL-aware key-value map guarded by a single lock.
///
/// Expiry is evaluated against `tokio::time::Instant`, so tests that pause
/// the tokio clock see records expire deterministically. Every write sweeps
/// expired records, so keys that are never touched again do not accumulate.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.lock().values().filter(|e| !e.is_expired(now)).count()
    }

    /// Whether the store holds no live records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` on the live entry for `key`, dropping it first if it expired.
    fn with_live<T>(&self, key: &str, f: impl FnOnce(&mut HashMap<String, Entry>, Instant) -> T) -> T {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        if entries.get(key).is_some_and(|e| e.is_expired(now)) {
            entries.remove(key);
        }
        f(&mut entries, now)
    }
}

#[async_trait]
impl AtomicStore for MemoryStore {
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        Ok(self.with_live(key, |entries, now| {
            entries.retain(|_, e| !e.is_expired(now));
            if entries.contains_key(key) {
                return false;
            }
            entries.insert(
                key.to_string(),
                Entry {
                    value: value.to_string(),
                    expires_at: now + ttl,
                },
            );
            true
        }))
    }

    async fn compare_and_delete(&self, key: &str, expected: &str) -> Result<Compared<u64>> {
        Ok(self.with_live(key, |entries, _| match entries.get(key) {
            None => Compared::Missing,
            Some(entry) if entry.value != expected => Compared::Mismatch,
            Some(_) => {
                entries.remove(key);
                Compared::Matched(1)
            }
        }))
    }

    async fn compare_and_expire(
        &self,
        key: &str,
        expected: &str,
        ttl: Duration,
    ) -> Result<Compared<bool>> {
        Ok(self.with_live(key, |entries, now| match entries.get_mut(key) {
            None => Compared::Missing,
            Some(entry) if entry.value != expected => Compared::Mismatch,
            Some(entry) => {
                entry.expires_at = now + ttl;
                Compared::Matched(true)
            }
        }))
    }

    async fn compare_and_ttl(&self, key: &str, expected: &str) -> Result<Compared<i64>> {
        Ok(self.with_live(key, |entries, now| match entries.get(key) {
            None => Compared::Missing,
            Some(entry) if entry.value != expected => Compared::Mismatch,
            Some(entry) => {
                let remaining = entry.expires_at.saturating_duration_since(now);
                Compared::Matched(remaining.as_millis() as i64)
            }
        }))
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.with_live(key, |entries, _| entries.get(key).map(|e| e.value.clone())))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[tokio::test(start_paused = true)]
    async fn test_set_if_absent() {
        let store = MemoryStore::new();
        assert!(assert_ok!(store.set_if_absent("k", "a", Duration::from_secs(1)).await));
        assert!(!assert_ok!(store.set_if_absent("k", "b", Duration::from_secs(1)).await));
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("a"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_records_expire() {
        let store = MemoryStore::new();
        store.set_if_absent("k", "a", Duration::from_millis(500)).await.unwrap();

        tokio::time::advance(Duration::from_millis(499)).await;
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("a"));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(store.is_empty());
        assert!(store.set_if_absent("k", "b", Duration::from_secs(1)).await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_sweeps_abandoned_records() {
        let store = MemoryStore::new();
        for i in 0..1000 {
            let key = format!("abandoned_{}", i);
            store.set_if_absent(&key, "a", Duration::from_millis(10)).await.unwrap();
        }
        assert_eq!(store.entries.lock().len(), 1000);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_ok!(store.set_if_absent("fresh", "b", Duration::from_secs(1)).await);

        assert_eq!(store.len(), 1);
        assert_eq!(store.entries.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_compare_operations() {
        let store = MemoryStore::new();
        assert_eq!(store.compare_and_delete("k", "a").await.unwrap(), Compared::Missing);

        store.set_if_absent("k", "a", Duration::from_secs(10)).await.unwrap();
        assert_eq!(store.compare_and_ttl("k", "b").await.unwrap(), Compared::Mismatch);
        assert_eq!(store.compare_and_ttl("k", "a").await.unwrap(), Compared::Matched(10_000));

        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(store.compare_and_ttl("k", "a").await.unwrap(), Compared::Matched(6_000));

        assert_eq!(
            store.compare_and_expire("k", "a", Duration::from_secs(10)).await.unwrap(),
            Compared::Matched(true)
        );
        assert_eq!(store.compare_and_ttl("k", "a").await.unwrap(), Compared::Matched(10_000));
        assert_eq!(
            store.compare_and_expire("k", "b", Duration::from_secs(10)).await.unwrap(),
            Compared::Mismatch
        );

        assert_eq!(store.compare_and_delete("k", "b").await.unwrap(), Compared::Mismatch);
        assert_eq!(store.compare_and_delete("k", "a").await.unwrap(), Compared::Matched(1));
        assert_eq!(store.compare_and_delete("k", "a").await.unwrap(), Compared::Missing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_record_is_missing() {
        let store = MemoryStore::new();
        store.set_if_absent("k", "a", Duration::from_millis(100)).await.unwrap();
        tokio::time::advance(Duration::from_millis(150)).await;

        assert_eq!(store.compare_and_ttl("k", "a").await.unwrap(), Compared::Missing);
        assert_eq!(
            store.compare_and_expire("k", "a", Duration::from_secs(1)).await.unwrap(),
            Compared::Missing
        );
    }
}
