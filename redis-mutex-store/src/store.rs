//! Atomic store capability used by the lock algorithm.

use async_trait::async_trait;
use std::time::Duration;

use crate::Result;

/// Outcome of a server-side compare-then-act operation.
///
/// An absent key is kept apart from a key owned by someone else so callers
/// can tell "expired or never held" from "held by another lease".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compared<T> {
    /// No value is stored under the key.
    Missing,
    /// A value is stored but it is not the expected one.
    Mismatch,
    /// The stored value matched and the action ran, yielding `T`.
    Matched(T),
}

impl<T> Compared<T> {
    /// Whether the stored value matched.
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    /// The action result, if the value matched.
    pub fn matched(self) -> Option<T> {
        match self {
            Self::Matched(value) => Some(value),
            _ => None,
        }
    }

    /// Map the action result.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Compared<U> {
        match self {
            Self::Missing => Compared::Missing,
            Self::Mismatch => Compared::Mismatch,
            Self::Matched(value) => Compared::Matched(f(value)),
        }
    }
}

/// Key-value store with the atomic primitives a lease lock needs.
///
/// Every method must be atomic with respect to other clients of the same
/// store. Implementations are shared between many lock handles and must be
/// safe for concurrent use.
#[async_trait]
pub trait AtomicStore: Send + Sync {
    /// Create `key = value` with the given expiry only if `key` is absent.
    ///
    /// Returns `false` when the key already exists.
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool>;

    /// Delete `key` if it holds `expected`. Yields the number of removed keys.
    async fn compare_and_delete(&self, key: &str, expected: &str) -> Result<Compared<u64>>;

    /// Reset the expiry of `key` to `ttl` if it holds `expected`.
    async fn compare_and_expire(
        &self,
        key: &str,
        expected: &str,
        ttl: Duration,
    ) -> Result<Compared<bool>>;

    /// Remaining time-to-live of `key` in milliseconds if it holds `expected`.
    ///
    /// Negative values follow `PTTL` semantics (`-1` means no expiry).
    async fn compare_and_ttl(&self, key: &str, expected: &str) -> Result<Compared<i64>>;

    /// Read the raw value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<()>;
}
