//! Retry strategies for lock acquisition.
//!
//! A strategy is asked for the wait before each new attempt after the lock
//! was found taken. Returning [`Duration::ZERO`] means "give up now".
//!
//! ## Example
//!
//! ```rust,ignore
//! use redis_mutex_core::{ExponentialBackoff, Jittered, LimitedRetry, MutexOptions};
//! use std::time::Duration;
//!
//! let options = MutexOptions::default().with_retry(LimitedRetry::new(
//!     Jittered::new(ExponentialBackoff::new(Duration::from_millis(20))),
//!     5,
//! ));
//! ```

use rand::Rng;
use std::time::Duration;

/// Produces successive waits between acquisition attempts.
///
/// Strategies are stateful: each call to [`after`](Self::after) accounts for
/// one more failed attempt.
pub trait RetryStrategy: Send + Sync {
    /// Wait before the next attempt. Zero stops retrying.
    fn after(&mut self) -> Duration;
}

/// Linear backoff: attempt `n` waits `min(n * step, max)`.
#[derive(Debug, Clone)]
pub struct LinearBackoff {
    step: Duration,
    max: Duration,
    attempt: u32,
}

impl LinearBackoff {
    /// Create linear backoff.
    pub fn new(step: Duration, max: Duration) -> Self {
        Self {
            step,
            max,
            attempt: 0,
        }
    }

    /// Attempts accounted for so far.
    pub fn attempts(&self) -> u32 {
        self.attempt
    }
}

impl Default for LinearBackoff {
    fn default() -> Self {
        Self::new(Duration::from_millis(10), Duration::from_millis(200))
    }
}

impl RetryStrategy for LinearBackoff {
    fn after(&mut self) -> Duration {
        self.attempt = self.attempt.saturating_add(1);
        self.step.saturating_mul(self.attempt).min(self.max)
    }
}

/// Constant delay between attempts.
#[derive(Debug, Clone, Copy)]
pub struct ConstantBackoff(pub Duration);

impl RetryStrategy for ConstantBackoff {
    fn after(&mut self) -> Duration {
        self.0
    }
}

/// Exponential backoff: delay is multiplied each attempt up to a ceiling.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    initial: Duration,
    multiplier: f64,
    max: Duration,
    attempt: u32,
}

impl ExponentialBackoff {
    /// Create exponential backoff doubling from `initial`, capped at one second.
    pub fn new(initial: Duration) -> Self {
        Self {
            initial,
            multiplier: 2.0,
            max: Duration::from_secs(1),
            attempt: 0,
        }
    }

    /// Set the multiplier.
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Set maximum delay.
    pub fn with_max(mut self, max: Duration) -> Self {
        self.max = max;
        self
    }
}

impl RetryStrategy for ExponentialBackoff {
    fn after(&mut self) -> Duration {
        let factor = self.multiplier.powi(self.attempt.min(i32::MAX as u32) as i32);
        self.attempt = self.attempt.saturating_add(1);
        let millis = (self.initial.as_millis() as f64 * factor).min(self.max.as_millis() as f64);
        Duration::from_millis(millis as u64).min(self.max)
    }
}

/// Adds 0-50% random jitter on top of another strategy.
///
/// A zero wait from the inner strategy is passed through so giving up is
/// never jittered into another attempt.
#[derive(Debug, Clone)]
pub struct Jittered<S> {
    inner: S,
}

impl<S: RetryStrategy> Jittered<S> {
    /// Wrap `inner`.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: RetryStrategy> RetryStrategy for Jittered<S> {
    fn after(&mut self) -> Duration {
        let base = self.inner.after();
        if base.is_zero() {
            return base;
        }
        let spread = (base.as_millis() as u64) / 2;
        let jitter = rand::rng().random_range(0..=spread);
        base + Duration::from_millis(jitter)
    }
}

/// Gives up after a fixed number of retries.
#[derive(Debug, Clone)]
pub struct LimitedRetry<S> {
    inner: S,
    remaining: u32,
}

impl<S: RetryStrategy> LimitedRetry<S> {
    /// Allow at most `max_retries` waits from `inner`.
    pub fn new(inner: S, max_retries: u32) -> Self {
        Self {
            inner,
            remaining: max_retries,
        }
    }
}

impl<S: RetryStrategy> RetryStrategy for LimitedRetry<S> {
    fn after(&mut self) -> Duration {
        if self.remaining == 0 {
            return Duration::ZERO;
        }
        self.remaining -= 1;
        self.inner.after()
    }
}

/// Never retries: the first contention fails the lock.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRetry;

impl RetryStrategy for NoRetry {
    fn after(&mut self) -> Duration {
        Duration::ZERO
    }
}
