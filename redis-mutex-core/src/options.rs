//! Per-mutex options.

use std::fmt;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::retry::{LinearBackoff, NoRetry, RetryStrategy};
use crate::{MutexError, Result};

/// Default lease TTL.
pub const DEFAULT_TTL: Duration = Duration::from_millis(5000);

/// Default acquisition timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Shortest lease the store can express.
pub const MIN_TTL: Duration = Duration::from_millis(1);

/// Options for a single [`DistributedMutex`](crate::DistributedMutex).
///
/// | Field | Default |
/// |---|---|
/// | `ttl` | 5s |
/// | `timeout` | 3s |
/// | `auto_refresh` | `false` |
/// | `retry` | [`LinearBackoff`] (10ms steps, 200ms cap) |
/// | `cancel` | a token nobody cancels |
pub struct MutexOptions {
    /// Lease time-to-live written with the lock record.
    pub ttl: Duration,
    /// How long `lock` keeps retrying. Zero allows a single attempt.
    pub timeout: Duration,
    /// Renew the lease in the background every `ttl / 2` while held.
    pub auto_refresh: bool,
    /// Wait policy between acquisition attempts.
    pub retry: Box<dyn RetryStrategy>,
    /// Interrupts the wait between acquisition attempts.
    pub cancel: CancellationToken,
}

impl Default for MutexOptions {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            timeout: DEFAULT_TIMEOUT,
            auto_refresh: false,
            retry: Box::new(LinearBackoff::default()),
            cancel: CancellationToken::new(),
        }
    }
}

impl fmt::Debug for MutexOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutexOptions")
            .field("ttl", &self.ttl)
            .field("timeout", &self.timeout)
            .field("auto_refresh", &self.auto_refresh)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl MutexOptions {
    /// Set the lease TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the acquisition timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable background lease renewal.
    pub fn with_auto_refresh(mut self, enabled: bool) -> Self {
        self.auto_refresh = enabled;
        self
    }

    /// Replace the retry strategy.
    pub fn with_retry(mut self, retry: impl RetryStrategy + 'static) -> Self {
        self.retry = Box::new(retry);
        self
    }

    /// Fail on the first contention.
    pub fn with_no_retry(self) -> Self {
        self.with_retry(NoRetry)
    }

    /// Use `token` to interrupt acquisition waits.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Check the options.
    pub fn validate(&self) -> Result<()> {
        if self.ttl < MIN_TTL {
            return Err(MutexError::InvalidOptions(format!(
                "ttl must be at least {:?}, got {:?}",
                MIN_TTL, self.ttl
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = MutexOptions::default();
        assert_eq!(options.ttl, Duration::from_secs(5));
        assert_eq!(options.timeout, Duration::from_secs(3));
        assert!(!options.auto_refresh);
        assert!(!options.cancel.is_cancelled());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let token = CancellationToken::new();
        let mut options = MutexOptions::default()
            .with_ttl(Duration::from_secs(10))
            .with_timeout(Duration::from_secs(5))
            .with_auto_refresh(true)
            .with_no_retry()
            .with_cancellation(token.clone());

        assert_eq!(options.ttl, Duration::from_secs(10));
        assert_eq!(options.timeout, Duration::from_secs(5));
        assert!(options.auto_refresh);
        assert_eq!(options.retry.after(), Duration::ZERO);

        token.cancel();
        assert!(options.cancel.is_cancelled());
    }

    #[test]
    fn test_validate_rejects_short_ttl() {
        let options = MutexOptions::default().with_ttl(Duration::ZERO);
        assert!(matches!(options.validate(), Err(MutexError::InvalidOptions(_))));

        let options = MutexOptions::default().with_ttl(Duration::from_micros(500));
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_debug_hides_strategy() {
        let rendered = format!("{:?}", MutexOptions::default());
        assert!(rendered.contains("ttl: 5s"));
        assert!(rendered.contains(".."));
    }
}
