//! Redis-backed [`AtomicStore`].

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

use crate::{
    pool::{RedisPool, RedisPoolBuilder},
    scripts, AtomicStore, Compared, Result, StoreConfig,
};

/// Redis store running the lock primitives over a bb8 pool.
///
/// Acquisition uses `SET key value NX PX ttl`; the compare-then-act
/// operations run as Lua scripts so the check and the mutation cannot
/// interleave with other clients. Every command is bounded by the configured
/// command timeout.
#[derive(Clone)]
pub struct RedisStore {
    pool: RedisPool,
    command_timeout: Duration,
}

impl RedisStore {
    /// Connect to the store described by `config`.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        config.validate()?;
        let pool = RedisPoolBuilder::new(config.clone()).build().await?;
        Ok(Self::from_pool(pool, config.command_timeout))
    }

    /// Create from an existing pool.
    pub fn from_pool(pool: RedisPool, command_timeout: Duration) -> Self {
        Self {
            pool,
            command_timeout,
        }
    }

    /// Get the connection pool.
    pub fn pool(&self) -> &RedisPool {
        &self.pool
    }

    /// Per-command timeout.
    pub fn command_timeout(&self) -> Duration {
        self.command_timeout
    }
}

fn ttl_millis(ttl: Duration) -> u64 {
    (ttl.as_millis() as u64).max(1)
}

#[async_trait]
impl AtomicStore for RedisStore {
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.pool.get().await?;

        let reply: Option<String> = timeout(
            self.command_timeout,
            redis::cmd("SET")
                .arg(key)
                .arg(value)
                .arg("NX")
                .arg("PX")
                .arg(ttl_millis(ttl))
                .query_async(&mut *conn),
        )
        .await??;

        Ok(reply.is_some())
    }

    async fn compare_and_delete(&self, key: &str, expected: &str) -> Result<Compared<u64>> {
        let mut conn = self.pool.get().await?;

        let reply: (i64, i64) = timeout(
            self.command_timeout,
            scripts::DELETE.key(key).arg(expected).invoke_async(&mut *conn),
        )
        .await??;

        let outcome = scripts::decode(reply)?.map(|removed| removed.max(0) as u64);
        debug!(key, ?outcome, "compare-and-delete");
        Ok(outcome)
    }

    async fn compare_and_expire(
        &self,
        key: &str,
        expected: &str,
        ttl: Duration,
    ) -> Result<Compared<bool>> {
        let mut conn = self.pool.get().await?;

        let reply: (i64, i64) = timeout(
            self.command_timeout,
            scripts::PEXPIRE
                .key(key)
                .arg(expected)
                .arg(ttl_millis(ttl))
                .invoke_async(&mut *conn),
        )
        .await??;

        Ok(scripts::decode(reply)?.map(|status| status == 1))
    }

    async fn compare_and_ttl(&self, key: &str, expected: &str) -> Result<Compared<i64>> {
        let mut conn = self.pool.get().await?;

        let reply: (i64, i64) = timeout(
            self.command_timeout,
            scripts::PTTL.key(key).arg(expected).invoke_async(&mut *conn),
        )
        .await??;

        scripts::decode(reply)
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.pool.get().await?;

        let value: Option<String> = timeout(
            self.command_timeout,
            redis::cmd("GET").arg(key).query_async(&mut *conn),
        )
        .await??;

        Ok(value)
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.pool.get().await?;
        let _: String = timeout(
            self.command_timeout,
            redis::cmd("PING").query_async(&mut *conn),
        )
        .await??;
        Ok(())
    }
}
