//! Redis connection pool.

use bb8::Pool;
use bb8_redis::RedisConnectionManager;
use tracing::info;

use crate::{Result, StoreConfig, StoreError};

/// Type alias for the connection pool.
pub type RedisPool = Pool<RedisConnectionManager>;

/// Builder for creating Redis connection pools.
pub struct RedisPoolBuilder {
    config: StoreConfig,
}

impl RedisPoolBuilder {
    /// Create a new pool builder.
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Build the connection pool and make sure the server answers.
    pub async fn build(self) -> Result<RedisPool> {
        let url = self.config.connection_url()?;

        let manager = RedisConnectionManager::new(url)
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let pool = Pool::builder()
            .max_size(self.config.pool_size)
            .min_idle(self.config.min_idle)
            .connection_timeout(self.config.connection_timeout)
            .build(manager)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        // Scope the probe so its connection goes back to the pool
        {
            let mut conn = pool.get().await?;
            let _: String = redis::cmd("PING")
                .query_async(&mut *conn)
                .await
                .map_err(|e| StoreError::Connection(e.to_string()))?;
        }

        info!(
            pool_size = self.config.pool_size,
            address = %self.config.address,
            "Redis connection pool created"
        );

        Ok(pool)
    }
}
