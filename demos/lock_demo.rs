//! Distributed Lock Demo
//!
//! Locks a key, holds it while doing work, then releases it.
//!
//! Note: This demo requires Redis to be running
//! Start Redis: docker run -p 6379:6379 redis
//!
//! Configure with REDIS_ADDR / REDIS_PASSWORD / MUTEX_PREFIX.

use redis_mutex::prelude::*;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = StoreConfig::from_env().build();
    let connector = StoreConnector::new();

    let client = match MutexClient::init(&connector, &config).await {
        Ok(client) => client,
        Err(e) => {
            error!(address = %config.address, error = %e, "Could not connect to Redis");
            return Err(e.into());
        }
    };

    let mutex = client.new_mutex(
        "Lock_key",
        MutexOptions::default()
            .with_ttl(Duration::from_secs(300))
            .with_auto_refresh(true),
    )?;

    mutex.lock().await?;
    info!(key = %mutex.key(), "Lock acquired, doing work");

    for batch in 1..=3 {
        tokio::time::sleep(Duration::from_secs(1)).await;
        let remaining = mutex.ttl().await?;
        info!(batch, ?remaining, "Processed batch");
    }

    mutex.unlock().await?;
    info!("Lock released");

    Ok(())
}
