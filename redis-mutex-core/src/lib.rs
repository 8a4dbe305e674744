//! Lease-based distributed mutex.
//!
//! ## Features
//!
//! - **Ownership Tokens** - each handle writes a unique token and only that
//!   token may refresh or release the lock
//! - **Bounded Acquisition** - pluggable retry strategies, a timeout and a
//!   cancellation token
//! - **Lease Renewal** - optional background task refreshing the TTL every
//!   half lease
//! - **Crash Tolerance** - a dead holder's lock expires with its lease
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use redis_mutex_core::*;
//! use redis_mutex_store::{StoreConfig, StoreConnector};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let connector = StoreConnector::new();
//!     let config = StoreConfig::builder()
//!         .address("127.0.0.1:6379")
//!         .prefix("lock_demo")
//!         .build();
//!     let client = MutexClient::init(&connector, &config).await?;
//!
//!     let mutex = client.new_mutex(
//!         "orders",
//!         MutexOptions::default()
//!             .with_ttl(Duration::from_secs(10))
//!             .with_auto_refresh(true),
//!     )?;
//!
//!     mutex.lock().await?;
//!     // Critical section
//!     mutex.unlock().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
mod lease;
pub mod mutex;
pub mod options;
mod renewer;
pub mod retry;

pub use client::MutexClient;
pub use error::{MutexError, Result};
pub use lease::new_token;
pub use mutex::{DistributedMutex, Locker};
pub use options::{MutexOptions, DEFAULT_TIMEOUT, DEFAULT_TTL, MIN_TTL};
pub use retry::{
    ConstantBackoff, ExponentialBackoff, Jittered, LimitedRetry, LinearBackoff, NoRetry,
    RetryStrategy,
};

// Re-export the cancellation token used by `MutexOptions`
pub use tokio_util::sync::CancellationToken;
