//! # redis-mutex-store
//!
//! Atomic key-value primitives backing the `redis-mutex` lock.
//!
//! ## Features
//!
//! - **Atomic Store Trait**: `SET NX PX` plus compare-then-delete,
//!   compare-then-expire and compare-then-TTL
//! - **Redis Backend**: bb8 connection pool with Lua scripts
//! - **Memory Backend**: TTL-aware in-process store for tests
//! - **Init Once**: a connector that connects once and reuses the connection
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use redis_mutex_store::{AtomicStore, StoreConfig, StoreConnector};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoreConfig::builder()
//!         .address("127.0.0.1:6379")
//!         .password("12345678")
//!         .build();
//!
//!     let connector = StoreConnector::new();
//!     let store = connector.init(&config).await?;
//!
//!     let created = store
//!         .set_if_absent("mutex_orders", "token", Duration::from_secs(5))
//!         .await?;
//!     assert!(created);
//!
//!     Ok(())
//! }
//! ```

mod config;
mod connector;
mod error;
mod memory;
mod pool;
mod redis_store;
pub mod scripts;
mod store;

pub use config::{normalize_prefix, StoreConfig, StoreConfigBuilder, DEFAULT_ADDRESS, DEFAULT_PREFIX};
pub use connector::StoreConnector;
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use pool::{RedisPool, RedisPoolBuilder};
pub use redis_store::RedisStore;
pub use store::{AtomicStore, Compared};

// Re-export redis crate for convenience
pub use redis;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::config::{StoreConfig, StoreConfigBuilder};
    pub use crate::connector::StoreConnector;
    pub use crate::error::{Result, StoreError};
    pub use crate::memory::MemoryStore;
    pub use crate::redis_store::RedisStore;
    pub use crate::store::{AtomicStore, Compared};
}
