// redis-mutex - distributed mutual exclusion over Redis
//
// Re-exports the lock handle, options and retry strategies together with the
// store layer they run on.

// Re-export the lock layer
pub use redis_mutex_core::*;

// Re-export the store layer
pub use redis_mutex_store::{
    AtomicStore, Compared, MemoryStore, RedisStore, StoreConfig, StoreConfigBuilder,
    StoreConnector, StoreError,
};

pub use redis_mutex_core;
pub use redis_mutex_store;

/// Prelude for common imports.
pub mod prelude {
    pub use redis_mutex_core::{
        CancellationToken, DistributedMutex, LinearBackoff, Locker, MutexClient, MutexError,
        MutexOptions, RetryStrategy,
    };
    pub use redis_mutex_store::{
        AtomicStore, MemoryStore, StoreConfig, StoreConnector, StoreError,
    };
}
