//! Cache Module
//!
//! The `MetadataCache` capability and its two backends: Redis for shared
//! deployments and an in-process TTL store.

mod entry;
mod memory;
mod record;
mod redis_cache;
mod store;


use std::time::Duration;

use async_trait::async_trait;

use crate::error::CacheResult;

// Re-export public types
pub use entry::CacheEntry;
pub use memory::MemoryCache;
pub use record::{CacheRecord, RECORD_DELIMITER};
pub use redis_cache::RedisCache;
pub use store::TtlStore;

// == Public Constants ==
/// Maximum allowed key length in bytes for the in-process store
pub const MAX_KEY_LENGTH: usize = 2048;

// == Metadata Cache ==
/// Key-value cache with per-entry expiry.
///
/// A miss is `Ok(None)`, never an error. Implementations must tolerate
/// concurrent calls from many requests.
#[async_trait]
pub trait MetadataCache: Send + Sync {
    /// Returns the stored value for `key`, or `None` on miss or expiry.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value` under `key` for `ttl`, replacing any existing entry.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()>;
}
