//! In-process Metadata Cache
//!
//! `TtlStore` behind a tokio `RwLock`, shared by cloning the handle.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{MetadataCache, TtlStore};
use crate::error::CacheResult;

/// Thread-safe handle to an in-process TTL store.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<TtlStore>>,
}

impl MemoryCache {
    /// Creates a cache bounded to `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            store: Arc::new(RwLock::new(TtlStore::new(max_entries))),
        }
    }

    /// Removes expired entries, returning how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        self.store.write().await.purge_expired()
    }

    /// Number of stored entries, including ones not yet purged.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

#[async_trait]
impl MetadataCache for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        // Read lock: LRU ticks are atomic, expired entries wait for a purge
        Ok(self.store.read().await.get(key))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()> {
        self.store.write().await.insert(key.to_string(), value, ttl)
    }
}
