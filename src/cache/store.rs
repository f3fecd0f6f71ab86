//! TTL Store Module
//!
//! Bounded HashMap storage with per-entry expiry and least-recently-used
//! eviction at capacity.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::cache::{CacheEntry, MAX_KEY_LENGTH};
use crate::error::{CacheError, CacheResult};

// == TTL Store ==
/// Synchronous key-value store; wrap in a lock for shared use.
///
/// Reads take `&self` so a reader-writer lock can serve them concurrently;
/// only inserts and purges need exclusive access.
#[derive(Debug)]
pub struct TtlStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Monotonic use counter feeding `CacheEntry::last_used`
    tick: AtomicU64,
}

impl TtlStore {
    // == Constructor ==
    /// Creates an empty store holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_entries: max_entries.max(1),
            tick: AtomicU64::new(0),
        }
    }

    fn next_tick(&self) -> u64 {
        self.tick.fetch_add(1, Ordering::Relaxed) + 1
    }

    // == Insert ==
    /// Stores `value` under `key` for `ttl`.
    ///
    /// Overwrites any existing entry and resets its expiry. When a new key
    /// arrives at capacity, expired entries are dropped first and then the
    /// least recently used entry is evicted.
    pub fn insert(&mut self, key: String, value: String, ttl: Duration) -> CacheResult<()> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidKey(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.purge_expired();
            if self.entries.len() >= self.max_entries {
                self.evict_least_recent();
            }
        }

        let tick = self.next_tick();
        self.entries.insert(key, CacheEntry::new(value, ttl, tick));
        Ok(())
    }

    // == Get ==
    /// Returns the value for `key` if present and not expired.
    ///
    /// Expired entries are left in place until the next purge or an insert
    /// at capacity.
    pub fn get(&self, key: &str) -> Option<String> {
        let entry = self.entries.get(key)?;
        if entry.is_expired() {
            return None;
        }

        entry.touch(self.next_tick());
        Some(entry.value.clone())
    }

    // == Purge Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub fn purge_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        before - self.entries.len()
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used())
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }

    // == Length ==
    /// Returns the number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
