//! Cache Entry Module
//!
//! A stored value with its expiry deadline and last-use tick.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug)]
pub struct CacheEntry {
    /// The stored value
    pub value: String,
    /// Deadline after which the entry is no longer served
    pub expires_at: Instant,
    /// Store-local counter value at last read or write, for LRU eviction.
    /// Atomic so reads can refresh it without exclusive access.
    pub last_used: AtomicU64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry that expires `ttl` from now.
    pub fn new(value: String, ttl: Duration, tick: u64) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
            last_used: AtomicU64::new(tick),
        }
    }

    // == Touch ==
    /// Records a read at `tick`.
    pub fn touch(&self, tick: u64) {
        self.last_used.store(tick, Ordering::Relaxed);
    }

    /// Tick of the most recent read or write.
    pub fn last_used(&self) -> u64 {
        self.last_used.load(Ordering::Relaxed)
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its deadline.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}
