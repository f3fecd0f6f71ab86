//! Lookup Service
//!
//! Cache-aside resolution of share links: serve from cache when possible,
//! otherwise resolve, enforce the size ceiling and cache accepted results.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::{CacheRecord, MetadataCache};
use crate::error::{LookupError, LookupResult, ResolveError};
use crate::resolver::{FileMetadata, MetadataResolver};

/// Largest file size served successfully: 5 GiB.
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024 * 1024;

/// Lifetime of a cached lookup.
pub const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Resolves share links against a cache and an external resolver.
///
/// Holds no mutable state; share it behind an `Arc`. Concurrent misses for
/// the same link may each reach the resolver and the last cache write wins.
pub struct LookupService {
    cache: Arc<dyn MetadataCache>,
    resolver: Arc<dyn MetadataResolver>,
    resolver_timeout: Duration,
}

impl LookupService {
    pub fn new(
        cache: Arc<dyn MetadataCache>,
        resolver: Arc<dyn MetadataResolver>,
        resolver_timeout: Duration,
    ) -> Self {
        Self {
            cache,
            resolver,
            resolver_timeout,
        }
    }

    // == Resolve ==
    /// Looks up name and size for `link`.
    ///
    /// Cache hits are returned without re-checking the size ceiling: only
    /// results that passed it are ever written.
    pub async fn resolve(&self, link: &str) -> LookupResult {
        if link.is_empty() {
            return Err(LookupError::MissingInput);
        }

        if let Some(metadata) = self.cached(link).await {
            debug!(link, "Cache HIT");
            return Ok(metadata);
        }
        debug!(link, "Cache MISS");

        let metadata = match self.resolve_with_timeout(link).await {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!(link, error = %err, "Resolver failed");
                return Err(LookupError::ResolverError);
            }
        };

        if metadata.size > MAX_FILE_SIZE {
            info!(link, size = metadata.size, "Rejected file above size ceiling");
            return Err(LookupError::SizeExceeded);
        }

        self.store(link, &metadata).await;
        Ok(metadata)
    }

    /// Reads and decodes a cached record; errors and bad data count as a miss.
    async fn cached(&self, link: &str) -> Option<FileMetadata> {
        let raw = match self.cache.get(link).await {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(link, error = %err, "Cache read failed");
                return None;
            }
        };

        match CacheRecord::decode(&raw) {
            Some(record) => Some(record.into()),
            None => {
                warn!(link, value = %raw, "Ignoring malformed cache record");
                None
            }
        }
    }

    async fn resolve_with_timeout(&self, link: &str) -> Result<FileMetadata, ResolveError> {
        tokio::time::timeout(self.resolver_timeout, self.resolver.resolve_metadata(link))
            .await
            .map_err(|_| ResolveError::Timeout(self.resolver_timeout))?
    }

    /// Best-effort cache write; failures only cost a repeat resolve later.
    async fn store(&self, link: &str, metadata: &FileMetadata) {
        let record = CacheRecord::from(metadata.clone());
        if let Err(err) = self.cache.set(link, record.encode(), CACHE_TTL).await {
            warn!(link, error = %err, "Cache write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::cache::MemoryCache;
    use crate::error::{CacheError, CacheResult};

    // == Test Doubles ==

    /// Resolver answering from a fixed table and counting calls.
    #[derive(Default)]
    struct FakeResolver {
        files: HashMap<String, FileMetadata>,
        calls: AtomicUsize,
        delay: Duration,
    }

    impl FakeResolver {
        fn with_file(mut self, link: &str, name: &str, size: u64) -> Self {
            self.files
                .insert(link.to_string(), FileMetadata::new(name, size));
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MetadataResolver for FakeResolver {
        async fn resolve_metadata(&self, link: &str) -> Result<FileMetadata, ResolveError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.files
                .get(link)
                .cloned()
                .ok_or_else(|| ResolveError::MalformedOutput("no such file".into()))
        }
    }

    /// Cache recording every call, optionally failing writes.
    #[derive(Default)]
    struct RecordingCache {
        values: Mutex<HashMap<String, String>>,
        gets: AtomicUsize,
        sets: AtomicUsize,
        fail_writes: bool,
        fail_reads: bool,
    }

    #[async_trait]
    impl MetadataCache for RecordingCache {
        async fn get(&self, key: &str) -> CacheResult<Option<String>> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            if self.fail_reads {
                return Err(CacheError::Backend("connection refused".into()));
            }
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: String, _ttl: Duration) -> CacheResult<()> {
            self.sets.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes {
                return Err(CacheError::Backend("read only replica".into()));
            }
            self.values.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }
    }

    const ABC: &str = "https://mega.nz/file/abc";
    const BIG: &str = "https://mega.nz/file/big";

    fn service(cache: Arc<dyn MetadataCache>, resolver: Arc<FakeResolver>) -> LookupService {
        LookupService::new(cache, resolver, Duration::from_secs(5))
    }

    // == Tests ==

    #[tokio::test]
    async fn test_empty_link_touches_nothing() {
        let cache = Arc::new(RecordingCache::default());
        let resolver = Arc::new(FakeResolver::default());
        let lookup = service(cache.clone(), resolver.clone());

        assert_eq!(lookup.resolve("").await, Err(LookupError::MissingInput));
        assert_eq!(cache.gets.load(Ordering::SeqCst), 0);
        assert_eq!(cache.sets.load(Ordering::SeqCst), 0);
        assert_eq!(resolver.calls(), 0);
    }

    #[tokio::test]
    async fn test_miss_then_hit_resolves_once() {
        let cache = Arc::new(RecordingCache::default());
        let resolver = Arc::new(FakeResolver::default().with_file(ABC, "movie.mkv", 3_000_000_000));
        let lookup = service(cache.clone(), resolver.clone());

        let expected = FileMetadata::new("movie.mkv", 3_000_000_000);
        assert_eq!(lookup.resolve(ABC).await, Ok(expected.clone()));
        assert_eq!(
            cache.values.lock().unwrap().get(ABC).map(String::as_str),
            Some("movie.mkv|3000000000")
        );

        assert_eq!(lookup.resolve(ABC).await, Ok(expected));
        assert_eq!(resolver.calls(), 1);
        assert_eq!(cache.sets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_size_exactly_at_ceiling_is_accepted() {
        let cache = Arc::new(RecordingCache::default());
        let resolver = Arc::new(FakeResolver::default().with_file(ABC, "edge.bin", MAX_FILE_SIZE));
        let lookup = service(cache.clone(), resolver);

        assert!(lookup.resolve(ABC).await.is_ok());
        assert_eq!(cache.sets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_oversized_file_is_never_cached() {
        let cache = Arc::new(RecordingCache::default());
        let resolver = Arc::new(FakeResolver::default().with_file(BIG, "big.iso", 6_000_000_000));
        let lookup = service(cache.clone(), resolver.clone());

        for _ in 0..3 {
            assert_eq!(lookup.resolve(BIG).await, Err(LookupError::SizeExceeded));
        }
        assert_eq!(resolver.calls(), 3);
        assert_eq!(cache.sets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolver_failure_is_not_cached() {
        let cache = Arc::new(RecordingCache::default());
        let resolver = Arc::new(FakeResolver::default());
        let lookup = service(cache.clone(), resolver.clone());

        let link = "https://mega.nz/file/gone";
        assert_eq!(lookup.resolve(link).await, Err(LookupError::ResolverError));
        assert_eq!(lookup.resolve(link).await, Err(LookupError::ResolverError));
        assert_eq!(resolver.calls(), 2);
        assert_eq!(cache.sets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_ceiling_check() {
        let cache = Arc::new(RecordingCache::default());
        cache
            .values
            .lock()
            .unwrap()
            .insert(BIG.to_string(), "legacy.iso|6000000000".to_string());
        let resolver = Arc::new(FakeResolver::default());
        let lookup = service(cache, resolver.clone());

        assert_eq!(
            lookup.resolve(BIG).await,
            Ok(FileMetadata::new("legacy.iso", 6_000_000_000))
        );
        assert_eq!(resolver.calls(), 0);
    }

    #[tokio::test]
    async fn test_size_only_record_is_a_hit() {
        let cache = Arc::new(RecordingCache::default());
        cache
            .values
            .lock()
            .unwrap()
            .insert(ABC.to_string(), "1024".to_string());
        let resolver = Arc::new(FakeResolver::default());
        let lookup = service(cache, resolver.clone());

        assert_eq!(lookup.resolve(ABC).await, Ok(FileMetadata::new("", 1024)));
        assert_eq!(resolver.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_record_is_a_miss_and_overwritten() {
        let cache = Arc::new(RecordingCache::default());
        cache
            .values
            .lock()
            .unwrap()
            .insert(ABC.to_string(), "movie.mkv|not-a-number".to_string());
        let resolver = Arc::new(FakeResolver::default().with_file(ABC, "movie.mkv", 42));
        let lookup = service(cache.clone(), resolver.clone());

        assert_eq!(lookup.resolve(ABC).await, Ok(FileMetadata::new("movie.mkv", 42)));
        assert_eq!(resolver.calls(), 1);
        assert_eq!(
            cache.values.lock().unwrap().get(ABC).map(String::as_str),
            Some("movie.mkv|42")
        );
    }

    #[tokio::test]
    async fn test_cache_write_failure_still_succeeds() {
        let cache = Arc::new(RecordingCache {
            fail_writes: true,
            ..Default::default()
        });
        let resolver = Arc::new(FakeResolver::default().with_file(ABC, "movie.mkv", 42));
        let lookup = service(cache.clone(), resolver.clone());

        assert_eq!(lookup.resolve(ABC).await, Ok(FileMetadata::new("movie.mkv", 42)));
        assert_eq!(lookup.resolve(ABC).await, Ok(FileMetadata::new("movie.mkv", 42)));
        assert_eq!(resolver.calls(), 2, "Unwritten result must be resolved again");
    }

    #[tokio::test]
    async fn test_cache_read_failure_falls_back_to_resolver() {
        let cache = Arc::new(RecordingCache {
            fail_reads: true,
            ..Default::default()
        });
        let resolver = Arc::new(FakeResolver::default().with_file(ABC, "movie.mkv", 42));
        let lookup = service(cache, resolver.clone());

        assert_eq!(lookup.resolve(ABC).await, Ok(FileMetadata::new("movie.mkv", 42)));
        assert_eq!(resolver.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_resolver_times_out() {
        let cache = Arc::new(RecordingCache::default());
        let resolver = Arc::new(FakeResolver {
            delay: Duration::from_secs(60),
            ..FakeResolver::default().with_file(ABC, "movie.mkv", 42)
        });
        let lookup = LookupService::new(cache.clone(), resolver, Duration::from_secs(1));

        assert_eq!(lookup.resolve(ABC).await, Err(LookupError::ResolverError));
        assert_eq!(cache.sets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = Arc::new(MemoryCache::new(100));
        let resolver = Arc::new(FakeResolver::default().with_file(ABC, "movie.mkv", 42));
        let lookup = service(cache, resolver.clone());

        lookup.resolve(ABC).await.unwrap();
        tokio::time::advance(CACHE_TTL - Duration::from_secs(1)).await;
        lookup.resolve(ABC).await.unwrap();
        assert_eq!(resolver.calls(), 1);

        tokio::time::advance(Duration::from_secs(1)).await;
        lookup.resolve(ABC).await.unwrap();
        assert_eq!(resolver.calls(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_misses_agree() {
        const N: usize = 16;
        let cache = Arc::new(MemoryCache::new(100));
        let resolver = Arc::new(FakeResolver {
            delay: Duration::from_millis(20),
            ..FakeResolver::default().with_file(ABC, "movie.mkv", 3_000_000_000)
        });
        let lookup = Arc::new(service(cache, resolver.clone()));

        let handles: Vec<_> = (0..N)
            .map(|_| {
                let lookup = lookup.clone();
                tokio::spawn(async move { lookup.resolve(ABC).await })
            })
            .collect();

        for handle in handles {
            assert_eq!(
                handle.await.unwrap(),
                Ok(FileMetadata::new("movie.mkv", 3_000_000_000))
            );
        }

        let calls = resolver.calls();
        assert!((1..=N).contains(&calls), "resolver called {} times", calls);
    }
}
