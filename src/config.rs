//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis connection string; the in-process cache is used when unset
    pub redis_url: Option<String>,
    /// HTTP server port
    pub server_port: u16,
    /// Path or name of the `mega-get` binary
    pub mega_get_bin: String,
    /// Upper bound on a single resolver call
    pub resolver_timeout: Duration,
    /// Capacity of the in-process cache
    pub max_entries: usize,
    /// Interval between in-process cache cleanup runs
    pub cleanup_interval: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_URL` - Redis connection string (default: unset)
    /// - `PORT` - HTTP server port (default: 8080)
    /// - `MEGA_GET_BIN` - Resolver binary (default: `mega-get`)
    /// - `RESOLVER_TIMEOUT` - Resolver timeout in seconds (default: 30)
    /// - `MAX_ENTRIES` - In-process cache capacity (default: 10000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            server_port: parse_var("PORT").unwrap_or(defaults.server_port),
            mega_get_bin: env::var("MEGA_GET_BIN")
                .ok()
                .filter(|bin| !bin.is_empty())
                .unwrap_or(defaults.mega_get_bin),
            resolver_timeout: parse_var("RESOLVER_TIMEOUT")
                .map(Duration::from_secs)
                .unwrap_or(defaults.resolver_timeout),
            max_entries: parse_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            cleanup_interval: parse_var("CLEANUP_INTERVAL")
                .map(Duration::from_secs)
                .unwrap_or(defaults.cleanup_interval),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: None,
            server_port: 8080,
            mega_get_bin: "mega-get".to_string(),
            resolver_timeout: Duration::from_secs(30),
            max_entries: 10_000,
            cleanup_interval: Duration::from_secs(60),
        }
    }
}
