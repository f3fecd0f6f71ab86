//! megasize - MEGA share-link metadata service
//!
//! Reports the name and size of a shared file, rejecting files above 5 GiB.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use megasize::api::{create_router, AppState};
use megasize::cache::{MemoryCache, MetadataCache, RedisCache};
use megasize::resolver::MegaCmdResolver;
use megasize::{spawn_cleanup_task, Config, LookupService};

/// Main entry point for the lookup server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect to Redis, or fall back to the in-process cache
/// 4. Create the lookup service and Axum router
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "megasize=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting megasize");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, redis={}, mega_get_bin={}, resolver_timeout={}s",
        config.server_port,
        config.redis_url.is_some(),
        config.mega_get_bin,
        config.resolver_timeout.as_secs()
    );

    let (cache, cleanup_handle) = build_cache(&config).await?;

    let lookup = LookupService::new(
        cache,
        Arc::new(MegaCmdResolver::new(&config.mega_get_bin)),
        config.resolver_timeout,
    );
    let app = create_router(AppState::new(lookup));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Opens the process-wide cache handle.
///
/// Redis when `REDIS_URL` is set (a failed connection aborts startup),
/// otherwise an in-process store with its cleanup task.
async fn build_cache(
    config: &Config,
) -> anyhow::Result<(Arc<dyn MetadataCache>, Option<JoinHandle<()>>)> {
    match &config.redis_url {
        Some(url) => {
            let cache = RedisCache::connect(url)
                .await
                .context("Redis connection failed")?;
            let cache: Arc<dyn MetadataCache> = Arc::new(cache);
            Ok((cache, None))
        }
        None => {
            warn!(
                "REDIS_URL not set, using in-process cache (max_entries={})",
                config.max_entries
            );
            let cache = MemoryCache::new(config.max_entries);
            let handle = spawn_cleanup_task(cache.clone(), config.cleanup_interval);
            let cache: Arc<dyn MetadataCache> = Arc::new(cache);
            Ok((cache, Some(handle)))
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the cleanup task if one is running.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
}
