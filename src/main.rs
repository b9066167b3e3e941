//! Patient Cache - HTTP service entry point
//!
//! Serves the two-tier patient cache over JSON with a file-backed durable tier.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use patient_cache::api::create_router;
use patient_cache::{AppState, Config, FileStore, PatientCache};

/// Main entry point for the patient cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the durable record directory
/// 4. Create the cache and start the invalidation sweep
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "patient_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting patient cache server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_entries={}, max_size_bytes={}, default_ttl_ms={}, port={}, sweep_interval={}s",
        config.cache.max_entries,
        config.cache.max_size_bytes,
        config.cache.default_ttl_ms,
        config.server_port,
        config.sweep_interval
    );

    let store = FileStore::new(&config.storage_dir)
        .await
        .with_context(|| format!("opening durable store at {}", config.storage_dir.display()))?;
    info!("Durable store opened at {}", config.storage_dir.display());

    let cache = Arc::new(PatientCache::new(config.cache.clone(), Arc::new(store)));
    cache
        .start_sweeper(Duration::from_secs(config.sweep_interval))
        .await;
    info!("Invalidation sweep started");

    let app = create_router(AppState::new(cache.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    cache.cleanup().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
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
}
