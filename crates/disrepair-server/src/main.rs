//! `disrepair-server` — HTTP endpoint for disrepair overlap analysis.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use disrepair_server::rate_limit::RateLimiter;
use disrepair_server::{build_router, AppState, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "disrepair_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        api_keys = config.api_keys.len(),
        rate_limit_max = config.rate_limit_max,
        rate_limit_window_secs = config.rate_limit_window.as_secs(),
        "Loaded server configuration"
    );
    if config.api_keys.is_empty() {
        tracing::warn!("No API keys configured; every request is accepted");
    }

    let host: IpAddr = config.host.parse()?;
    let addr = SocketAddr::new(host, config.port);

    let state = AppState::new(config);
    let prune_handle = tokio::spawn(prune_rate_limits(
        Arc::clone(&state.rate_limiter),
        state.config.rate_limit_window,
    ));

    // --- Start server ---
    let router = build_router(state);
    tracing::info!(%addr, "Web server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    prune_handle.abort();
    tracing::info!("Server stopped");
    Ok(())
}

/// Periodically forget clients whose window has closed so the map stays bounded.
async fn prune_rate_limits(limiter: Arc<RateLimiter>, window: Duration) {
    let mut ticker = tokio::time::interval(window.max(Duration::from_secs(1)));
    loop {
        ticker.tick().await;
        let pruned = limiter.prune_expired(Instant::now());
        if pruned > 0 {
            tracing::debug!(pruned, "pruned expired rate-limit windows");
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
