//! # heliohubd — heliohub daemon
//!
//! Composition root that wires the BL-NET adapter, the poller, and the
//! HTTP server together.
//!
//! ## Responsibilities
//! - Load configuration (TOML file + env overrides) and validate it
//! - Initialise tracing
//! - Connect to the gateway (fatal on connect/auth failure)
//! - Run one eager poll cycle so discovery completes before the first
//!   consumer read
//! - Spawn the periodic poll loop
//! - Serve the HTTP API with graceful shutdown (SIGINT/SIGTERM)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates. It is
//! the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use heliohub_adapter_blnet::BlnetClient;
use heliohub_adapter_http_axum::router;
use heliohub_adapter_http_axum::state::AppState;
use heliohub_app::cache::TelemetryCache;
use heliohub_app::controller::OutputController;
use heliohub_app::poller::Poller;
use heliohub_app::registry::EntityRegistry;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.logging.filter))
        .init();

    // Fatal when the gateway is unreachable or rejects the password.
    let client = Arc::new(BlnetClient::connect(&config.device).await?);
    tracing::info!(resource = %config.device.resource, "connected to BL-NET gateway");

    let cache = Arc::new(TelemetryCache::new());
    let controller = OutputController::new(Arc::clone(&client), config.device.can_node);
    let registry = EntityRegistry::new(Arc::clone(&cache), controller);

    let poller = Arc::new(Poller::new(
        client,
        registry.clone(),
        Arc::clone(&cache),
        config.device.can_node,
    ));

    // Eager first cycle so discovery completes before the first read. A
    // transport failure here is not fatal; the loop retries on schedule.
    if let Err(err) = poller.run_cycle().await {
        tracing::warn!(%err, "initial poll failed, retrying on the regular interval");
    }
    let poll_task = Arc::clone(&poller).spawn(config.device.poll_interval());

    let app = router::build(AppState::new(registry));
    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "heliohubd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    poll_task.abort();
    tracing::info!("heliohubd stopped");
    Ok(())
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to install SIGINT handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => tracing::error!(%err, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
