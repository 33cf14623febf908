//! livestat server
//!
//! Attaches to one live session, keeps a running aggregate of its
//! engagement events, and serves snapshots over HTTP.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::runtime::DashboardConfig;
use config::{ConfigLoader, Overrides};
use livestat_core::lifecycle::Lifecycle;
use livestat_core::processors::EventIntake;
use livestat_core::store::SnapshotStore;
use server::{build_dashboard_router, build_router, run_server};
use shutdown::{shutdown_requested, shutdown_signal};
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// livestat - live-session engagement aggregator
#[derive(Parser, Debug)]
#[command(name = "livestat-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./livestat.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Live session to attach to
    #[arg(short, long, env = "LIVESTAT_SESSION_ID")]
    session: Option<String>,

    /// WebSocket relay endpoint
    #[arg(long, env = "LIVESTAT_FEED_URL")]
    feed_url: Option<Url>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting livestat-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = ConfigLoader::new(
        &args.config,
        Overrides {
            listen: args.listen,
            session: args.session,
            feed_url: args.feed_url,
        },
    );
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::info!(
        session = %loaded_config.intake.session_id,
        feed = loaded_config.feed.kind(),
        "Configuration loaded"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let lifecycle = Lifecycle::new();

    // The store's write handle moves into the intake task; handlers only
    // get readers.
    let store = SnapshotStore::new(loaded_config.intake.comment_capacity);
    let reader = store.reader();
    let intake = EventIntake::new(
        store,
        loaded_config.feed.build(),
        &loaded_config.intake,
        lifecycle.clone(),
    );
    let intake_handle = tokio::spawn(async move {
        if let Err(e) = intake.run(shutdown_rx).await {
            tracing::error!("Event intake stopped: {}", e);
        }
    });

    let dashboard_handle = loaded_config
        .dashboard
        .map(|dashboard| tokio::spawn(run_dashboard(dashboard, shutdown_tx.subscribe())));

    // Build the router
    let router = build_router(AppState::new(reader, lifecycle.clone()));

    // Run the server until a signal arrives, then stop the intake alongside
    // the HTTP drain.
    let on_signal = {
        let lifecycle = lifecycle.clone();
        let shutdown_tx = shutdown_tx.clone();
        async move {
            shutdown_signal().await;
            lifecycle.begin_shutdown();
            let _ = shutdown_tx.send(true);
        }
    };
    let listen_addr = loaded_config.server.listen;
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr, on_signal).await;
    if let Err(e) = &result {
        tracing::error!("HTTP server failed: {}", e);
    }

    // Covers the case where the server exited without a signal.
    lifecycle.begin_shutdown();
    let _ = shutdown_tx.send(true);

    if let Err(e) = intake_handle.await {
        tracing::error!("Event intake task panicked: {}", e);
    }
    if let Some(handle) = dashboard_handle {
        if let Err(e) = handle.await {
            tracing::error!("Dashboard task panicked: {}", e);
        }
    }

    lifecycle.mark_stopped();
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Serve the static dashboard until shutdown.
async fn run_dashboard(config: DashboardConfig, shutdown_rx: watch::Receiver<bool>) {
    tracing::info!(
        dir = %config.dir.display(),
        "Starting dashboard server on {}",
        config.listen
    );
    let router = build_dashboard_router(&config.dir);
    if let Err(e) = run_server(router, config.listen, shutdown_requested(shutdown_rx)).await {
        tracing::error!("Dashboard server failed: {}", e);
    }
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
