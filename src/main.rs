//! statusboard - Site Status Board
//!
//! Serves the aggregate health of a set of monitored sites and their
//! daily uptime timelines.

mod config;
mod scheduler;
mod source;
mod status;
mod store;
mod web;

use config::ServerConfig;
use scheduler::{Clock, Refresher, SystemClock};
use source::Source;
use store::StatusStore;
use web::Server;

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("statusboard=info".parse()?))
        .init();

    // Load configuration
    let cfg = ServerConfig::load();
    tracing::info!("Starting statusboard on port {}...", cfg.http_port);
    tracing::info!(
        "History window {} days, warning threshold {}%",
        cfg.status.days,
        cfg.status.warning_threshold
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let source = Source::from_location(&cfg.source, cfg.fetch_timeout)?;

    // The refresher owns the store; everything else only reads snapshots.
    let store = StatusStore::new(cfg.status.clone(), clock.clone());
    let snapshots = store.subscribe();
    let (refresher, handle) = Refresher::new(store, source, &cfg.refresh, clock);
    refresher.start();

    // Start web server
    let server = Server::new(cfg, snapshots, handle);
    server.start().await?;

    Ok(())
}
