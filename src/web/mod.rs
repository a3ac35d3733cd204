//! Web server module.

mod handlers;

pub use handlers::*;

use crate::config::ServerConfig;
use crate::scheduler::RefreshHandle;
use crate::store::Snapshot;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub snapshots: watch::Receiver<Arc<Snapshot>>,
    pub refresher: RefreshHandle,
}

/// Web server for statusboard.
pub struct Server {
    state: AppState,
}

impl Server {
    /// Create a new server with the given dependencies.
    pub fn new(
        config: ServerConfig,
        snapshots: watch::Receiver<Arc<Snapshot>>,
        refresher: RefreshHandle,
    ) -> Self {
        Self {
            state: AppState {
                config: Arc::new(config),
                snapshots,
                refresher,
            },
        }
    }

    /// Build the router with all routes.
    fn routes(&self) -> Router {
        router(self.state.clone())
    }

    /// Start the server on the configured port.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.state.config.http_port));
        let router = self.routes();

        tracing::info!("Web server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);

    Router::new()
        .route("/api/status", get(handlers::handle_status))
        .route("/api/refresh", post(handlers::handle_refresh))
        .route("/api/sites/{id}", get(handlers::handle_site_detail))
        .route("/healthz", get(handlers::handle_health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
