//! Web server for Picwall.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::config::{Config, ServerConfig};
use crate::gallery::sync;
use crate::{PicwallError, Result};

use super::handlers::AppState;
use super::router::{
    create_health_router, create_router, create_static_router, create_swagger_router,
};

/// Web server for the gallery API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Server configuration.
    server_config: ServerConfig,
    /// Periodic reconciliation interval in seconds (0 disables it).
    sync_interval_secs: u64,
}

impl WebServer {
    /// Create a new web server from configuration.
    ///
    /// Creates the gallery directories as a side effect.
    pub fn new(config: &Config) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| PicwallError::Config(format!("invalid server address: {e}")))?;

        let app_state = Arc::new(AppState::from_config(config)?);

        Ok(Self {
            addr,
            app_state,
            server_config: config.server.clone(),
            sync_interval_secs: config.gallery.sync_interval_secs,
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the periodic reconciliation background task.
    fn start_sync_task(state: Arc<AppState>, interval_secs: u64) {
        if interval_secs == 0 {
            return;
        }

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

            // Skip the first immediate tick
            interval.tick().await;

            loop {
                interval.tick().await;

                match sync::reconcile(&state.store, &state.images_dir) {
                    Ok(report) if report.changed() => {
                        tracing::info!(
                            added = report.added,
                            removed = report.removed,
                            "Periodic reconciliation updated metadata"
                        );
                    }
                    Ok(_) => {
                        tracing::debug!("Periodic reconciliation found nothing to do");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Periodic reconciliation failed");
                    }
                }
            }
        });
    }

    /// Assemble the full router: API, health, docs, optional static files.
    fn build_router(&self) -> Router {
        let mut router = create_router(self.app_state.clone(), &self.server_config.cors_origins)
            .merge(create_health_router())
            .merge(create_swagger_router());

        if self.server_config.serve_static {
            if let Some(static_router) = create_static_router(&self.app_state.images_dir) {
                router = router.merge(static_router);
            }
        }

        // Add gzip compression layer
        router.layer(CompressionLayer::new())
    }

    /// Reconcile the sidecar once before serving traffic, then start the
    /// periodic task.
    fn start_reconciliation(&self) {
        match sync::reconcile(&self.app_state.store, &self.app_state.images_dir) {
            Ok(report) => {
                tracing::info!(
                    added = report.added,
                    removed = report.removed,
                    total = report.total,
                    "Startup reconciliation complete"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "Startup reconciliation failed");
            }
        }

        Self::start_sync_task(self.app_state.clone(), self.sync_interval_secs);
    }

    /// Run the web server.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let router = self.build_router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        self.start_reconciliation();

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await
    }

    /// Run the server and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let router = self.build_router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        self.start_reconciliation();

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
