//! Web server for the file service.
//!
//! Runs on the tokio multi-threaded runtime; axum serves each connection on
//! its own task and filesystem calls go through `tokio::fs`, which runs them
//! on the blocking thread pool. Handlers share no mutable state.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::config::{Config, WebConfig};
use crate::{FilesError, Result};

use super::handlers::AppState;
use super::router::create_router;

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Web configuration.
    web_config: WebConfig,
}

impl WebServer {
    /// Create a new web server from the full configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| FilesError::Config(format!("invalid listen address: {e}")))?;

        Ok(Self {
            addr,
            app_state: Arc::new(AppState::from_config(config)),
            web_config: config.web.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Create the uploads directory, logging instead of failing.
    ///
    /// A missing volume must not keep the task from starting; `/api/info`
    /// reports it as not mounted.
    async fn prepare_storage(&self) {
        let store = &self.app_state.store;
        match store.prepare().await {
            Ok(()) => tracing::info!("Uploads directory ready: {}", store.uploads_dir().display()),
            Err(e) => tracing::warn!(
                "Failed to create uploads directory {}: {}",
                store.uploads_dir().display(),
                e
            ),
        }
    }

    async fn bind(self) -> std::io::Result<(TcpListener, axum::Router)> {
        self.prepare_storage().await;

        let router =
            create_router(self.app_state, &self.web_config).layer(CompressionLayer::new());

        let listener = TcpListener::bind(self.addr).await?;
        tracing::info!("Web server listening on http://{}", listener.local_addr()?);

        Ok((listener, router))
    }

    /// Run the web server.
    pub async fn run(self) -> std::io::Result<()> {
        let (listener, router) = self.bind().await?;
        axum::serve(listener, router).await
    }

    /// Run the server in the background and return the bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::io::Result<SocketAddr> {
        let (listener, router) = self.bind().await?;
        let local_addr = listener.local_addr()?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
