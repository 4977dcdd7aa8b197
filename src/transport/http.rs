//! Streamable HTTP transport.
//!
//! Every MCP session gets its own [`SqlService`] over the shared command
//! registry. On SIGINT/SIGTERM the server stops accepting connections and
//! gives open sessions [`DRAIN_TIMEOUT`](super::DRAIN_TIMEOUT) to finish.

use crate::error::{DbError, DbResult};
use crate::mcp::SqlService;
use crate::tools::CommandRegistry;
use crate::transport::{Transport, drain_deadline, wait_for_signal};
use axum::Router;
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{info, warn};

pub struct HttpTransport {
    registry: Arc<CommandRegistry>,
    /// `host:port` to listen on
    bind_addr: String,
    /// Path the MCP service is mounted at
    endpoint: String,
}

impl HttpTransport {
    /// Create a new HTTP transport.
    ///
    /// # Arguments
    ///
    /// * `registry` - Commands to expose as tools
    /// * `bind_addr` - `host:port` to listen on
    /// * `endpoint` - MCP endpoint path (e.g., "/mcp")
    pub fn new(
        registry: Arc<CommandRegistry>,
        bind_addr: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            bind_addr: bind_addr.into(),
            endpoint: endpoint.into(),
        }
    }

    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn router(&self) -> Router {
        let registry = self.registry.clone();
        let service = StreamableHttpService::new(
            move || Ok(SqlService::new(registry.clone())),
            LocalSessionManager::default().into(),
            Default::default(),
        );

        // nest_service rejects the root path
        if self.endpoint == "/" {
            Router::new().fallback_service(service)
        } else {
            Router::new().nest_service(&self.endpoint, service)
        }
    }
}

impl Transport for HttpTransport {
    async fn run(&self) -> DbResult<()> {
        let listener = TcpListener::bind(&self.bind_addr).await.map_err(|e| {
            DbError::connection(format!("Failed to bind to {}: {}", self.bind_addr, e))
        })?;
        info!(addr = %self.bind_addr, endpoint = %self.endpoint, "Serving MCP over HTTP");

        let (signalled_tx, signalled_rx) = oneshot::channel();
        let shutdown = async move {
            wait_for_signal().await;
            let _ = signalled_tx.send(());
        };
        let server = axum::serve(listener, self.router()).with_graceful_shutdown(shutdown);

        tokio::select! {
            result = server => {
                result.map_err(|e| DbError::internal(format!("HTTP server error: {}", e)))?;
            }
            _ = drain_deadline(signalled_rx) => {
                warn!("Sessions still open after drain timeout, stopping");
            }
        }

        info!("HTTP server stopped");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
