//! SQL Tool Server - Main entry point.
//!
//! This server provides MCP (Model Context Protocol) tools for AI assistants
//! to query and manage SQLite databases.

use sql_tool_server::config::{Config, TransportMode};
use sql_tool_server::db::sample::{SeedOutcome, seed_sample_database};
use sql_tool_server::tools::default_registry;
use sql_tool_server::transport::{HttpTransport, StdioTransport, Transport};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr; stdout belongs to the stdio transport.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from command line and environment
    let config = Config::parse_args();

    init_tracing(&config);

    info!(
        transport = %config.transport,
        "Starting SQL Tool Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    if let Some(path) = &config.sample_db {
        match seed_sample_database(path).await? {
            SeedOutcome::Created => info!(path = %path.display(), "Sample database ready"),
            SeedOutcome::AlreadyPresent => {
                info!(path = %path.display(), "Using existing sample database")
            }
        }
    }

    let registry = Arc::new(default_registry()?);
    info!(commands = registry.len(), "Command registry built");

    // Run the appropriate transport
    let result = match config.transport {
        TransportMode::Stdio => {
            info!("Using stdio transport");
            let transport = StdioTransport::new(registry);
            transport.run().await
        }
        TransportMode::Http => {
            let bind_addr = config.http_bind_addr();
            info!(addr = %bind_addr, endpoint = %config.mcp_endpoint, "Using HTTP transport");
            let transport = HttpTransport::new(registry, bind_addr, &config.mcp_endpoint);
            transport.run().await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
