//! Configuration handling for the SQL tool server.
//!
//! This module provides configuration management via CLI arguments and environment variables.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_MCP_ENDPOINT: &str = "/";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Transport mode for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Standard input/output (for CLI integration)
    #[default]
    Stdio,
    /// Streamable HTTP (for web clients)
    Http,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Configuration for the SQL tool server.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sql-tool-server",
    about = "MCP server exposing SQLite database tools to AI assistants",
    version,
    author
)]
pub struct Config {
    /// Transport mode (stdio or http)
    #[arg(
        short,
        long,
        value_enum,
        default_value = "stdio",
        env = "MCP_TRANSPORT"
    )]
    pub transport: TransportMode,

    /// HTTP host to bind to (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_HTTP_HOST,
        env = "MCP_HTTP_HOST"
    )]
    pub http_host: String,

    /// HTTP port to bind to (only used with http transport)
    #[arg(
        long,
        default_value_t = DEFAULT_HTTP_PORT,
        env = "MCP_HTTP_PORT"
    )]
    pub http_port: u16,

    /// MCP endpoint path (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_MCP_ENDPOINT,
        env = "MCP_ENDPOINT",
        value_parser = parse_endpoint
    )]
    pub mcp_endpoint: String,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, default_value = DEFAULT_LOG_LEVEL, env = "MCP_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "MCP_JSON_LOGS")]
    pub json_logs: bool,

    /// Create the demo employees/departments database at this path before
    /// serving. An existing file is left untouched.
    #[arg(long, value_name = "PATH", env = "MCP_SAMPLE_DB")]
    pub sample_db: Option<PathBuf>,
}

fn parse_endpoint(raw: &str) -> Result<String, String> {
    if raw.starts_with('/') {
        Ok(raw.to_string())
    } else {
        Err(format!("endpoint must start with '/', got '{}'", raw))
    }
}

impl Config {
    /// Parse configuration from command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the HTTP bind address.
    pub fn http_bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_flags() {
        let config = Config::try_parse_from(["sql-tool-server"]).unwrap();
        assert_eq!(config.transport, TransportMode::Stdio);
        assert_eq!(config.http_host, DEFAULT_HTTP_HOST);
        assert_eq!(config.http_port, DEFAULT_HTTP_PORT);
        assert_eq!(config.mcp_endpoint, DEFAULT_MCP_ENDPOINT);
        assert!(config.sample_db.is_none());
        assert_eq!(config.http_bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_http_bind_addr() {
        let config = Config::try_parse_from([
            "sql-tool-server",
            "--http-host",
            "0.0.0.0",
            "--http-port",
            "3000",
        ])
        .unwrap();
        assert_eq!(config.http_bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_parse_http_flags() {
        let config = Config::try_parse_from([
            "sql-tool-server",
            "--transport",
            "http",
            "--http-port",
            "9000",
            "--mcp-endpoint",
            "/mcp",
            "--sample-db",
            "demo.db",
        ])
        .unwrap();
        assert_eq!(config.transport, TransportMode::Http);
        assert_eq!(config.http_port, 9000);
        assert_eq!(config.mcp_endpoint, "/mcp");
        assert_eq!(config.sample_db, Some(PathBuf::from("demo.db")));
    }

    #[test]
    fn test_parse_rejects_relative_endpoint() {
        let result = Config::try_parse_from(["sql-tool-server", "--mcp-endpoint", "mcp"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_transport() {
        let result = Config::try_parse_from(["sql-tool-server", "--transport", "carrier-pigeon"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_transport_display() {
        assert_eq!(TransportMode::Stdio.to_string(), "stdio");
        assert_eq!(TransportMode::Http.to_string(), "http");
    }
}
