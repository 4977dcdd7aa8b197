//! SQL Tool Server Library
//!
//! This library provides MCP (Model Context Protocol) tools for AI assistants
//! to query and manage SQLite databases. Commands live in a
//! [`CommandRegistry`](tools::CommandRegistry); each one validates its
//! arguments, runs against a per-call connection and answers with a
//! [`ResultEnvelope`](models::ResultEnvelope).

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::{DbError, DbResult};
pub use mcp::SqlService;
pub use models::ResultEnvelope;
pub use tools::{CommandRegistry, default_registry};
