//! Data models for the SQL tool server.
//!
//! This module re-exports all model types used throughout the application.

pub mod args;
pub mod envelope;
pub mod schema;

// Re-export commonly used types
pub use args::{ArgType, ArgValue, ArgumentSchema, ParamSpec, ValidatedArgs};
pub use envelope::{Payload, ResultEnvelope, Row, Status};
pub use schema::ColumnDescriptor;
