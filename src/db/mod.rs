//! Database abstraction layer.
//!
//! This module provides database access functionality:
//! - Connection targets and scoped, per-operation connections
//! - Identifier validation for table names spliced into statements
//! - Statement execution
//! - Catalog introspection and table lifecycle
//! - Row to JSON conversion
//! - Demo database seeding

pub mod executor;
pub mod identifier;
pub mod sample;
pub mod schema;
pub mod target;
pub mod types;

pub use executor::StatementKind;
pub use identifier::{Identifier, validate_identifier};
pub use target::{ConnectionTarget, with_connection};
