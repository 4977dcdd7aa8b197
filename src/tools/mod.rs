//! Tool command implementations.
//!
//! This module contains the command registry and all database command handlers:
//! - `execute_statement`: Run an arbitrary SQL statement
//! - `list_tables`: List tables in a database
//! - `describe_table`: Get column metadata for a table
//! - `get_table_row_count`: Count the rows of a table
//! - `create_database`: Create an empty database file
//! - `delete_database`: Remove a database file
//! - `delete_table`: Drop a table if it exists

pub mod lifecycle;
pub mod registry;
pub mod schema;
pub mod statement;

pub use registry::{Command, CommandRegistry, Handler};

use crate::error::{DbError, DbResult};
use crate::models::{ParamSpec, ValidatedArgs};

/// Build the registry holding every database command.
pub fn default_registry() -> DbResult<CommandRegistry> {
    let mut registry = CommandRegistry::new();

    registry.register(
        statement::EXECUTE_STATEMENT,
        statement::EXECUTE_STATEMENT_DESCRIPTION,
        statement::execute_statement_schema(),
        statement::execute_statement,
    )?;
    registry.register(
        schema::LIST_TABLES,
        schema::LIST_TABLES_DESCRIPTION,
        schema::list_tables_schema(),
        schema::list_tables,
    )?;
    registry.register(
        schema::DESCRIBE_TABLE,
        schema::DESCRIBE_TABLE_DESCRIPTION,
        schema::table_schema(),
        schema::describe_table,
    )?;
    registry.register(
        schema::GET_TABLE_ROW_COUNT,
        schema::GET_TABLE_ROW_COUNT_DESCRIPTION,
        schema::table_schema(),
        schema::get_table_row_count,
    )?;
    registry.register(
        lifecycle::CREATE_DATABASE,
        lifecycle::CREATE_DATABASE_DESCRIPTION,
        lifecycle::database_path_schema(),
        lifecycle::create_database,
    )?;
    registry.register(
        lifecycle::DELETE_DATABASE,
        lifecycle::DELETE_DATABASE_DESCRIPTION,
        lifecycle::database_path_schema(),
        lifecycle::delete_database,
    )?;
    registry.register(
        lifecycle::DELETE_TABLE,
        lifecycle::DELETE_TABLE_DESCRIPTION,
        schema::table_schema(),
        lifecycle::delete_table,
    )?;

    Ok(registry)
}

pub(crate) fn connection_string_param() -> ParamSpec {
    ParamSpec::string(
        "connection_string",
        "Connection String",
        "Path to the SQLite database file, or a sqlite: URL (e.g. sqlite:data.db).",
    )
}

pub(crate) fn table_name_param() -> ParamSpec {
    ParamSpec::string(
        "table_name",
        "Table Name",
        "Name of the table. Letters, digits and underscores only; must not start with a digit.",
    )
}

/// Fetch a string argument the schema already guaranteed.
pub(crate) fn required_str(args: &ValidatedArgs, name: &str) -> DbResult<String> {
    args.str(name)
        .map(String::from)
        .ok_or_else(|| DbError::internal(format!("validated argument '{}' is missing", name)))
}
