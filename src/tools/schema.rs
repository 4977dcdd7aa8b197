//! Schema introspection commands.
//!
//! This module implements `list_tables`, `describe_table` and
//! `get_table_row_count`.

use crate::db::{self, ConnectionTarget, validate_identifier, with_connection};
use crate::error::{DbError, DbResult};
use crate::models::{ArgumentSchema, ResultEnvelope, ValidatedArgs};
use crate::tools::{connection_string_param, required_str, table_name_param};
use tracing::info;

pub const LIST_TABLES: &str = "list_tables";
pub const LIST_TABLES_DESCRIPTION: &str =
    "List the user tables of a database, ordered by name. SQLite's internal tables are not included.";

pub const DESCRIBE_TABLE: &str = "describe_table";
pub const DESCRIBE_TABLE_DESCRIPTION: &str = "Get the columns of a table: position (cid), name, \
    declared type, NOT NULL flag, default value and primary key position.";

pub const GET_TABLE_ROW_COUNT: &str = "get_table_row_count";
pub const GET_TABLE_ROW_COUNT_DESCRIPTION: &str = "Get the number of rows in a table.";

pub fn list_tables_schema() -> ArgumentSchema {
    ArgumentSchema::new().param(connection_string_param())
}

/// Schema shared by commands that address one table.
pub fn table_schema() -> ArgumentSchema {
    ArgumentSchema::new()
        .param(connection_string_param())
        .param(table_name_param())
}

/// Input for commands that address one table.
#[derive(Debug, Clone)]
pub struct TableInput {
    pub connection_string: String,
    pub table_name: String,
}

impl TableInput {
    pub fn from_args(args: &ValidatedArgs) -> DbResult<Self> {
        Ok(Self {
            connection_string: required_str(args, "connection_string")?,
            table_name: required_str(args, "table_name")?,
        })
    }
}

pub async fn list_tables(args: ValidatedArgs) -> ResultEnvelope {
    ResultEnvelope::from_result(run_list_tables(&args).await)
}

async fn run_list_tables(args: &ValidatedArgs) -> DbResult<ResultEnvelope> {
    let target = ConnectionTarget::parse(&required_str(args, "connection_string")?)?;

    let tables = with_connection(&target, |conn| {
        Box::pin(async move { db::schema::list_tables(conn).await })
    })
    .await?;

    info!(target_db = %target, count = tables.len(), "list_tables completed");
    Ok(ResultEnvelope::tables(tables))
}

pub async fn describe_table(args: ValidatedArgs) -> ResultEnvelope {
    let result = match TableInput::from_args(&args) {
        Ok(input) => run_describe_table(input).await,
        Err(e) => Err(e),
    };
    ResultEnvelope::from_result(result)
}

async fn run_describe_table(input: TableInput) -> DbResult<ResultEnvelope> {
    let table = validate_identifier(&input.table_name)?;
    let target = ConnectionTarget::parse(&input.connection_string)?;

    let lookup = table.clone();
    let columns = with_connection(&target, move |conn| {
        Box::pin(async move { db::schema::describe_columns(conn, &lookup).await })
    })
    .await?;

    if columns.is_empty() {
        return Err(DbError::not_found(format!("Table '{}' not found", table)));
    }

    info!(
        target_db = %target,
        table = %table,
        columns = columns.len(),
        "describe_table completed"
    );
    Ok(ResultEnvelope::schema(table.as_str(), columns))
}

pub async fn get_table_row_count(args: ValidatedArgs) -> ResultEnvelope {
    let result = match TableInput::from_args(&args) {
        Ok(input) => run_row_count(input).await,
        Err(e) => Err(e),
    };
    ResultEnvelope::from_result(result)
}

async fn run_row_count(input: TableInput) -> DbResult<ResultEnvelope> {
    let table = validate_identifier(&input.table_name)?;
    let target = ConnectionTarget::parse(&input.connection_string)?;

    let lookup = table.clone();
    let row_count = with_connection(&target, move |conn| {
        Box::pin(async move { db::schema::count_rows(conn, &lookup).await })
    })
    .await?;

    info!(target_db = %target, table = %table, row_count, "get_table_row_count completed");
    Ok(ResultEnvelope::row_count(table.as_str(), row_count))
}
