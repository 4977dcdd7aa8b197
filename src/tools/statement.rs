//! The `execute_statement` command.

use crate::db::executor::{self, StatementKind};
use crate::db::{ConnectionTarget, with_connection};
use crate::error::DbResult;
use crate::models::{ArgumentSchema, ParamSpec, ResultEnvelope, ValidatedArgs};
use crate::tools::{connection_string_param, required_str};
use tracing::info;

pub const EXECUTE_STATEMENT: &str = "execute_statement";
pub const EXECUTE_STATEMENT_DESCRIPTION: &str = "Execute a SQL statement on the given database.\n\
    Statements starting with SELECT return rows as a list of column/value objects in `data`.\n\
    Any other statement is committed and reports `affected_rows`.\n\
    Exactly one statement runs per call; text holding several is rejected.";

/// Number of statement characters written to the log.
const LOG_PREVIEW_CHARS: usize = 20;

pub fn execute_statement_schema() -> ArgumentSchema {
    ArgumentSchema::new()
        .param(connection_string_param())
        .param(ParamSpec::string(
            "query",
            "SQL Query",
            "The SQL statement to execute.",
        ))
}

/// Input for the execute_statement command.
#[derive(Debug, Clone)]
pub struct StatementInput {
    pub connection_string: String,
    pub query: String,
}

impl StatementInput {
    pub fn from_args(args: &ValidatedArgs) -> DbResult<Self> {
        Ok(Self {
            connection_string: required_str(args, "connection_string")?,
            query: required_str(args, "query")?,
        })
    }
}

pub async fn execute_statement(args: ValidatedArgs) -> ResultEnvelope {
    let result = match StatementInput::from_args(&args) {
        Ok(input) => run(input).await,
        Err(e) => Err(e),
    };
    ResultEnvelope::from_result(result)
}

async fn run(input: StatementInput) -> DbResult<ResultEnvelope> {
    let target = ConnectionTarget::parse(&input.connection_string)?;
    executor::ensure_single_statement(&input.query)?;
    let kind = StatementKind::classify(&input.query);

    info!(target_db = %target, "execute_statement triggered");
    // Statement text may carry data values; only a prefix is logged
    info!(
        preview = %statement_preview(&input.query),
        kind = ?kind,
        "Statement starts with"
    );

    let sql = input.query;
    with_connection(&target, move |conn| {
        Box::pin(async move {
            match kind {
                StatementKind::Query => {
                    let rows = executor::fetch_rows(conn, &sql).await?;
                    Ok(ResultEnvelope::rows(rows))
                }
                StatementKind::Write => {
                    let affected = executor::execute_write(conn, &sql).await?;
                    Ok(ResultEnvelope::affected(affected))
                }
            }
        })
    })
    .await
}

fn statement_preview(sql: &str) -> String {
    let trimmed = sql.trim();
    let preview: String = trimmed.chars().take(LOG_PREVIEW_CHARS).collect();
    if trimmed.chars().count() > LOG_PREVIEW_CHARS {
        format!("{}...", preview)
    } else {
        preview
    }
}
