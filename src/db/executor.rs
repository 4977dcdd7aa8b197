//! Statement execution.
//!
//! A statement is classified by its leading keyword: anything starting with
//! `SELECT` (after trimming, case-insensitive) fetches rows, everything else is
//! executed as a write and reports the number of affected rows. SQLite runs each
//! statement in autocommit mode, so a write is committed when it returns.
//!
//! The driver runs every `;`-separated statement in the text it is given, so
//! input is checked with [`ensure_single_statement`] before it reaches a
//! connection.

use crate::db::types::row_to_json;
use crate::error::{DbError, DbResult};
use crate::models::Row;
use futures_util::TryStreamExt;
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;
use sqlparser::tokenizer::{Token, Tokenizer};
use sqlx::sqlite::SqliteConnection;
use tracing::debug;

pub const MULTIPLE_STATEMENTS: &str = "only one statement may be executed at a time";

/// How a statement's result is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Returns rows
    Query,
    /// Returns an affected-row count
    Write,
}

impl StatementKind {
    pub fn classify(sql: &str) -> Self {
        let head = sql.trim_start();
        match head.get(..6) {
            Some(keyword) if keyword.eq_ignore_ascii_case("SELECT") => Self::Query,
            _ => Self::Write,
        }
    }
}

/// Reject text holding zero or several statements.
///
/// A single trailing `;` is allowed. Text the parser does not understand is
/// counted by splitting its tokens on `;`, so SQLite-only syntax still reaches
/// the store, which reports genuine syntax errors itself.
pub fn ensure_single_statement(sql: &str) -> DbResult<()> {
    let dialect = SQLiteDialect {};
    let count = match Parser::parse_sql(&dialect, sql) {
        Ok(statements) => statements.len(),
        Err(e) => {
            debug!(error = %e, "Statement not parsed, counting by tokens");
            count_by_tokens(&dialect, sql)
        }
    };

    match count {
        0 => Err(DbError::invalid_statement("statement is empty")),
        1 => Ok(()),
        _ => Err(DbError::invalid_statement(MULTIPLE_STATEMENTS)),
    }
}

fn count_by_tokens(dialect: &SQLiteDialect, sql: &str) -> usize {
    let tokens = match Tokenizer::new(dialect, sql).tokenize() {
        Ok(tokens) => tokens,
        // Unterminated quote or comment: one malformed statement
        Err(_) => return 1,
    };

    let mut count = 0;
    let mut in_statement = false;
    for token in tokens {
        match token {
            Token::SemiColon => in_statement = false,
            Token::Whitespace(_) | Token::EOF => {}
            _ if !in_statement => {
                in_statement = true;
                count += 1;
            }
            _ => {}
        }
    }
    count
}

/// Run a query and return every row, in result order.
pub async fn fetch_rows(conn: &mut SqliteConnection, sql: &str) -> DbResult<Vec<Row>> {
    let rows: Vec<Row> = sqlx::query(sql)
        .fetch(&mut *conn)
        .map_ok(|row| row_to_json(&row))
        .try_collect()
        .await?;

    debug!(row_count = rows.len(), "Query returned rows");
    Ok(rows)
}

/// Execute a write statement and return the affected row count.
pub async fn execute_write(conn: &mut SqliteConnection, sql: &str) -> DbResult<u64> {
    let result = sqlx::query(sql).execute(&mut *conn).await?;
    let rows_affected = result.rows_affected();

    debug!(rows_affected, "Write statement executed");
    Ok(rows_affected)
}
