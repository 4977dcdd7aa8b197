//! The result envelope returned by every command.

use crate::error::{DbError, DbResult};
use crate::models::ColumnDescriptor;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

/// A result row: column name to value, in result-set column order.
pub type Row = Map<String, JsonValue>;

/// Outcome of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    Error,
    NotFound,
    Exists,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
            Self::NotFound => write!(f, "not_found"),
            Self::Exists => write!(f, "exists"),
        }
    }
}

/// Status-specific payload. Exactly one is present per envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Rows { data: Vec<Row> },
    Affected { affected_rows: u64 },
    Schema {
        table: String,
        columns: Vec<ColumnDescriptor>,
    },
    Tables { tables: Vec<String> },
    RowCount { table: String, row_count: u64 },
    Message { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEnvelope {
    pub status: Status,
    #[serde(flatten)]
    pub payload: Payload,
}

impl ResultEnvelope {
    pub fn rows(data: Vec<Row>) -> Self {
        Self::success(Payload::Rows { data })
    }

    pub fn affected(affected_rows: u64) -> Self {
        Self::success(Payload::Affected { affected_rows })
    }

    pub fn schema(table: impl Into<String>, columns: Vec<ColumnDescriptor>) -> Self {
        Self::success(Payload::Schema {
            table: table.into(),
            columns,
        })
    }

    pub fn tables(tables: Vec<String>) -> Self {
        Self::success(Payload::Tables { tables })
    }

    pub fn row_count(table: impl Into<String>, row_count: u64) -> Self {
        Self::success(Payload::RowCount {
            table: table.into(),
            row_count,
        })
    }

    /// Informational success carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self::with_message(Status::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_message(Status::Error, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_message(Status::NotFound, message)
    }

    pub fn exists(message: impl Into<String>) -> Self {
        Self::with_message(Status::Exists, message)
    }

    fn success(payload: Payload) -> Self {
        Self {
            status: Status::Success,
            payload,
        }
    }

    fn with_message(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            payload: Payload::Message {
                message: message.into(),
            },
        }
    }

    /// Fold a handler result into an envelope.
    ///
    /// `NotFound` and `AlreadyExists` keep their own statuses; every other
    /// error becomes `status = error` carrying the error text.
    pub fn from_result(result: DbResult<ResultEnvelope>) -> Self {
        match result {
            Ok(envelope) => envelope,
            Err(DbError::NotFound { message }) => Self::not_found(message),
            Err(DbError::AlreadyExists { message }) => Self::exists(message),
            Err(err) => Self::error(err.to_string()),
        }
    }

    /// True when the call failed; `not_found` and `exists` are answers, not failures.
    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }

    /// Serialize as pretty-printed JSON, the wire form handed to the transport.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            format!(
                r#"{{"status":"error","message":"failed to serialize result: {}"}}"#,
                e
            )
        })
    }
}
