//! Error types for the SQL tool server.
//!
//! This module defines all error types using `thiserror` for ergonomic error handling.
//! Dispatch errors (`UnknownCommand`, `InvalidArguments`) are structural and surface
//! to the MCP client as protocol errors; everything else is folded into a
//! [`ResultEnvelope`](crate::models::ResultEnvelope) by the command handlers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Unknown command: {name}")]
    UnknownCommand { name: String },

    #[error("Command already registered: {name}")]
    DuplicateCommand { name: String },

    #[error("Invalid arguments for '{command}': {}", problems.join("; "))]
    InvalidArguments {
        command: String,
        problems: Vec<String>,
    },

    #[error(
        "Invalid identifier '{name}': must start with a letter or underscore and contain only letters, digits and underscores"
    )]
    InvalidIdentifier { name: String },

    #[error("Invalid statement: {message}")]
    InvalidStatement { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Already exists: {message}")]
    AlreadyExists { message: String },

    #[error("Connection failed: {message}")]
    Connection { message: String },

    #[error("Database error: {message}")]
    Database {
        message: String,
        /// SQLite extended result code, when the driver reports one
        code: Option<String>,
    },

    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DbError {
    /// Create an unknown command error.
    pub fn unknown_command(name: impl Into<String>) -> Self {
        Self::UnknownCommand { name: name.into() }
    }

    /// Create a duplicate command error.
    pub fn duplicate_command(name: impl Into<String>) -> Self {
        Self::DuplicateCommand { name: name.into() }
    }

    /// Create an invalid arguments error listing every offending parameter.
    pub fn invalid_arguments(command: impl Into<String>, problems: Vec<String>) -> Self {
        Self::InvalidArguments {
            command: command.into(),
            problems,
        }
    }

    /// Create an invalid identifier error.
    pub fn invalid_identifier(name: impl Into<String>) -> Self {
        Self::InvalidIdentifier { name: name.into() }
    }

    /// Create an invalid statement error.
    pub fn invalid_statement(message: impl Into<String>) -> Self {
        Self::InvalidStatement {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::AlreadyExists {
            message: message.into(),
        }
    }

    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a database error with an optional result code.
    pub fn database(message: impl Into<String>, code: Option<String>) -> Self {
        Self::Database {
            message: message.into(),
            code,
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// True for errors raised by the dispatcher before any handler runs.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::UnknownCommand { .. } | Self::InvalidArguments { .. }
        )
    }
}

/// Convert sqlx errors to DbError.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => DbError::connection(msg.to_string()),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                DbError::database(db_err.message(), code)
            }
            sqlx::Error::RowNotFound => DbError::database("No rows returned", None),
            sqlx::Error::Io(io_err) => DbError::connection(format!("I/O error: {}", io_err)),
            sqlx::Error::Protocol(msg) => DbError::connection(format!("Protocol error: {}", msg)),
            sqlx::Error::ColumnNotFound(col) => {
                DbError::database(format!("Column not found: {}", col), None)
            }
            sqlx::Error::ColumnIndexOutOfBounds { index, len } => DbError::internal(format!(
                "Column index {} out of bounds (len: {})",
                index, len
            )),
            sqlx::Error::ColumnDecode { index, source } => {
                DbError::internal(format!("Failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => DbError::internal(format!("Decode error: {}", source)),
            sqlx::Error::WorkerCrashed => DbError::internal("Database worker crashed"),
            _ => DbError::internal(format!("Unknown database error: {}", err)),
        }
    }
}

impl From<std::io::Error> for DbError {
    fn from(err: std::io::Error) -> Self {
        DbError::io(err.to_string())
    }
}

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Convert DbError to MCP ErrorData.
///
/// Only structural errors normally reach this conversion; data-layer errors
/// travel inside the result envelope instead.
impl From<DbError> for rmcp::ErrorData {
    fn from(err: DbError) -> Self {
        match &err {
            DbError::InvalidArguments { problems, .. } => rmcp::ErrorData::invalid_params(
                err.to_string(),
                Some(serde_json::json!({ "problems": problems })),
            ),
            DbError::UnknownCommand { .. } => rmcp::ErrorData::new(
                rmcp::model::ErrorCode::METHOD_NOT_FOUND,
                err.to_string(),
                None,
            ),
            DbError::InvalidIdentifier { .. } | DbError::InvalidStatement { .. } => {
                rmcp::ErrorData::invalid_params(err.to_string(), None)
            }
            DbError::NotFound { .. } => rmcp::ErrorData::resource_not_found(err.to_string(), None),
            DbError::DuplicateCommand { .. }
            | DbError::AlreadyExists { .. }
            | DbError::Connection { .. }
            | DbError::Io { .. }
            | DbError::Internal { .. } => rmcp::ErrorData::internal_error(err.to_string(), None),
            DbError::Database { message, code } => {
                let msg = match code {
                    Some(code) => format!("{} (code: {})", message, code),
                    None => message.clone(),
                };
                rmcp::ErrorData::internal_error(msg, None)
            }
        }
    }
}
