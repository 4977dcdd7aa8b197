//! Connection targets and scoped connections.
//!
//! A target names one SQLite store: a plain file path or a `sqlite:` URL.
//! Connections are never cached; [`with_connection`] opens one for the
//! duration of a single operation and closes it on every exit path.

use crate::error::{DbError, DbResult};
use futures_util::future::BoxFuture;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

const SQLITE_SCHEME: &str = "sqlite:";
const MEMORY_TARGET: &str = ":memory:";

/// Parsed connection target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionTarget {
    /// A database file. `read_only` comes from `?mode=ro` in URL form.
    File { path: PathBuf, read_only: bool },
    /// A private in-memory database, discarded when the connection closes.
    Memory,
}

impl ConnectionTarget {
    /// Parse a target string.
    ///
    /// # Format
    ///
    /// ```text
    /// data/app.db                 # plain path
    /// sqlite:data/app.db          # URL form, relative path
    /// sqlite:///var/lib/app.db    # URL form, absolute path
    /// sqlite:app.db?mode=ro       # open read-only
    /// sqlite::memory:             # in-memory
    /// ```
    pub fn parse(raw: &str) -> DbResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(DbError::connection("Connection target cannot be empty"));
        }

        let Some(rest) = strip_scheme(raw) else {
            return Ok(Self::from_path(raw, false));
        };

        let (location, query) = match rest.split_once('?') {
            Some((location, query)) => (location, Some(query)),
            None => (rest, None),
        };

        let mut read_only = false;
        if let Some(query) = query {
            for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
                match (key.as_ref(), value.as_ref()) {
                    ("mode", "ro") => read_only = true,
                    ("mode", "rw" | "rwc") => read_only = false,
                    (key, _) => debug!(option = %key, "Ignoring connection target option"),
                }
            }
        }

        if location.is_empty() {
            return Err(DbError::connection(format!(
                "Connection target '{}' has no database path",
                raw
            )));
        }

        Ok(Self::from_path(location, read_only))
    }

    fn from_path(path: &str, read_only: bool) -> Self {
        if path == MEMORY_TARGET {
            Self::Memory
        } else {
            Self::File {
                path: PathBuf::from(path),
                read_only,
            }
        }
    }

    /// Path of the database file, if this target is file-backed.
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            Self::File { path, .. } => Some(path),
            Self::Memory => None,
        }
    }

    fn connect_options(&self, create_if_missing: bool) -> DbResult<SqliteConnectOptions> {
        match self {
            Self::File { path, read_only } => Ok(SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(create_if_missing && !read_only)
                .read_only(*read_only)),
            Self::Memory => SqliteConnectOptions::from_str("sqlite::memory:").map_err(DbError::from),
        }
    }

    /// Open a connection to an existing store.
    pub async fn connect(&self) -> DbResult<SqliteConnection> {
        debug!(target_db = %self, "Opening connection");
        Ok(self.connect_options(false)?.connect().await?)
    }

    /// Open a connection, creating the database file when missing.
    pub async fn connect_or_create(&self) -> DbResult<SqliteConnection> {
        debug!(target_db = %self, "Opening connection (create if missing)");
        Ok(self.connect_options(true)?.connect().await?)
    }
}

fn strip_scheme(raw: &str) -> Option<&str> {
    let prefix = raw.get(..SQLITE_SCHEME.len())?;
    if !prefix.eq_ignore_ascii_case(SQLITE_SCHEME) {
        return None;
    }
    let rest = &raw[SQLITE_SCHEME.len()..];
    Some(rest.strip_prefix("//").unwrap_or(rest))
}

impl std::fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File { path, .. } => write!(f, "{}", path.display()),
            Self::Memory => f.write_str(MEMORY_TARGET),
        }
    }
}

/// Run `op` against a fresh connection to `target`, closing it afterwards.
///
/// The connection is closed whether `op` succeeds or fails; a panic inside
/// `op` still releases it through the connection's `Drop`.
pub async fn with_connection<T, F>(target: &ConnectionTarget, op: F) -> DbResult<T>
where
    T: Send,
    F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, DbResult<T>> + Send,
{
    let mut conn = target.connect().await?;
    let result = op(&mut conn).await;
    close_connection(target, conn).await;
    result
}

/// Gracefully close a connection; failures are logged, not returned.
pub async fn close_connection(target: &ConnectionTarget, conn: SqliteConnection) {
    if let Err(e) = conn.close().await {
        warn!(target_db = %target, error = %e, "Failed to close connection cleanly");
    }
}
