//! Database and table lifecycle commands.
//!
//! This module implements `create_database`, `delete_database` and
//! `delete_table`.

use crate::db::target::close_connection;
use crate::db::{self, ConnectionTarget, validate_identifier, with_connection};
use crate::error::{DbError, DbResult};
use crate::models::{ArgumentSchema, ParamSpec, ResultEnvelope, ValidatedArgs};
use crate::tools::required_str;
use crate::tools::schema::TableInput;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const CREATE_DATABASE: &str = "create_database";
pub const CREATE_DATABASE_DESCRIPTION: &str = "Create a new, empty SQLite database file. \
    Reports `exists` if a file is already present at the path.";

pub const DELETE_DATABASE: &str = "delete_database";
pub const DELETE_DATABASE_DESCRIPTION: &str = "Delete a SQLite database file together with its \
    -wal and -shm side files. Reports `not_found` if there is no file at the path.";

pub const DELETE_TABLE: &str = "delete_table";
pub const DELETE_TABLE_DESCRIPTION: &str =
    "Drop a table from a database. Reports `not_found` if the table does not exist.";

/// Files SQLite keeps next to the main database file.
const SIDE_FILE_SUFFIXES: &[&str] = &["-wal", "-shm", "-journal"];

pub fn database_path_schema() -> ArgumentSchema {
    ArgumentSchema::new().param(ParamSpec::string(
        "db_path",
        "Database Path",
        "Path of the SQLite database file (a sqlite: URL is accepted too).",
    ))
}

/// Resolve `db_path` to a file path; in-memory targets have no file to manage.
fn database_file(args: &ValidatedArgs) -> DbResult<(ConnectionTarget, PathBuf)> {
    let target = ConnectionTarget::parse(&required_str(args, "db_path")?)?;
    let path = target
        .file_path()
        .map(Path::to_path_buf)
        .ok_or_else(|| DbError::connection("An in-memory database has no file to manage"))?;
    Ok((target, path))
}

pub async fn create_database(args: ValidatedArgs) -> ResultEnvelope {
    ResultEnvelope::from_result(run_create_database(&args).await)
}

async fn run_create_database(args: &ValidatedArgs) -> DbResult<ResultEnvelope> {
    let (target, path) = database_file(args)?;

    if tokio::fs::try_exists(&path).await? {
        info!(path = %path.display(), "Database already exists");
        return Err(DbError::already_exists(format!(
            "Database already exists at {}",
            path.display()
        )));
    }

    let conn = target.connect_or_create().await?;
    close_connection(&target, conn).await;

    info!(path = %path.display(), "Database created");
    Ok(ResultEnvelope::message(format!(
        "Database created at {}",
        path.display()
    )))
}

pub async fn delete_database(args: ValidatedArgs) -> ResultEnvelope {
    ResultEnvelope::from_result(run_delete_database(&args).await)
}

async fn run_delete_database(args: &ValidatedArgs) -> DbResult<ResultEnvelope> {
    let (_, path) = database_file(args)?;

    match tokio::fs::remove_file(&path).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "No database to delete");
            return Err(DbError::not_found(format!(
                "Database not found at {}",
                path.display()
            )));
        }
        Err(e) => return Err(e.into()),
    }

    for side_file in side_files(&path) {
        match tokio::fs::remove_file(&side_file).await {
            Ok(()) => debug!(path = %side_file.display(), "Removed side file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %side_file.display(), error = %e, "Failed to remove side file"),
        }
    }

    info!(path = %path.display(), "Database deleted");
    Ok(ResultEnvelope::message(format!(
        "Database deleted at {}",
        path.display()
    )))
}

fn side_files(path: &Path) -> Vec<PathBuf> {
    SIDE_FILE_SUFFIXES
        .iter()
        .map(|suffix| {
            let mut name = OsString::from(path.as_os_str());
            name.push(suffix);
            PathBuf::from(name)
        })
        .collect()
}

pub async fn delete_table(args: ValidatedArgs) -> ResultEnvelope {
    let result = match TableInput::from_args(&args) {
        Ok(input) => run_delete_table(input).await,
        Err(e) => Err(e),
    };
    ResultEnvelope::from_result(result)
}

async fn run_delete_table(input: TableInput) -> DbResult<ResultEnvelope> {
    let table = validate_identifier(&input.table_name)?;
    let target = ConnectionTarget::parse(&input.connection_string)?;

    let dropped = table.clone();
    with_connection(&target, move |conn| {
        Box::pin(async move {
            if !db::schema::table_exists(conn, &dropped).await? {
                return Err(DbError::not_found(format!("Table '{}' not found", dropped)));
            }
            db::schema::drop_table(conn, &dropped).await
        })
    })
    .await?;

    info!(target_db = %target, table = %table, "delete_table completed");
    Ok(ResultEnvelope::message(format!("Table '{}' deleted", table)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;
    use serde_json::json;

    fn path_args(path: &Path) -> ValidatedArgs {
        let raw = json!({ "db_path": path.to_str().unwrap() })
            .as_object()
            .cloned()
            .unwrap();
        database_path_schema().validate(&raw).unwrap()
    }

    #[test]
    fn test_side_files() {
        let files = side_files(Path::new("/tmp/app.db"));
        assert_eq!(
            files,
            vec![
                PathBuf::from("/tmp/app.db-wal"),
                PathBuf::from("/tmp/app.db-shm"),
                PathBuf::from("/tmp/app.db-journal"),
            ]
        );
    }

    #[tokio::test]
    async fn test_create_then_exists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.db");

        let env = create_database(path_args(&path)).await;
        assert_eq!(env.status, Status::Success);
        assert!(path.exists());

        let env = create_database(path_args(&path)).await;
        assert_eq!(env.status, Status::Exists);
    }

    #[tokio::test]
    async fn test_create_in_missing_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("new.db");
        let env = create_database(path_args(&path)).await;
        assert_eq!(env.status, Status::Error);
    }

    #[tokio::test]
    async fn test_delete_removes_side_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.db");
        std::fs::write(&path, b"").unwrap();
        std::fs::write(dir.path().join("gone.db-wal"), b"").unwrap();

        let env = delete_database(path_args(&path)).await;
        assert_eq!(env.status, Status::Success);
        assert!(!path.exists());
        assert!(!dir.path().join("gone.db-wal").exists());

        let env = delete_database(path_args(&path)).await;
        assert_eq!(env.status, Status::NotFound);
    }

    #[tokio::test]
    async fn test_missing_and_existing_files_are_typed_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");

        let err = run_delete_database(&path_args(&path)).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }), "{:?}", err);

        std::fs::write(&path, b"").unwrap();
        let err = run_create_database(&path_args(&path)).await.unwrap_err();
        assert!(matches!(err, DbError::AlreadyExists { .. }), "{:?}", err);

        let env = serde_json::to_value(create_database(path_args(&path)).await).unwrap();
        assert_eq!(
            env,
            json!({
                "status": "exists",
                "message": format!("Database already exists at {}", path.display()),
            })
        );
    }

    #[tokio::test]
    async fn test_memory_target_has_no_file() {
        let raw = json!({ "db_path": "sqlite::memory:" })
            .as_object()
            .cloned()
            .unwrap();
        let env = create_database(database_path_schema().validate(&raw).unwrap()).await;
        assert_eq!(env.status, Status::Error);
    }
}
