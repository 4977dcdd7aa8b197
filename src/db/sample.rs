//! Demo database seeding.
//!
//! Builds the small `employees` / `departments` database that agents are
//! pointed at when trying the server out.

use crate::db::target::{ConnectionTarget, close_connection};
use crate::error::{DbError, DbResult};
use futures_util::future::BoxFuture;
use sqlx::sqlite::SqliteConnection;
use sqlx::{Connection, Row};
use std::path::Path;
use tracing::{info, warn};

const CREATE_EMPLOYEES: &str = r#"
    CREATE TABLE employees (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        department TEXT,
        salary REAL,
        hire_date TEXT
    )
    "#;

const CREATE_DEPARTMENTS: &str = r#"
    CREATE TABLE departments (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        budget REAL,
        location TEXT
    )
    "#;

const EMPLOYEES: &[(i64, &str, &str, f64, &str)] = &[
    (1, "John Doe", "Engineering", 85000.00, "2020-01-15"),
    (2, "Jane Smith", "Marketing", 75000.00, "2019-05-20"),
    (3, "Bob Johnson", "Engineering", 95000.00, "2018-11-10"),
    (4, "Alice Brown", "HR", 65000.00, "2021-03-05"),
    (5, "Charlie Davis", "Engineering", 90000.00, "2020-08-12"),
];

const DEPARTMENTS: &[(i64, &str, f64, &str)] = &[
    (1, "Engineering", 1000000.00, "Building A"),
    (2, "Marketing", 500000.00, "Building B"),
    (3, "HR", 300000.00, "Building A"),
    (4, "Finance", 600000.00, "Building C"),
];

/// What [`seed_sample_database`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created,
    /// The file was already there and was left untouched
    AlreadyPresent,
}

/// Create the demo database at `path` unless a file already exists there.
///
/// A file whose population fails is removed again, so the next start seeds
/// from scratch instead of finding an empty database.
pub async fn seed_sample_database(path: &Path) -> DbResult<SeedOutcome> {
    if tokio::fs::try_exists(path).await? {
        info!(path = %path.display(), "Sample database already present, not reseeding");
        return Ok(SeedOutcome::AlreadyPresent);
    }

    create_with(path, |conn| Box::pin(populate(conn))).await?;

    info!(
        path = %path.display(),
        employees = EMPLOYEES.len(),
        departments = DEPARTMENTS.len(),
        "Sample database created"
    );
    Ok(SeedOutcome::Created)
}

async fn create_with<F>(path: &Path, fill: F) -> DbResult<()>
where
    F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, DbResult<()>>,
{
    let target = ConnectionTarget::File {
        path: path.to_path_buf(),
        read_only: false,
    };
    let mut conn = target.connect_or_create().await?;
    let result = fill(&mut conn).await;
    close_connection(&target, conn).await;

    if let Err(e) = result {
        warn!(path = %path.display(), error = %e, "Sample database population failed");
        if let Err(remove_err) = tokio::fs::remove_file(path).await {
            warn!(
                path = %path.display(),
                error = %remove_err,
                "Failed to remove partial sample database"
            );
        }
        return Err(e);
    }
    Ok(())
}

async fn populate(conn: &mut SqliteConnection) -> DbResult<()> {
    let mut tx = conn.begin().await?;

    sqlx::query(CREATE_EMPLOYEES).execute(&mut *tx).await?;
    for (id, name, department, salary, hire_date) in EMPLOYEES {
        sqlx::query("INSERT INTO employees VALUES (?, ?, ?, ?, ?)")
            .bind(*id)
            .bind(*name)
            .bind(*department)
            .bind(*salary)
            .bind(*hire_date)
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query(CREATE_DEPARTMENTS).execute(&mut *tx).await?;
    for (id, name, budget, location) in DEPARTMENTS {
        sqlx::query("INSERT INTO departments VALUES (?, ?, ?, ?)")
            .bind(*id)
            .bind(*name)
            .bind(*budget)
            .bind(*location)
            .execute(&mut *tx)
            .await?;
    }

    let seeded: i64 = sqlx::query("SELECT COUNT(*) AS n FROM employees")
        .fetch_one(&mut *tx)
        .await?
        .try_get("n")?;
    if seeded as usize != EMPLOYEES.len() {
        return Err(DbError::internal(format!(
            "expected {} sample employees, found {}",
            EMPLOYEES.len(),
            seeded
        )));
    }

    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_creates_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.db");

        assert_eq!(
            seed_sample_database(&path).await.unwrap(),
            SeedOutcome::Created
        );

        let target = ConnectionTarget::File {
            path: path.clone(),
            read_only: true,
        };
        let mut conn = target.connect().await.unwrap();
        let employees: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM employees")
            .fetch_one(&mut conn)
            .await
            .unwrap();
        let departments: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM departments")
            .fetch_one(&mut conn)
            .await
            .unwrap();
        assert_eq!(employees.0, 5);
        assert_eq!(departments.0, 4);
    }

    #[tokio::test]
    async fn test_failed_population_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.db");

        let result = create_with(&path, |conn| {
            Box::pin(async move {
                sqlx::query("CREATE TABLE half (x INTEGER)")
                    .execute(&mut *conn)
                    .await?;
                let failed: DbResult<()> = Err(DbError::internal("disk full"));
                failed
            })
        })
        .await;
        assert!(matches!(result, Err(DbError::Internal { .. })));
        assert!(!path.exists());

        // The next start seeds normally
        assert_eq!(
            seed_sample_database(&path).await.unwrap(),
            SeedOutcome::Created
        );
    }

    #[tokio::test]
    async fn test_seed_leaves_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.db");
        std::fs::write(&path, b"").unwrap();

        assert_eq!(
            seed_sample_database(&path).await.unwrap(),
            SeedOutcome::AlreadyPresent
        );
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    }
}
