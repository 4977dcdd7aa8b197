//! Catalog introspection and table lifecycle statements.
//!
//! Functions that name a table in statement text take an [`Identifier`];
//! lookups by name go through bound parameters instead.

use crate::db::identifier::Identifier;
use crate::error::DbResult;
use crate::models::ColumnDescriptor;
use sqlx::Row;
use sqlx::sqlite::SqliteConnection;
use tracing::debug;

// =============================================================================
// SQL Queries
// =============================================================================

mod queries {
    pub const LIST_TABLES: &str = r#"
        SELECT name FROM sqlite_master
        WHERE type = 'table'
        AND name NOT LIKE 'sqlite_%'
        ORDER BY name
        "#;

    pub const TABLE_EXISTS: &str = r#"
        SELECT COUNT(*) AS found FROM sqlite_master
        WHERE type = 'table'
        AND name = ? COLLATE NOCASE
        "#;
}

/// List user tables, excluding SQLite's internal `sqlite_%` tables.
pub async fn list_tables(conn: &mut SqliteConnection) -> DbResult<Vec<String>> {
    let rows = sqlx::query(queries::LIST_TABLES)
        .fetch_all(&mut *conn)
        .await?;

    let tables = rows
        .iter()
        .map(|row| row.try_get::<String, _>("name"))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = tables.len(), "Listed SQLite tables");
    Ok(tables)
}

/// Check whether a table exists.
pub async fn table_exists(conn: &mut SqliteConnection, table: &Identifier) -> DbResult<bool> {
    let found: i64 = sqlx::query(queries::TABLE_EXISTS)
        .bind(table.as_str())
        .fetch_one(&mut *conn)
        .await?
        .try_get("found")?;
    Ok(found > 0)
}

/// Column metadata for a table. Empty when the table does not exist.
pub async fn describe_columns(
    conn: &mut SqliteConnection,
    table: &Identifier,
) -> DbResult<Vec<ColumnDescriptor>> {
    let sql = format!("PRAGMA table_info({})", table.quoted());
    let rows = sqlx::query(&sql).fetch_all(&mut *conn).await?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in &rows {
        let notnull: i64 = row.try_get("notnull")?;
        let pk: i64 = row.try_get("pk")?;
        columns.push(ColumnDescriptor {
            cid: row.try_get("cid")?,
            name: row.try_get("name")?,
            data_type: row.try_get("type")?,
            notnull: notnull != 0,
            default_value: row.try_get("dflt_value")?,
            pk: u32::try_from(pk).unwrap_or(0),
        });
    }

    debug!(table = %table, count = columns.len(), "Fetched SQLite columns");
    Ok(columns)
}

/// Drop a table. The caller is responsible for checking it exists.
pub async fn drop_table(conn: &mut SqliteConnection, table: &Identifier) -> DbResult<()> {
    let sql = format!("DROP TABLE {}", table.quoted());
    sqlx::query(&sql).execute(&mut *conn).await?;
    debug!(table = %table, "Dropped table");
    Ok(())
}

/// Count the rows of a table.
pub async fn count_rows(conn: &mut SqliteConnection, table: &Identifier) -> DbResult<u64> {
    let sql = format!("SELECT COUNT(*) AS row_count FROM {}", table.quoted());
    let count: i64 = sqlx::query(&sql)
        .fetch_one(&mut *conn)
        .await?
        .try_get("row_count")?;
    Ok(count.max(0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::identifier::validate_identifier;
    use sqlx::Connection;

    async fn memory_db() -> SqliteConnection {
        let mut conn = SqliteConnection::connect("sqlite::memory:").await.unwrap();
        sqlx::query(
            "CREATE TABLE staff (id INTEGER PRIMARY KEY, name TEXT NOT NULL, dept TEXT DEFAULT 'ops')",
        )
        .execute(&mut conn)
        .await
        .unwrap();
        conn
    }

    #[tokio::test]
    async fn test_list_tables_excludes_internal() {
        let mut conn = memory_db().await;
        sqlx::query("CREATE TABLE counter (id INTEGER PRIMARY KEY AUTOINCREMENT)")
            .execute(&mut conn)
            .await
            .unwrap();
        sqlx::query("INSERT INTO counter DEFAULT VALUES")
            .execute(&mut conn)
            .await
            .unwrap();
        let tables = list_tables(&mut conn).await.unwrap();
        assert_eq!(tables, vec!["counter", "staff"]);
    }

    #[tokio::test]
    async fn test_table_exists_is_case_insensitive() {
        let mut conn = memory_db().await;
        let staff = validate_identifier("STAFF").unwrap();
        let ghost = validate_identifier("ghost").unwrap();
        assert!(table_exists(&mut conn, &staff).await.unwrap());
        assert!(!table_exists(&mut conn, &ghost).await.unwrap());
    }

    #[tokio::test]
    async fn test_describe_columns() {
        let mut conn = memory_db().await;
        let staff = validate_identifier("staff").unwrap();
        let columns = describe_columns(&mut conn, &staff).await.unwrap();
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].name, "id");
        assert_eq!(columns[0].pk, 1);
        assert!(!columns[0].notnull);
        assert_eq!(columns[1].name, "name");
        assert!(columns[1].notnull);
        assert_eq!(columns[1].pk, 0);
        assert_eq!(columns[2].default_value.as_deref(), Some("'ops'"));
    }

    #[tokio::test]
    async fn test_describe_columns_composite_key() {
        let mut conn = SqliteConnection::connect("sqlite::memory:").await.unwrap();
        sqlx::query("CREATE TABLE pairs (a TEXT, b TEXT, PRIMARY KEY (b, a))")
            .execute(&mut conn)
            .await
            .unwrap();
        let pairs = validate_identifier("pairs").unwrap();
        let columns = describe_columns(&mut conn, &pairs).await.unwrap();
        assert_eq!(columns[0].pk, 2);
        assert_eq!(columns[1].pk, 1);
    }

    #[tokio::test]
    async fn test_describe_missing_table_is_empty() {
        let mut conn = memory_db().await;
        let ghost = validate_identifier("ghost").unwrap();
        assert!(describe_columns(&mut conn, &ghost).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_count_and_drop() {
        let mut conn = memory_db().await;
        sqlx::query("INSERT INTO staff (name) VALUES ('a'), ('b')")
            .execute(&mut conn)
            .await
            .unwrap();
        let staff = validate_identifier("staff").unwrap();
        assert_eq!(count_rows(&mut conn, &staff).await.unwrap(), 2);

        drop_table(&mut conn, &staff).await.unwrap();
        assert!(!table_exists(&mut conn, &staff).await.unwrap());
        assert!(count_rows(&mut conn, &staff).await.is_err());
    }
}
