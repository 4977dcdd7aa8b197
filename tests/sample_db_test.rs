//! Tests for the demo database and queries against it.

use serde_json::json;
use sql_tool_server::db::sample::{SeedOutcome, seed_sample_database};
use sql_tool_server::default_registry;

#[tokio::test]
async fn test_sample_database_through_commands() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.db");
    assert_eq!(
        seed_sample_database(&path).await.unwrap(),
        SeedOutcome::Created
    );

    let registry = default_registry().unwrap();
    let target = path.to_str().unwrap();

    let tables = registry
        .dispatch(
            "list_tables",
            json!({ "connection_string": target }).as_object().unwrap(),
        )
        .await
        .unwrap();
    let tables = serde_json::to_value(tables).unwrap();
    assert_eq!(tables["tables"], json!(["departments", "employees"]));

    let engineers = registry
        .dispatch(
            "execute_statement",
            json!({
                "connection_string": target,
                "query": "SELECT name, salary FROM employees WHERE department = 'Engineering' ORDER BY salary DESC",
            })
            .as_object()
            .unwrap(),
        )
        .await
        .unwrap();
    let engineers = serde_json::to_value(engineers).unwrap();
    assert_eq!(
        engineers["data"],
        json!([
            { "name": "Bob Johnson", "salary": 95000.0 },
            { "name": "Charlie Davis", "salary": 90000.0 },
            { "name": "John Doe", "salary": 85000.0 },
        ])
    );

    let count = registry
        .dispatch(
            "get_table_row_count",
            json!({ "connection_string": target, "table_name": "departments" })
                .as_object()
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(serde_json::to_value(count).unwrap()["row_count"], 4);
}

#[tokio::test]
async fn test_sample_database_is_not_reseeded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.db");

    seed_sample_database(&path).await.unwrap();
    let registry = default_registry().unwrap();
    let target = path.to_str().unwrap();
    registry
        .dispatch(
            "execute_statement",
            json!({ "connection_string": target, "query": "DELETE FROM employees WHERE id > 2" })
                .as_object()
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        seed_sample_database(&path).await.unwrap(),
        SeedOutcome::AlreadyPresent
    );

    let count = registry
        .dispatch(
            "get_table_row_count",
            json!({ "connection_string": target, "table_name": "employees" })
                .as_object()
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(serde_json::to_value(count).unwrap()["row_count"], 2);
}
