// Tool registry behaviour against the in-memory shop database

#[path = "../support/mod.rs"]
mod support;

use askdb_core::application::tooling::{RegistryLimits, SqlDatabase, ToolError, ToolRegistry};
use askdb_core::domain::ToolInvocation;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use support::ShopDatabase;

fn registry(customers: usize, max_rows: usize) -> (ToolRegistry, Arc<ShopDatabase>) {
    let database = Arc::new(ShopDatabase::with_customers(customers));
    let handle: Arc<dyn SqlDatabase> = database.clone();
    let registry = ToolRegistry::new(
        handle,
        RegistryLimits {
            max_rows,
            sample_rows: 3,
            table_cache_ttl: Duration::from_secs(30),
        },
    );
    (registry, database)
}

#[tokio::test]
async fn large_results_are_cut_at_the_row_ceiling() {
    let (registry, _) = registry(20, 5);

    let outcome = registry
        .execute(&ToolInvocation::RunQuery {
            sql: "SELECT id, name FROM customers".to_string(),
        })
        .await
        .expect("query runs");

    assert!(outcome.success);
    assert_eq!(outcome.payload["rows"].as_array().map(Vec::len), Some(5));
    assert_eq!(outcome.payload["truncated"], json!(true));
    assert!(outcome.notice.is_some());
}

#[tokio::test]
async fn small_results_carry_no_notice() {
    let (registry, _) = registry(3, 5);

    let outcome = registry
        .execute(&ToolInvocation::RunQuery {
            sql: "SELECT id FROM customers".to_string(),
        })
        .await
        .expect("query runs");

    assert_eq!(outcome.payload["rows"].as_array().map(Vec::len), Some(3));
    assert_eq!(outcome.payload["truncated"], json!(false));
    assert!(outcome.notice.is_none());
}

#[tokio::test]
async fn dates_are_normalised_in_results() {
    let (registry, _) = registry(1, 5);

    let rows = registry
        .run_query("SELECT created_at FROM customers")
        .await
        .expect("query runs");

    assert_eq!(rows.rows[0][2], json!("2024-03-15T08:05:09"));
}

#[tokio::test]
async fn writes_never_reach_the_database() {
    let (registry, database) = registry(7, 5);

    for sql in [
        "DELETE FROM customers",
        "update customers set name = 'x'",
        "DROP TABLE customers",
        "SELECT 1; DELETE FROM customers",
        "SELECT * FROM customers /*! INTO OUTFILE '/tmp/customers.csv' */",
        "SELECT 1 /*!; DELETE FROM customers */",
    ] {
        let error = registry.run_query(sql).await.expect_err("write refused");
        assert!(matches!(
            error,
            ToolError::Destructive { .. } | ToolError::NotReadOnly { .. }
        ));
    }
    assert!(database.executed().is_empty());
}

#[tokio::test]
async fn validation_reports_engine_errors() {
    let (registry, database) = registry(7, 5);

    let report = registry
        .validate_query("SELECT * FROM orders")
        .await
        .expect("validation runs");

    assert!(!report.valid);
    assert!(report.message.contains("doesn't exist"));
    assert!(database.executed().is_empty());
}

#[tokio::test]
async fn schema_of_unknown_table_is_not_found() {
    let (registry, _) = registry(7, 5);

    let error = registry
        .get_schema(&["orders".to_string()])
        .await
        .expect_err("unknown table");

    assert!(matches!(error, ToolError::TableNotFound(name) if name == "orders"));
}
