//! Unit tests for DuckDB driver

use super::*;
use sqlray_core::{ConnectionTarget, EngineDriver, SqlEngine, SqlrayError, Value};

fn memory_engine() -> DuckDbEngine {
    DuckDbDriver::new()
        .open(&ConnectionTarget::Memory)
        .expect("in-memory database should open")
}

#[test]
fn test_duckdb_driver_id() {
    let driver = DuckDbDriver::new();
    assert_eq!(driver.id(), "duckdb");
}

#[test]
fn test_connect_returns_boxed_engine() {
    let engine = DuckDbDriver::new()
        .connect(&ConnectionTarget::Memory)
        .expect("connect");
    assert_eq!(engine.driver_name(), "duckdb");
}

#[test]
fn test_execute_and_query_roundtrip() {
    let engine = memory_engine();
    engine
        .execute("CREATE TABLE sales (region TEXT, amount INTEGER)")
        .unwrap();
    let inserted = engine
        .execute("INSERT INTO sales VALUES ('india', 10), ('usa', 20)")
        .unwrap();
    assert_eq!(inserted, 2);

    let result = engine
        .query("SELECT region, amount FROM sales ORDER BY amount")
        .unwrap();
    assert_eq!(result.columns, vec!["region", "amount"]);
    assert_eq!(result.row_count(), 2);
    assert_eq!(
        result.rows[0].get_by_name("region"),
        Some(&Value::String("india".to_string()))
    );
    assert_eq!(result.rows[1].get(1), Some(&Value::Int64(20)));
    assert!(result.execution_time_ms >= 0.0);
}

#[test]
fn test_null_values() {
    let engine = memory_engine();
    let result = engine.query("SELECT NULL::INTEGER AS missing").unwrap();
    assert_eq!(result.rows[0].get(0), Some(&Value::Null));
}

#[test]
fn test_missing_table_is_catalog_error() {
    let engine = memory_engine();
    let err = engine.query("SELECT * FROM nowhere").unwrap_err();
    assert!(err.is_catalog_not_found(), "unexpected error: {err}");
}

#[test]
fn test_existing_table_conflict_is_engine_error() {
    let engine = memory_engine();
    engine.execute("CREATE TABLE t (id INTEGER)").unwrap();

    let err = engine.execute("CREATE TABLE t (id INTEGER)").unwrap_err();
    assert!(!err.is_catalog_not_found(), "unexpected error: {err}");
    assert!(matches!(err, SqlrayError::Engine(_)), "unexpected error: {err}");
}

#[test]
fn test_syntax_error_is_engine_error() {
    let engine = memory_engine();
    let err = engine.query("SELEC 1").unwrap_err();
    assert!(matches!(err, SqlrayError::Engine(_)), "unexpected error: {err}");
}

#[test]
fn test_explain_plan_text_for_existing_table() {
    let engine = memory_engine();
    engine.execute("CREATE TABLE t (id INTEGER)").unwrap();
    let plan = engine.explain_plan_text("SELECT id FROM t").unwrap();
    assert!(!plan.trim().is_empty());
}

#[test]
fn test_explain_with_placeholders_creates_tables() {
    let engine = memory_engine();
    let plan = sqlray_analyzer::explain_with_placeholders(
        &engine,
        "SELECT region, amount FROM orders ORDER BY amount",
    )
    .unwrap();
    assert!(!plan.trim().is_empty());

    let columns = engine
        .query("SELECT * FROM orders LIMIT 0")
        .unwrap()
        .columns;
    assert_eq!(columns, vec!["amount", "region"]);
}

#[test]
fn test_run_explain_in_memory() {
    let plan = run_explain("SELECT id FROM customers", ":memory:").unwrap();
    assert!(!plan.trim().is_empty());
}

#[test]
fn test_run_query_with_metrics_success() {
    let metrics = run_query_with_metrics("SELECT 42 AS answer", ":memory:");
    assert!(metrics.is_success());
    assert_eq!(metrics.row_count, Some(1));
    assert_eq!(metrics.sample_output.len(), 1);
    assert_eq!(
        metrics.sample_output[0].get_by_name("answer"),
        Some(&Value::Int64(42))
    );
    assert!(metrics.execution_time_ms.is_some());
}

#[test]
fn test_run_query_with_metrics_caps_sample() {
    let metrics = run_query_with_metrics("SELECT * FROM range(10)", ":memory:");
    assert_eq!(metrics.row_count, Some(10));
    assert_eq!(metrics.sample_output.len(), 5);

    let limited = run_query_with_metrics_limited("SELECT * FROM range(10)", ":memory:", 2);
    assert_eq!(limited.sample_output.len(), 2);
}

#[test]
fn test_run_query_with_metrics_reports_error() {
    let metrics = run_query_with_metrics("SELECT * FROM missing_table", ":memory:");
    assert!(!metrics.is_success());
    assert_eq!(metrics.row_count, None);
    assert_eq!(metrics.execution_time_ms, None);
    assert!(metrics.sample_output.is_empty());
    assert!(metrics.error.unwrap().contains("missing_table"));
}

#[test]
fn test_file_database_persists_between_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("advisor.duckdb");
    let target = path.to_string_lossy().to_string();

    {
        let engine = DuckDbDriver::new()
            .open(&ConnectionTarget::parse(&target))
            .unwrap();
        engine.execute("CREATE TABLE kept (id INTEGER)").unwrap();
        engine.execute("INSERT INTO kept VALUES (1), (2), (3)").unwrap();
    }

    let metrics = run_query_with_metrics("SELECT id FROM kept", &target);
    assert!(metrics.is_success());
    assert_eq!(metrics.row_count, Some(3));
}

#[test]
fn test_unopenable_file_reports_connect_error() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir
        .path()
        .join("missing")
        .join("nested")
        .join("db.duckdb")
        .to_string_lossy()
        .to_string();

    let metrics = run_query_with_metrics("SELECT 1", &target);
    assert!(!metrics.is_success());
    assert!(metrics.row_count.is_none());
}
