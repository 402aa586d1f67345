//! DuckDB driver implementation

use sqlray_analyzer::{QueryMetrics, explain_with_placeholders, run_with_metrics_limited};
use sqlray_core::{
    ConnectionTarget, DEFAULT_SAMPLE_ROW_LIMIT, EngineDriver, QueryResult, Result, Row, SqlEngine,
    SqlrayError, Value,
};
use std::time::Instant;

/// DuckDB engine driver
pub struct DuckDbDriver;

impl DuckDbDriver {
    /// Create a new DuckDB driver instance
    pub fn new() -> Self {
        Self
    }

    /// Opens a concrete DuckDB engine
    #[tracing::instrument(skip(self), fields(database = %target))]
    pub fn open(&self, target: &ConnectionTarget) -> Result<DuckDbEngine> {
        tracing::debug!("connecting to DuckDB");

        let connection = match target {
            ConnectionTarget::Memory => duckdb::Connection::open_in_memory(),
            ConnectionTarget::File(path) => duckdb::Connection::open(path),
        }
        .map_err(|e| SqlrayError::Engine(format!("Failed to open DuckDB database: {}", e)))?;

        Ok(DuckDbEngine::new(connection, target.clone()))
    }
}

impl Default for DuckDbDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineDriver for DuckDbDriver {
    fn id(&self) -> &'static str {
        "duckdb"
    }

    fn connect(&self, target: &ConnectionTarget) -> Result<Box<dyn SqlEngine>> {
        Ok(Box::new(self.open(target)?))
    }
}

/// DuckDB connection implementing `SqlEngine`. The connection is closed
/// when the engine is dropped.
pub struct DuckDbEngine {
    connection: duckdb::Connection,
    target: ConnectionTarget,
}

impl DuckDbEngine {
    /// Wrap an open DuckDB connection
    pub fn new(connection: duckdb::Connection, target: ConnectionTarget) -> Self {
        Self { connection, target }
    }
}

impl SqlEngine for DuckDbEngine {
    fn driver_name(&self) -> &str {
        "duckdb"
    }

    fn execute(&self, sql: &str) -> Result<u64> {
        let start = Instant::now();

        let affected = self
            .connection
            .execute(sql, [])
            .map_err(|e| map_duckdb_error("Execute failed", e))?;

        tracing::debug!(
            affected_rows = affected,
            duration_ms = start.elapsed().as_millis() as u64,
            "execute completed"
        );

        Ok(affected as u64)
    }

    fn query(&self, sql: &str) -> Result<QueryResult> {
        let start = Instant::now();

        let mut stmt = self
            .connection
            .prepare(sql)
            .map_err(|e| map_duckdb_error("Prepare failed", e))?;

        // Execute query first, then get column info
        let mut duckdb_rows = stmt
            .query([])
            .map_err(|e| map_duckdb_error("Query failed", e))?;

        let column_names: Vec<String> = duckdb_rows
            .as_ref()
            .map(|r| r.column_names().iter().map(|s| s.to_string()).collect())
            .unwrap_or_default();
        let column_count = column_names.len();

        let mut rows = Vec::new();
        while let Some(row) = duckdb_rows
            .next()
            .map_err(|e| map_duckdb_error("Row fetch failed", e))?
        {
            let values = (0..column_count).map(|i| row_to_value(row, i)).collect();
            rows.push(Row::new(column_names.clone(), values));
        }

        let execution_time_ms = start.elapsed().as_secs_f64() * 1000.0;
        tracing::debug!(
            database = %self.target,
            row_count = rows.len(),
            duration_ms = execution_time_ms as u64,
            "query completed"
        );

        Ok(QueryResult {
            columns: column_names,
            rows,
            execution_time_ms,
        })
    }

    fn explain_plan_text(&self, sql: &str) -> Result<String> {
        let result = self.query(&format!("EXPLAIN {}", sql))?;

        // EXPLAIN yields (explain_key, explain_value) rows; the plan is the value column
        let lines: Vec<String> = result
            .rows
            .iter()
            .filter_map(|row| row.values.last())
            .map(|value| value.to_string())
            .collect();

        Ok(lines.join("\n"))
    }
}

fn map_duckdb_error(context: &str, error: duckdb::Error) -> SqlrayError {
    let message = error.to_string();
    if message.contains("Catalog Error") && message.contains("does not exist") {
        SqlrayError::CatalogNotFound(message)
    } else {
        SqlrayError::Engine(format!("{}: {}", context, message))
    }
}

fn row_to_value(row: &duckdb::Row, idx: usize) -> Value {
    // Try i64 first (most common integer type)
    if let Ok(v) = row.get::<_, Option<i64>>(idx) {
        return v.map_or(Value::Null, Value::Int64);
    }
    if let Ok(v) = row.get::<_, Option<f64>>(idx) {
        return v.map_or(Value::Null, Value::Float64);
    }
    if let Ok(v) = row.get::<_, Option<String>>(idx) {
        return v.map_or(Value::Null, Value::String);
    }
    if let Ok(v) = row.get::<_, Option<bool>>(idx) {
        return v.map_or(Value::Null, Value::Bool);
    }
    if let Ok(v) = row.get::<_, Option<Vec<u8>>>(idx) {
        return v.map_or(Value::Null, Value::Bytes);
    }
    Value::Null
}

impl std::fmt::Debug for DuckDbEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckDbEngine")
            .field("target", &self.target)
            .finish()
    }
}

/// Returns the plan text for `sql` against `target`, creating placeholder
/// tables for any table the database does not have. The connection is
/// released before returning.
pub fn run_explain(sql: &str, target: &str) -> Result<String> {
    let engine = DuckDbDriver::new().open(&ConnectionTarget::parse(target))?;
    explain_with_placeholders(&engine, sql)
}

/// Runs `sql` against `target` and reports metrics. Connection failures are
/// reported in `QueryMetrics::error` like query failures.
pub fn run_query_with_metrics(sql: &str, target: &str) -> QueryMetrics {
    run_query_with_metrics_limited(sql, target, DEFAULT_SAMPLE_ROW_LIMIT)
}

/// Like `run_query_with_metrics`, keeping at most `sample_rows` sample rows
pub fn run_query_with_metrics_limited(sql: &str, target: &str, sample_rows: usize) -> QueryMetrics {
    match DuckDbDriver::new().open(&ConnectionTarget::parse(target)) {
        Ok(engine) => run_with_metrics_limited(&engine, sql, sample_rows),
        Err(e) => QueryMetrics::failed(e.to_string()),
    }
}
