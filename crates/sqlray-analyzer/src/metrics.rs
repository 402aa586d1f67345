//! Query Metrics - End-to-end execution with timing
//!
//! Runs a query once and reports wall-clock time, row count and a small
//! sample of the rows. Engine failures never escape: they are reported in
//! the `error` field.

use serde::{Deserialize, Serialize};
use sqlray_core::{DEFAULT_SAMPLE_ROW_LIMIT, Row, SqlEngine};

/// Outcome of running one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMetrics {
    /// Wall-clock time the engine spent executing and fetching, rounded to 0.01 ms
    pub execution_time_ms: Option<f64>,
    /// Number of fetched rows
    pub row_count: Option<usize>,
    /// First rows of the result
    pub sample_output: Vec<Row>,
    /// Engine error message when the query failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryMetrics {
    /// Metrics for a failed run
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            execution_time_ms: None,
            row_count: None,
            sample_output: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// Returns true if the query ran successfully
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Runs `sql` and reports metrics, keeping at most five sample rows
pub fn run_with_metrics(engine: &dyn SqlEngine, sql: &str) -> QueryMetrics {
    run_with_metrics_limited(engine, sql, DEFAULT_SAMPLE_ROW_LIMIT)
}

/// Runs `sql` and reports metrics, keeping at most `sample_rows` sample rows
pub fn run_with_metrics_limited(
    engine: &dyn SqlEngine,
    sql: &str,
    sample_rows: usize,
) -> QueryMetrics {
    match engine.query(sql) {
        Ok(result) => {
            let row_count = result.row_count();
            let mut sample_output = result.rows;
            sample_output.truncate(sample_rows);

            QueryMetrics {
                execution_time_ms: Some(round_ms(result.execution_time_ms)),
                row_count: Some(row_count),
                sample_output,
                error: None,
            }
        }
        Err(e) => {
            tracing::warn!(driver = engine.driver_name(), error = %e, "query failed while collecting metrics");
            QueryMetrics::failed(e.to_string())
        }
    }
}

fn round_ms(ms: f64) -> f64 {
    (ms * 100.0).round() / 100.0
}
