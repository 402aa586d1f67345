//! In-memory `SqlEngine` used by the analyzer tests

use crate::explain::extract_table_names;
use sqlray_core::{QueryResult, Result, Row, SqlEngine, SqlrayError, Value};
use std::cell::RefCell;
use std::collections::BTreeSet;

/// Scripted engine: knows a set of tables, records every statement, and
/// answers EXPLAIN with a fixed plan text.
pub(crate) struct FakeEngine {
    tables: RefCell<BTreeSet<String>>,
    statements: RefCell<Vec<String>>,
    plan: String,
    rows: Vec<Row>,
    execution_time_ms: f64,
    failure: Option<String>,
}

impl FakeEngine {
    pub(crate) fn new() -> Self {
        Self {
            tables: RefCell::new(BTreeSet::new()),
            statements: RefCell::new(Vec::new()),
            plan: "Seq Scan on placeholder".to_string(),
            rows: Vec::new(),
            execution_time_ms: 0.0,
            failure: None,
        }
    }

    pub(crate) fn with_table(self, table: &str) -> Self {
        self.tables.borrow_mut().insert(table.to_lowercase());
        self
    }

    pub(crate) fn with_plan(mut self, plan: &str) -> Self {
        self.plan = plan.to_string();
        self
    }

    pub(crate) fn with_int_rows(mut self, count: i64) -> Self {
        self.rows = (0..count)
            .map(|i| Row::new(vec!["n".to_string()], vec![Value::Int64(i)]))
            .collect();
        self
    }

    pub(crate) fn with_execution_time(mut self, ms: f64) -> Self {
        self.execution_time_ms = ms;
        self
    }

    pub(crate) fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub(crate) fn statements(&self) -> Vec<String> {
        self.statements.borrow().clone()
    }

    pub(crate) fn has_table(&self, table: &str) -> bool {
        self.tables.borrow().contains(&table.to_lowercase())
    }

    fn check_tables(&self, sql: &str) -> Result<()> {
        for table in extract_table_names(sql) {
            if !self.has_table(&table) {
                return Err(SqlrayError::CatalogNotFound(format!(
                    "Table with name {} does not exist!",
                    table
                )));
            }
        }
        Ok(())
    }
}

impl SqlEngine for FakeEngine {
    fn driver_name(&self) -> &str {
        "fake"
    }

    fn execute(&self, sql: &str) -> Result<u64> {
        self.statements.borrow_mut().push(sql.to_string());
        if let Some(rest) = sql.strip_prefix("CREATE TABLE ") {
            let name = rest.split_whitespace().next().unwrap_or_default();
            self.tables.borrow_mut().insert(name.to_lowercase());
        }
        Ok(0)
    }

    fn query(&self, sql: &str) -> Result<QueryResult> {
        self.statements.borrow_mut().push(sql.to_string());
        if let Some(message) = &self.failure {
            return Err(SqlrayError::Engine(message.clone()));
        }
        self.check_tables(sql)?;
        Ok(QueryResult {
            columns: vec!["n".to_string()],
            rows: self.rows.clone(),
            execution_time_ms: self.execution_time_ms,
        })
    }

    fn explain_plan_text(&self, sql: &str) -> Result<String> {
        self.check_tables(sql)?;
        Ok(self.plan.clone())
    }
}
