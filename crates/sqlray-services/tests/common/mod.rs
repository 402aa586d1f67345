//! Common test utilities and mocks

use std::cell::RefCell;
use sqlray_core::{
    ConnectionTarget, EngineDriver, QueryResult, Result, Row, SqlEngine, SqlrayError, Value,
};

/// Initialize logging for tests if not already initialized
pub fn initialize_logging() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive("sqlray_services=debug".parse().unwrap())
                    .add_directive("sqlray_analyzer=debug".parse().unwrap()),
            )
            .with_test_writer()
            .finish();

        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

/// Mock engine for testing the advisor without a real database.
///
/// Table lookups (`SELECT 1 FROM <table> ...`) fail with a catalog error until
/// the table is created; every other query returns the configured rows.
pub struct MockEngine {
    pub plan: String,
    pub rows: Vec<Row>,
    pub explain_error: Option<String>,
    pub query_error: Option<String>,
    tables: RefCell<Vec<String>>,
    /// Log of all SQL executed, for assertion in tests
    statement_log: RefCell<Vec<String>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            plan: "Seq Scan on placeholder".to_string(),
            rows: Vec::new(),
            explain_error: None,
            query_error: None,
            tables: RefCell::new(Vec::new()),
            statement_log: RefCell::new(Vec::new()),
        }
    }

    pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
        self.plan = plan.into();
        self
    }

    pub fn with_table(self, table: &str) -> Self {
        self.tables.borrow_mut().push(table.to_string());
        self
    }

    pub fn with_int_rows(mut self, count: i64) -> Self {
        self.rows = (0..count)
            .map(|i| Row::new(vec!["n".to_string()], vec![Value::Int64(i)]))
            .collect();
        self
    }

    pub fn with_explain_error(mut self, message: impl Into<String>) -> Self {
        self.explain_error = Some(message.into());
        self
    }

    pub fn with_query_error(mut self, message: impl Into<String>) -> Self {
        self.query_error = Some(message.into());
        self
    }

    pub fn tables(&self) -> Vec<String> {
        self.tables.borrow().clone()
    }

    pub fn statement_log(&self) -> Vec<String> {
        self.statement_log.borrow().clone()
    }
}

impl SqlEngine for MockEngine {
    fn driver_name(&self) -> &str {
        "mock"
    }

    fn execute(&self, sql: &str) -> Result<u64> {
        self.statement_log.borrow_mut().push(sql.to_string());
        if let Some(name) = sql
            .strip_prefix("CREATE TABLE ")
            .and_then(|rest| rest.split_whitespace().next())
        {
            self.tables.borrow_mut().push(name.to_string());
        }
        Ok(0)
    }

    fn query(&self, sql: &str) -> Result<QueryResult> {
        self.statement_log.borrow_mut().push(sql.to_string());

        if let Some(table) = sql
            .strip_prefix("SELECT 1 FROM ")
            .and_then(|rest| rest.split_whitespace().next())
        {
            if self.tables.borrow().iter().any(|t| t == table) {
                return Ok(QueryResult::default());
            }
            return Err(SqlrayError::CatalogNotFound(format!(
                "Table with name {} does not exist!",
                table
            )));
        }

        if let Some(message) = &self.query_error {
            return Err(SqlrayError::Engine(message.clone()));
        }

        Ok(QueryResult {
            columns: vec!["n".to_string()],
            rows: self.rows.clone(),
            execution_time_ms: 0.0,
        })
    }

    fn explain_plan_text(&self, _sql: &str) -> Result<String> {
        match &self.explain_error {
            Some(message) => Err(SqlrayError::Engine(message.clone())),
            None => Ok(self.plan.clone()),
        }
    }
}

/// Driver whose connections always fail
pub struct UnreachableDriver;

impl EngineDriver for UnreachableDriver {
    fn id(&self) -> &'static str {
        "unreachable"
    }

    fn connect(&self, target: &ConnectionTarget) -> Result<Box<dyn SqlEngine>> {
        Err(SqlrayError::Engine(format!("cannot open {}", target)))
    }
}
