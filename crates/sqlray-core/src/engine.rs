//! SQL engine and driver traits

use crate::{QueryResult, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Target used to open an engine connection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionTarget {
    /// Transient in-memory database
    #[default]
    Memory,
    /// Database file on disk
    File(PathBuf),
}

impl ConnectionTarget {
    /// The string form accepted for in-memory databases
    pub const MEMORY: &'static str = ":memory:";

    /// Parses a target from its string form. Empty or `:memory:` is in-memory.
    pub fn parse(target: &str) -> Self {
        let trimmed = target.trim();
        if trimmed.is_empty() || trimmed == Self::MEMORY {
            Self::Memory
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }

    /// Check if this is an in-memory target
    pub fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl std::fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => f.write_str(Self::MEMORY),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl From<&str> for ConnectionTarget {
    fn from(target: &str) -> Self {
        Self::parse(target)
    }
}

/// An open connection to the SQL engine that executes queries and explains plans.
///
/// Implementations hold exactly one underlying connection and release it
/// when dropped. At most one operation is in flight per engine.
pub trait SqlEngine {
    /// Get the driver name (e.g., "duckdb")
    fn driver_name(&self) -> &str;

    /// Execute a statement that does not return rows (DDL, INSERT, ...).
    ///
    /// Returns the number of affected rows. A statement that references a
    /// missing table fails with `SqlrayError::CatalogNotFound`.
    fn execute(&self, sql: &str) -> Result<u64>;

    /// Execute a query and fetch all of its rows.
    ///
    /// A query that references a missing table fails with
    /// `SqlrayError::CatalogNotFound`.
    fn query(&self, sql: &str) -> Result<QueryResult>;

    /// Returns the engine's textual execution plan for `sql`
    fn explain_plan_text(&self, sql: &str) -> Result<String>;
}

/// Opens `SqlEngine` connections
pub trait EngineDriver {
    /// Driver identifier (e.g., "duckdb")
    fn id(&self) -> &'static str;

    /// Opens a new connection to the given target
    fn connect(&self, target: &ConnectionTarget) -> Result<Box<dyn SqlEngine>>;
}
