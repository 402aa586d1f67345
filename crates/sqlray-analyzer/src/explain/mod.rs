//! Execution Plan Module
//!
//! This module turns SQL text into an execution plan and classifies it:
//! - `placeholder` scrapes table and column names out of SQL text and creates
//!   stand-in tables so the engine can plan queries over unknown tables
//! - `plan` classifies the engine's plan text into a `PlanAnalysis`
//!
//! # Example
//!
//! ```
//! use sqlray_analyzer::explain::{analyze_plan, JoinKind, PlanIssue};
//!
//! let analysis = analyze_plan("Seq Scan on orders\n  -> Nested Loop Join");
//! assert!(analysis.full_table_scan);
//! assert!(analysis.joins.contains(&JoinKind::NestedLoop));
//! assert_eq!(analysis.issues, vec![PlanIssue::FullTableScan, PlanIssue::NestedLoopJoin]);
//! ```

pub mod placeholder;
pub mod plan;

pub use placeholder::{
    DEFAULT_PLACEHOLDER_COLUMNS, explain_with_placeholders, extract_columns, extract_table_names,
    placeholder_table_ddl,
};
pub use plan::{JoinKind, PlanAnalysis, PlanIssue, analyze_plan};
