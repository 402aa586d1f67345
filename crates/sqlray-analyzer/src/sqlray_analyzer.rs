//! sqlray Analyzer - Query text and execution plan heuristics
//!
//! This crate provides functionality for:
//! - Classifying execution-plan text (scan type, join strategies, issues)
//! - Deriving tuning suggestions from SQL text and plan text
//! - Synthesizing placeholder tables so plans can be produced for unknown tables
//! - Running a query end to end and reporting timing metrics

pub mod explain;
pub mod metrics;
pub mod suggestions;

#[cfg(test)]
mod test_helpers;

pub use explain::*;
pub use metrics::*;
pub use suggestions::*;
