//! Query Suggestions Module
//!
//! This module derives tuning suggestions from two independent sources: the
//! raw SQL text (missing WHERE / LIMIT, joins without ON) and the engine's
//! plan text (full scans, nested loop joins, missing indexes). The two lists
//! are merged into one deduplicated set.

mod analyzer;

pub use analyzer::*;
