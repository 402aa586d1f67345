//! sqlray Intent - What the user asked for versus what the query does
//!
//! This crate provides:
//! - `IntentParser` / `parse_intent` - keyword extraction from a question
//! - `QueryDescription` - the aggregation/group/filter/limit shape of a query,
//!   built from loose JSON or from SQL through `sqlparser`
//! - `compare` - per-dimension matching of an intent against a description
//! - `parse_sql` - the SQL AST as JSON, or an error value

pub mod ast;
pub mod description;
pub mod intent;
pub mod matcher;

pub use ast::{SqlParseOutcome, describe_sql, parse_sql};
pub use description::{Aggregation, QueryDescription};
pub use intent::{Intent, IntentParser, parse_intent};
pub use matcher::{MatchFlags, MatchResult, compare};
