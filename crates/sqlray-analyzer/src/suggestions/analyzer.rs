//! Suggestion Aggregator - Text heuristics over SQL and plan output
//!
//! Every check is a case-insensitive substring test. The checks are
//! independent and additive: any subset of them may fire for one input.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Severity level for suggestions, ordered from most to least severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityLevel {
    /// Issue that should be addressed before the query ships
    Critical,
    /// Issue that may impact performance
    Warning,
    /// Informational suggestion for optimization
    Info,
}

impl SeverityLevel {
    /// Returns true if this is a critical issue
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Critical)
    }
}

/// Where a suggestion was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    /// The SQL text
    Query,
    /// The execution plan text
    Plan,
}

/// Type of tuning suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
    /// The query has no WHERE clause
    MissingWhereClause,
    /// The query has no LIMIT clause
    MissingLimit,
    /// The query joins without an ON condition
    MissingJoinCondition,
    /// The plan scans whole tables
    FullTableScan,
    /// The plan uses a nested loop join
    NestedLoopJoin,
    /// The plan reports no usable index
    MissingIndex,
}

impl SuggestionType {
    /// The advisory text shown to the user
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingWhereClause => "Consider adding a WHERE clause to reduce scanned rows.",
            Self::MissingLimit => "Add a LIMIT clause to speed up dashboard queries.",
            Self::MissingJoinCondition => "Check JOIN conditions: missing ON clause detected.",
            Self::FullTableScan => "Avoid full table scans: use WHERE clause or indexes.",
            Self::NestedLoopJoin => "Replace nested loop join with hash or merge join if possible.",
            Self::MissingIndex => "Consider creating indexes on frequently filtered columns.",
        }
    }

    /// How urgent the suggestion is
    pub fn severity(&self) -> SeverityLevel {
        match self {
            Self::MissingJoinCondition => SeverityLevel::Critical,
            Self::MissingWhereClause | Self::FullTableScan | Self::NestedLoopJoin => {
                SeverityLevel::Warning
            }
            Self::MissingLimit | Self::MissingIndex => SeverityLevel::Info,
        }
    }

    /// Which input the suggestion is derived from
    pub fn source(&self) -> SuggestionSource {
        match self {
            Self::MissingWhereClause | Self::MissingLimit | Self::MissingJoinCondition => {
                SuggestionSource::Query
            }
            Self::FullTableScan | Self::NestedLoopJoin | Self::MissingIndex => {
                SuggestionSource::Plan
            }
        }
    }
}

impl std::fmt::Display for SuggestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Checks the SQL text. Order: WHERE, LIMIT, JOIN.
///
/// The JOIN check looks for the substring `on` anywhere in the query, so an
/// identifier such as `region` satisfies it.
pub fn query_suggestion_types(sql: &str) -> Vec<SuggestionType> {
    let query = sql.to_lowercase();
    let mut found = Vec::new();

    if !query.contains("where") {
        found.push(SuggestionType::MissingWhereClause);
    }

    if !query.contains("limit") {
        found.push(SuggestionType::MissingLimit);
    }

    if query.contains("join") && !query.contains("on") {
        found.push(SuggestionType::MissingJoinCondition);
    }

    found
}

/// Checks the plan text. Order: scan, join, index.
pub fn plan_suggestion_types(plan: &str) -> Vec<SuggestionType> {
    let plan = plan.to_lowercase();
    let mut found = Vec::new();

    if plan.contains("seq scan") || plan.contains("table scan") {
        found.push(SuggestionType::FullTableScan);
    }

    if plan.contains("nested loop join") {
        found.push(SuggestionType::NestedLoopJoin);
    }

    if plan.contains("no index") {
        found.push(SuggestionType::MissingIndex);
    }

    found
}

/// Suggestions derived from the SQL text
pub fn suggest_from_query(sql: &str) -> Vec<String> {
    query_suggestion_types(sql)
        .iter()
        .map(|t| t.message().to_string())
        .collect()
}

/// Suggestions derived from the plan text
pub fn suggest_from_plan(plan: &str) -> Vec<String> {
    plan_suggestion_types(plan)
        .iter()
        .map(|t| t.message().to_string())
        .collect()
}

/// Union of the query and plan suggestions with exact duplicates removed.
///
/// Compare the result as a set; iteration yields query suggestions first.
pub fn suggest(sql: &str, plan: &str) -> IndexSet<String> {
    suggest_from_query(sql)
        .into_iter()
        .chain(suggest_from_plan(plan))
        .collect()
}
