//! Intent Matching - Does a query deliver what the question asked for?
//!
//! Four independent checks (aggregation, grouping, filtering, limit), each
//! producing a flag and, on a mismatch the intent cares about, one advisory
//! string. Suggestions are emitted in that fixed check order.

use crate::description::QueryDescription;
use crate::intent::Intent;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Per-dimension match flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFlags {
    /// Intent and query share at least one aggregation function
    pub aggregation: bool,
    /// Every intent grouping key is grouped by the query
    pub group_by: bool,
    /// Every intent filter value appears in the query's filter text
    pub filter: bool,
    /// The query has a LIMIT
    pub limit: bool,
}

impl MatchFlags {
    /// Returns true if every dimension matched
    pub fn all(&self) -> bool {
        self.aggregation && self.group_by && self.filter && self.limit
    }
}

/// Outcome of comparing an intent with a query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matches: MatchFlags,
    /// Advisory strings in check order: aggregation, group_by, filter, limit
    pub suggestions: Vec<String>,
}

impl MatchResult {
    /// Returns true if there is nothing to suggest
    pub fn is_clean(&self) -> bool {
        self.suggestions.is_empty()
    }
}

/// Compares an intent against a query description.
///
/// - aggregation: the lowercased intent tags and query function names
///   intersect. An intent without aggregations never matches and never
///   produces a suggestion.
/// - group_by: the intent keys are a subset of the query's keys.
/// - filter: each intent value is a substring of the query's lowercased
///   filter text. The text covers the whole predicate, so a value that only
///   appears as a column name still counts.
/// - limit: the query has any LIMIT; its value is not compared with the
///   intent's.
pub fn compare(intent: &Intent, query: &QueryDescription) -> MatchResult {
    let mut result = MatchResult::default();

    let intent_aggregations = lowercase_set(&intent.aggregations);
    let intent_group_by = lowercase_set(&intent.group_by);
    let intent_filters = lowercase_set(&intent.filters);

    let query_aggregations = lowercase_set(query.aggregations.iter().map(|a| &a.function));
    result.matches.aggregation = !intent_aggregations.is_disjoint(&query_aggregations);
    if !result.matches.aggregation && !intent_aggregations.is_empty() {
        result.suggestions.push(format!(
            "Consider using aggregation(s): {}",
            join(&intent_aggregations)
        ));
    }

    let query_group_by = lowercase_set(&query.group_by);
    result.matches.group_by = intent_group_by.is_subset(&query_group_by);
    if !result.matches.group_by && !intent_group_by.is_empty() {
        result
            .suggestions
            .push(format!("Consider grouping by: {}", join(&intent_group_by)));
    }

    let filters_text = query.filters_text();
    result.matches.filter = intent_filters
        .iter()
        .all(|f| filters_text.contains(f.as_str()));
    if !result.matches.filter && !intent_filters.is_empty() {
        result
            .suggestions
            .push(format!("Consider filtering on: {}", join(&intent_filters)));
    }

    result.matches.limit = query.has_limit();
    if !result.matches.limit
        && let Some(limit) = intent.limit.filter(|n| *n > 0)
    {
        result.suggestions.push(format!(
            "Consider adding LIMIT {} to restrict output",
            limit
        ));
    }

    tracing::trace!(matches = ?result.matches, "compared intent with query");
    result
}

fn lowercase_set<'a>(items: impl IntoIterator<Item = &'a String>) -> IndexSet<String> {
    items.into_iter().map(|s| s.to_lowercase()).collect()
}

fn join(items: &IndexSet<String>) -> String {
    items
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
