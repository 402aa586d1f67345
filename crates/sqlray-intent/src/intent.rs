//! Intent Extraction - Keyword heuristics over a natural-language question
//!
//! The question is lowercased once and scanned for aggregation keywords,
//! `by <word>` / `per <word>` grouping phrases, a fixed vocabulary of filter
//! values and a `top <n>` limit. Nothing here fails: an unrecognized question
//! yields an empty `Intent`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlray_core::{AdvisorConfig, DEFAULT_KNOWN_FILTERS};
use std::sync::LazyLock;

/// Keywords that imply each canonical aggregation tag, in detection order
const AGGREGATION_KEYWORDS: [(&[&str], &str); 5] = [
    (&["average"], "avg"),
    (&["sum", "total"], "sum"),
    (&["count"], "count"),
    (&["max"], "max"),
    (&["min"], "min"),
];

static GROUPING_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["by", "per"]
        .iter()
        .map(|keyword| Regex::new(&format!(r"{} (\w+)", keyword)).expect("valid regex"))
        .collect()
});

static LIMIT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"top (\d+)").expect("valid regex"));

/// Structured form of the analytic goal in a question.
///
/// Every string member is lowercase. Deserialization goes through
/// `Intent::from_json`, so mixed-type input is accepted and non-strings are
/// dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value")]
pub struct Intent {
    /// Aggregation tags such as `sum` or `avg`
    pub aggregations: Vec<String>,
    /// Grouping keys
    pub group_by: Vec<String>,
    /// Recognized filter values
    pub filters: Vec<String>,
    /// Requested row limit, always positive
    pub limit: Option<u64>,
}

impl Intent {
    /// Creates an empty intent
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an aggregation tag unless it is already present
    pub fn with_aggregation(mut self, aggregation: impl AsRef<str>) -> Self {
        push_unique(&mut self.aggregations, aggregation.as_ref().to_lowercase());
        self
    }

    /// Adds a grouping key unless it is already present
    pub fn with_group_by(mut self, column: impl AsRef<str>) -> Self {
        push_unique(&mut self.group_by, column.as_ref().to_lowercase());
        self
    }

    /// Adds a filter value unless it is already present
    pub fn with_filter(mut self, filter: impl AsRef<str>) -> Self {
        push_unique(&mut self.filters, filter.as_ref().to_lowercase());
        self
    }

    /// Sets the row limit. Zero means no limit.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    /// Builds an intent from loosely typed JSON.
    ///
    /// Missing keys default to empty and non-string list members are dropped.
    /// Strings are lowercased and repeats collapse to their first occurrence.
    /// A `limit` that is not a positive integer is treated as absent.
    pub fn from_json(value: &serde_json::Value) -> Self {
        Self {
            aggregations: lowercase_strings(value.get("aggregations")),
            group_by: lowercase_strings(value.get("group_by")),
            filters: lowercase_strings(value.get("filters")),
            limit: value
                .get("limit")
                .and_then(serde_json::Value::as_u64)
                .filter(|n| *n > 0),
        }
    }

    /// Returns true if nothing was extracted
    pub fn is_empty(&self) -> bool {
        self.aggregations.is_empty()
            && self.group_by.is_empty()
            && self.filters.is_empty()
            && self.limit.is_none()
    }
}

impl From<serde_json::Value> for Intent {
    fn from(value: serde_json::Value) -> Self {
        Self::from_json(&value)
    }
}

fn lowercase_strings(value: Option<&serde_json::Value>) -> Vec<String> {
    value
        .and_then(serde_json::Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(serde_json::Value::as_str)
                .map(str::to_lowercase)
                .fold(Vec::new(), |mut unique, item| {
                    push_unique(&mut unique, item);
                    unique
                })
        })
        .unwrap_or_default()
}

fn push_unique(items: &mut Vec<String>, item: String) {
    if !items.contains(&item) {
        items.push(item);
    }
}

/// Extracts intents using a configurable filter vocabulary
#[derive(Debug, Clone)]
pub struct IntentParser {
    known_filters: Vec<String>,
}

impl Default for IntentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentParser {
    /// Creates a parser with the default filter vocabulary
    pub fn new() -> Self {
        Self {
            known_filters: DEFAULT_KNOWN_FILTERS.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Creates a parser with the config's filter vocabulary
    pub fn from_config(config: &AdvisorConfig) -> Self {
        Self::new().with_known_filters(&config.known_filters)
    }

    /// Replaces the filter vocabulary. Entries are lowercased.
    pub fn with_known_filters<I, S>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.known_filters = filters
            .into_iter()
            .map(|f| f.as_ref().to_lowercase())
            .filter(|f| !f.is_empty())
            .collect();
        self
    }

    /// The filter vocabulary, in match order
    pub fn known_filters(&self) -> &[String] {
        &self.known_filters
    }

    /// Extracts an intent from a question.
    ///
    /// Each aggregation tag is added at most once. `by` and `per` each add
    /// the word after their first occurrence, so both can contribute.
    /// Matching is by substring: "summary" implies `sum`, "nearby x" groups
    /// by `x`.
    pub fn parse(&self, question: &str) -> Intent {
        let question = question.to_lowercase();
        let mut intent = Intent::new();

        for (keywords, tag) in AGGREGATION_KEYWORDS {
            if keywords.iter().any(|k| question.contains(k)) {
                intent.aggregations.push(tag.to_string());
            }
        }

        for regex in GROUPING_REGEXES.iter() {
            if let Some(word) = regex.captures(&question).and_then(|c| c.get(1)) {
                push_unique(&mut intent.group_by, word.as_str().to_string());
            }
        }

        for filter in &self.known_filters {
            if question.contains(filter.as_str()) {
                push_unique(&mut intent.filters, filter.clone());
            }
        }

        intent.limit = LIMIT_REGEX
            .captures(&question)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .filter(|n| *n > 0);

        tracing::trace!(?intent, "parsed question intent");
        intent
    }
}

/// Extracts an intent using the default filter vocabulary
pub fn parse_intent(question: &str) -> Intent {
    IntentParser::new().parse(question)
}
