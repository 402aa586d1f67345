//! Query Description - The aggregation/group/filter/limit shape of a query
//!
//! Descriptions arrive as loose JSON from outside callers or are built from
//! SQL by `crate::ast::describe_sql`. Filters are opaque: the matcher only
//! ever looks at their serialized text.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// One aggregation function applied to an argument, such as `sum(revenue)`.
///
/// Serializes as the single-key mapping `{"sum": "revenue"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    /// Function name as written
    pub function: String,
    /// Argument text, if any
    pub argument: Option<String>,
}

impl Aggregation {
    /// Creates an aggregation
    pub fn new(function: impl Into<String>, argument: Option<String>) -> Self {
        Self {
            function: function.into(),
            argument,
        }
    }
}

impl Serialize for Aggregation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.function, &self.argument)?;
        map.end()
    }
}

/// Structured description of a candidate query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value")]
pub struct QueryDescription {
    /// Aggregations in select-list order
    pub aggregations: Vec<Aggregation>,
    /// GROUP BY columns in clause order
    pub group_by: Vec<String>,
    /// Predicates, opaque beyond their serialized text
    pub filters: Vec<serde_json::Value>,
    /// LIMIT expression text, present iff the query has a LIMIT
    pub limit: Option<String>,
}

impl QueryDescription {
    /// Creates an empty description
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an aggregation
    pub fn with_aggregation(
        mut self,
        function: impl Into<String>,
        argument: impl Into<String>,
    ) -> Self {
        self.aggregations
            .push(Aggregation::new(function, Some(argument.into())));
        self
    }

    /// Adds a GROUP BY column
    pub fn with_group_by(mut self, column: impl Into<String>) -> Self {
        self.group_by.push(column.into());
        self
    }

    /// Adds a predicate
    pub fn with_filter(mut self, filter: serde_json::Value) -> Self {
        self.filters.push(filter);
        self
    }

    /// Sets the LIMIT expression
    pub fn with_limit(mut self, limit: impl ToString) -> Self {
        self.limit = Some(limit.to_string());
        self
    }

    /// Builds a description from loosely typed JSON.
    ///
    /// Missing keys default to empty. Every key of every object in
    /// `aggregations` becomes one `Aggregation`; non-object entries are
    /// dropped. Non-string `group_by` entries are dropped. A `filters` value
    /// that is not an array is kept as a single predicate. `limit` is present
    /// iff the key holds a non-null value.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let aggregations = value
            .get("aggregations")
            .and_then(serde_json::Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(serde_json::Value::as_object)
                    .flat_map(|mapping| {
                        mapping
                            .iter()
                            .map(|(function, argument)| {
                                Aggregation::new(function.clone(), value_text(argument))
                            })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let group_by = value
            .get("group_by")
            .and_then(serde_json::Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(serde_json::Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let filters = match value.get("filters") {
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(serde_json::Value::Array(items)) => items.clone(),
            Some(other) => vec![other.clone()],
        };

        Self {
            aggregations,
            group_by,
            filters,
            limit: value.get("limit").and_then(value_text),
        }
    }

    /// Lowercased serialized text of the filters
    pub fn filters_text(&self) -> String {
        serde_json::Value::Array(self.filters.clone())
            .to_string()
            .to_lowercase()
    }

    /// Returns true if the query has a LIMIT
    pub fn has_limit(&self) -> bool {
        self.limit.is_some()
    }
}

impl From<serde_json::Value> for QueryDescription {
    fn from(value: serde_json::Value) -> Self {
        Self::from_json(&value)
    }
}

fn value_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests;
