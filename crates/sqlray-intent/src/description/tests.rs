//! Tests for Query Description

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_from_json() {
    let description = QueryDescription::from_json(&json!({
        "select": ["product"],
        "aggregations": [{"sum": "revenue"}],
        "filters": [{"=": ["region", "India"]}],
        "group_by": ["product"],
        "limit": null
    }));

    assert_eq!(
        description.aggregations,
        vec![Aggregation::new("sum", Some("revenue".to_string()))]
    );
    assert_eq!(description.group_by, vec!["product"]);
    assert_eq!(description.filters.len(), 1);
    assert!(!description.has_limit());
}

#[test]
fn test_multi_key_mappings_contribute_every_key() {
    let description = QueryDescription::from_json(&json!({
        "aggregations": [{"sum": "revenue", "sort": "desc"}, "count", {"max": null}]
    }));

    let functions: Vec<&str> = description
        .aggregations
        .iter()
        .map(|a| a.function.as_str())
        .collect();
    assert_eq!(functions.len(), 3);
    assert!(functions.contains(&"sum"));
    assert!(functions.contains(&"sort"));
    assert!(functions.contains(&"max"));
}

#[test]
fn test_missing_keys_default_to_empty() {
    assert_eq!(QueryDescription::from_json(&json!({})), QueryDescription::new());
    assert_eq!(QueryDescription::from_json(&json!(null)), QueryDescription::new());
}

#[test]
fn test_non_string_group_by_entries_are_dropped() {
    let description = QueryDescription::from_json(&json!({"group_by": ["a", 1, null, "b"]}));
    assert_eq!(description.group_by, vec!["a", "b"]);
}

#[test]
fn test_limit_presence() {
    assert_eq!(
        QueryDescription::from_json(&json!({"limit": 10})).limit,
        Some("10".to_string())
    );
    assert_eq!(
        QueryDescription::from_json(&json!({"limit": "ALL"})).limit,
        Some("ALL".to_string())
    );
    assert_eq!(QueryDescription::from_json(&json!({"limit": 0})).limit, Some("0".to_string()));
}

#[test]
fn test_scalar_filters_are_wrapped() {
    let description = QueryDescription::from_json(&json!({"filters": "region = 'USA'"}));
    assert_eq!(description.filters_text(), "[\"region = 'usa'\"]");
}

#[test]
fn test_filters_text_is_lowercase() {
    let description = QueryDescription::new().with_filter(json!({"=": ["region", "India"]}));
    assert_eq!(description.filters_text(), r#"[{"=":["region","india"]}]"#);
}

#[test]
fn test_aggregation_serializes_as_single_key_mapping() {
    let description = QueryDescription::new()
        .with_aggregation("sum", "revenue")
        .with_group_by("product")
        .with_limit(5);

    assert_eq!(
        serde_json::to_value(&description).unwrap(),
        json!({
            "aggregations": [{"sum": "revenue"}],
            "group_by": ["product"],
            "filters": [],
            "limit": "5"
        })
    );
}

#[test]
fn test_deserialize_is_permissive() {
    let description: QueryDescription =
        serde_json::from_str(r#"{"aggregations": [{"AVG": "price"}, 7], "group_by": [true]}"#)
            .unwrap();

    assert_eq!(description.aggregations.len(), 1);
    assert!(description.group_by.is_empty());
}
