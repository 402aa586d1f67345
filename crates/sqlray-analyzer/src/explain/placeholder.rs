//! Placeholder Tables - Plan generation for SQL over unknown tables
//!
//! Advisory queries often reference tables that do not exist in the engine
//! the plan is requested from. Table and column names are scraped from the
//! SQL text and empty stand-in tables (every column typed `TEXT`) are created
//! before the plan is requested.

use regex::Regex;
use sqlray_core::{Result, SqlEngine};
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Columns given to a placeholder table when none can be scraped from the query
pub const DEFAULT_PLACEHOLDER_COLUMNS: [&str; 2] = ["id", "value"];

static TABLE_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)FROM\s+([a-zA-Z_][a-zA-Z0-9_]*)").expect("valid regex")
});

static SELECT_LIST_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)SELECT\s+(.*?)\s+FROM").expect("valid regex"));

static ALIAS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)AS\s+(\w+)").expect("valid regex"));

static ORDER_BY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)ORDER BY\s+(.*?)(?:$|LIMIT|OFFSET|;)").expect("valid regex")
});

static NON_WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W").expect("valid regex"));

/// Returns the identifier following each `FROM`, in order of occurrence.
///
/// Only the first identifier after each `FROM` is taken and duplicates are
/// kept, so `FROM a JOIN b` yields just `a`.
pub fn extract_table_names(sql: &str) -> Vec<String> {
    TABLE_NAME_REGEX
        .captures_iter(sql)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Guesses column names from the select list and the ORDER BY clause.
///
/// A select item contributes its `AS` alias when it has one, otherwise its
/// last whitespace-separated token with non-word characters removed. A bare
/// `*` select list contributes nothing. ORDER BY items contribute their first
/// token. Falls back to `DEFAULT_PLACEHOLDER_COLUMNS` so the result is never
/// empty.
pub fn extract_columns(sql: &str) -> BTreeSet<String> {
    let mut columns = BTreeSet::new();

    if let Some(select_list) = SELECT_LIST_REGEX.captures(sql).and_then(|c| c.get(1)) {
        let select_list = select_list.as_str();
        if select_list.trim() != "*" {
            for item in select_list.split(',') {
                let name = match ALIAS_REGEX.captures(item).and_then(|c| c.get(1)) {
                    Some(alias) => alias.as_str().to_string(),
                    None => item
                        .split_whitespace()
                        .last()
                        .map(strip_non_word)
                        .unwrap_or_default(),
                };
                if !name.is_empty() {
                    columns.insert(name);
                }
            }
        }
    }

    if let Some(order_list) = ORDER_BY_REGEX.captures(sql).and_then(|c| c.get(1)) {
        for item in order_list.as_str().split(',') {
            if let Some(name) = item.split_whitespace().next().map(strip_non_word)
                && !name.is_empty()
            {
                columns.insert(name);
            }
        }
    }

    if columns.is_empty() {
        columns.extend(DEFAULT_PLACEHOLDER_COLUMNS.iter().map(|c| c.to_string()));
    }

    columns
}

fn strip_non_word(token: &str) -> String {
    NON_WORD_REGEX.replace_all(token, "").into_owned()
}

/// Builds the `CREATE TABLE` statement for a placeholder table
pub fn placeholder_table_ddl<'a>(
    table: &str,
    columns: impl IntoIterator<Item = &'a String>,
) -> String {
    let column_defs: Vec<String> = columns
        .into_iter()
        .map(|col| format!("{} TEXT", col))
        .collect();
    format!("CREATE TABLE {} ({})", table, column_defs.join(", "))
}

/// Returns the engine's plan text for `sql`, first creating a placeholder
/// table for every referenced table the engine does not know.
///
/// Each table is checked with `SELECT 1 FROM <table> LIMIT 1`; only a
/// catalog-not-found failure triggers placeholder creation; any other lookup
/// failure is returned.
pub fn explain_with_placeholders(engine: &dyn SqlEngine, sql: &str) -> Result<String> {
    for table in extract_table_names(sql) {
        match engine.query(&format!("SELECT 1 FROM {} LIMIT 1", table)) {
            Ok(_) => {}
            Err(e) if e.is_catalog_not_found() => {
                let columns = extract_columns(sql);
                let ddl = placeholder_table_ddl(&table, &columns);
                tracing::debug!(table = %table, ddl = %ddl, "creating placeholder table");
                engine.execute(&ddl)?;
            }
            Err(e) => return Err(e),
        }
    }

    engine.explain_plan_text(sql)
}
