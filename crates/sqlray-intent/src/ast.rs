//! SQL AST access through `sqlparser`
//!
//! `parse_sql` exposes the raw tree for callers that want it; `describe_sql`
//! adapts the tree into the `QueryDescription` shape the matcher consumes.

use crate::description::{Aggregation, QueryDescription};
use serde::Serialize;
use serde_json::json;
use sqlparser::ast::{
    BinaryOperator, Expr, FunctionArg, FunctionArgExpr, FunctionArguments, GroupByExpr, Query,
    Select, SelectItem, SetExpr, Statement, Value,
};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use sqlray_core::{Result, SqlrayError};

/// Function names treated as aggregations
const AGGREGATE_FUNCTIONS: &[&str] = &[
    "avg",
    "sum",
    "count",
    "min",
    "max",
    "median",
    "mode",
    "stddev",
    "stddev_pop",
    "stddev_samp",
    "variance",
    "var_pop",
    "var_samp",
];

/// Result of parsing SQL into a tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlParseOutcome {
    /// The first statement's AST as JSON
    Ast(serde_json::Value),
    /// The parser's error message
    Error { error: String },
}

impl SqlParseOutcome {
    /// Returns true if parsing succeeded
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ast(_))
    }

    /// The tree, if parsing succeeded
    pub fn ast(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Ast(tree) => Some(tree),
            Self::Error { .. } => None,
        }
    }

    /// The error message, if parsing failed
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Ast(_) => None,
            Self::Error { error } => Some(error),
        }
    }
}

/// Parses `sql` and returns the first statement's tree. Never fails: parse
/// errors are returned as `SqlParseOutcome::Error`.
pub fn parse_sql(sql: &str) -> SqlParseOutcome {
    let statement = match parse_first_statement(sql) {
        Ok(statement) => statement,
        Err(e) => return SqlParseOutcome::Error { error: e.to_string() },
    };

    match serde_json::to_value(&statement) {
        Ok(tree) => SqlParseOutcome::Ast(tree),
        Err(e) => SqlParseOutcome::Error {
            error: e.to_string(),
        },
    }
}

/// Builds a `QueryDescription` from the first statement of `sql`.
///
/// Aggregations are aggregate-function calls anywhere in the select list.
/// GROUP BY identifiers contribute their last name component. The WHERE
/// clause is split on top-level `AND` and each comparison becomes
/// `{"<op>": ["<left>", "<right>"]}` (string literals unquoted); any other
/// conjunct becomes `{"expr": "<text>"}`.
pub fn describe_sql(sql: &str) -> Result<QueryDescription> {
    match parse_first_statement(sql)? {
        Statement::Query(query) => describe_query(&query),
        other => Err(SqlrayError::Parse(format!(
            "Only SELECT queries can be described, got: {}",
            statement_kind(&other)
        ))),
    }
}

impl QueryDescription {
    /// Builds a description from SQL text, see `describe_sql`
    pub fn from_sql(sql: &str) -> Result<Self> {
        describe_sql(sql)
    }
}

fn parse_first_statement(sql: &str) -> Result<Statement> {
    let statements = Parser::parse_sql(&GenericDialect {}, sql)
        .map_err(|e| SqlrayError::Parse(e.to_string()))?;
    statements
        .into_iter()
        .next()
        .ok_or_else(|| SqlrayError::Parse("No SQL statement found".to_string()))
}

fn statement_kind(statement: &Statement) -> String {
    statement
        .to_string()
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_uppercase()
}

fn describe_query(query: &Query) -> Result<QueryDescription> {
    let select = leftmost_select(query.body.as_ref()).ok_or_else(|| {
        SqlrayError::Parse("Query has no SELECT to describe".to_string())
    })?;

    let mut description = describe_select(select);
    description.limit = query.limit.as_ref().map(|limit| limit.to_string());
    Ok(description)
}

fn leftmost_select(body: &SetExpr) -> Option<&Select> {
    match body {
        SetExpr::Select(select) => Some(&**select),
        SetExpr::Query(query) => leftmost_select(query.body.as_ref()),
        SetExpr::SetOperation { left, .. } => leftmost_select(left),
        _ => None,
    }
}

fn describe_select(select: &Select) -> QueryDescription {
    let mut description = QueryDescription::new();

    for item in &select.projection {
        match item {
            SelectItem::UnnamedExpr(expr) | SelectItem::ExprWithAlias { expr, .. } => {
                collect_aggregations(expr, &mut description.aggregations);
            }
            _ => {}
        }
    }

    if let GroupByExpr::Expressions(exprs, _) = &select.group_by {
        description.group_by = exprs.iter().map(column_name).collect();
    }

    if let Some(selection) = &select.selection {
        let mut conjuncts = Vec::new();
        split_conjuncts(selection, &mut conjuncts);
        description.filters = conjuncts.into_iter().map(predicate_json).collect();
    }

    description
}

fn collect_aggregations(expr: &Expr, out: &mut Vec<Aggregation>) {
    match expr {
        Expr::Function(func) => {
            let name = func.name.to_string();
            let short_name = name.rsplit('.').next().unwrap_or(&name).to_lowercase();

            let args: &[FunctionArg] = match &func.args {
                FunctionArguments::List(list) => list.args.as_slice(),
                _ => &[],
            };

            if AGGREGATE_FUNCTIONS.contains(&short_name.as_str()) {
                let argument = args
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                out.push(Aggregation::new(
                    short_name,
                    (!argument.is_empty()).then_some(argument),
                ));
            }

            for arg in args {
                if let FunctionArg::Unnamed(FunctionArgExpr::Expr(inner)) = arg {
                    collect_aggregations(inner, out);
                }
            }
        }
        Expr::BinaryOp { left, right, .. } => {
            collect_aggregations(left, out);
            collect_aggregations(right, out);
        }
        Expr::UnaryOp { expr, .. } | Expr::Nested(expr) | Expr::Cast { expr, .. } => {
            collect_aggregations(expr, out);
        }
        _ => {}
    }
}

fn column_name(expr: &Expr) -> String {
    match expr {
        Expr::Identifier(ident) => ident.value.clone(),
        Expr::CompoundIdentifier(parts) => parts
            .last()
            .map(|ident| ident.value.clone())
            .unwrap_or_default(),
        other => other.to_string(),
    }
}

fn split_conjuncts<'a>(expr: &'a Expr, out: &mut Vec<&'a Expr>) {
    match expr {
        Expr::BinaryOp {
            left,
            op: BinaryOperator::And,
            right,
        } => {
            split_conjuncts(left, out);
            split_conjuncts(right, out);
        }
        other => out.push(other),
    }
}

fn predicate_json(expr: &Expr) -> serde_json::Value {
    match expr {
        Expr::BinaryOp { left, op, right } => {
            let mut predicate = serde_json::Map::new();
            predicate.insert(
                op.to_string(),
                json!([operand_text(left), operand_text(right)]),
            );
            serde_json::Value::Object(predicate)
        }
        other => json!({ "expr": other.to_string() }),
    }
}

fn operand_text(expr: &Expr) -> String {
    match expr {
        Expr::Identifier(ident) => ident.value.clone(),
        Expr::Value(Value::SingleQuotedString(s)) | Expr::Value(Value::DoubleQuotedString(s)) => {
            s.clone()
        }
        other => other.to_string(),
    }
}
