//! Plan Analysis - Classification of execution-plan text
//!
//! Engines print plans in very different shapes (PostgreSQL's
//! `Seq Scan on orders`, DuckDB's `SEQ_SCAN` boxes), so classification is a
//! set of case-insensitive text checks rather than a structural parse.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::LazyLock;

static FULL_SCAN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)seq_scan|scan on").expect("valid regex"));

static JOIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)nested loop join|hash join|merge join").expect("valid regex")
});

/// Join strategy named in a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum JoinKind {
    #[serde(rename = "Nested Loop Join")]
    NestedLoop,
    #[serde(rename = "Hash Join")]
    Hash,
    #[serde(rename = "Merge Join")]
    Merge,
}

impl JoinKind {
    /// Parses the plan phrase for a join strategy (case-insensitive)
    pub fn from_phrase(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "nested loop join" => Some(Self::NestedLoop),
            "hash join" => Some(Self::Hash),
            "merge join" => Some(Self::Merge),
            _ => None,
        }
    }

    /// The plan phrase for this join strategy
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NestedLoop => "Nested Loop Join",
            Self::Hash => "Hash Join",
            Self::Merge => "Merge Join",
        }
    }
}

impl std::fmt::Display for JoinKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A performance issue detected in a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanIssue {
    /// The plan reads a whole table
    FullTableScan,
    /// The plan uses a nested loop join
    NestedLoopJoin,
    /// The plan reports that no index is available
    NoIndex,
}

impl PlanIssue {
    /// Returns the issue tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullTableScan => "full_table_scan",
            Self::NestedLoopJoin => "nested_loop_join",
            Self::NoIndex => "no_index",
        }
    }
}

impl std::fmt::Display for PlanIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Findings extracted from one execution plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanAnalysis {
    /// True if the plan scans a table without an index
    pub full_table_scan: bool,
    /// Distinct join strategies named in the plan
    pub joins: BTreeSet<JoinKind>,
    /// Issues in detection order: scan, then join, then index
    pub issues: Vec<PlanIssue>,
    /// The plan text exactly as received
    pub raw_plan: String,
}

impl PlanAnalysis {
    /// Creates an analysis with no findings for the given plan text
    pub fn new(raw_plan: impl Into<String>) -> Self {
        Self {
            full_table_scan: false,
            joins: BTreeSet::new(),
            issues: Vec::new(),
            raw_plan: raw_plan.into(),
        }
    }

    /// Returns true if any issue was detected
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Returns true if the given issue was detected
    pub fn has_issue(&self, issue: PlanIssue) -> bool {
        self.issues.contains(&issue)
    }

    /// Issue tags as strings
    pub fn issue_tags(&self) -> Vec<&'static str> {
        self.issues.iter().map(PlanIssue::as_str).collect()
    }
}

/// Classifies plan text. Never fails: unrecognized text yields an empty analysis.
pub fn analyze_plan(plan: &str) -> PlanAnalysis {
    let mut analysis = PlanAnalysis::new(plan);

    if FULL_SCAN_REGEX.is_match(plan) {
        analysis.full_table_scan = true;
        analysis.issues.push(PlanIssue::FullTableScan);
    }

    analysis.joins = JOIN_REGEX
        .find_iter(plan)
        .filter_map(|m| JoinKind::from_phrase(m.as_str()))
        .collect();

    if analysis.joins.contains(&JoinKind::NestedLoop) {
        analysis.issues.push(PlanIssue::NestedLoopJoin);
    }

    if plan.to_lowercase().contains("no index") {
        analysis.issues.push(PlanIssue::NoIndex);
    }

    analysis
}
