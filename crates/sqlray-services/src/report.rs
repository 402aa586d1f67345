//! Advisory report returned by the `Advisor`

use indexmap::IndexSet;
use serde::Serialize;
use sqlray_analyzer::{PlanAnalysis, QueryMetrics, SeverityLevel, SuggestionSource, SuggestionType};
use sqlray_intent::{Intent, MatchResult, QueryDescription};

use crate::error::{ServiceError, ServiceResult};

/// A typed heuristic finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub kind: SuggestionType,
    pub severity: SeverityLevel,
    pub source: SuggestionSource,
    pub message: &'static str,
}

impl From<SuggestionType> for Finding {
    fn from(kind: SuggestionType) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            source: kind.source(),
            message: kind.message(),
        }
    }
}

/// Everything the advisor learned about one question/query pair.
///
/// A stage that fails leaves its field empty and adds a message to
/// `errors`; the remaining stages still run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvisoryReport {
    pub question: String,
    pub sql: String,
    pub intent: Intent,
    /// Structured description of the SQL, if it could be parsed
    pub query: Option<QueryDescription>,
    pub matches: Option<MatchResult>,
    /// Plan analysis, if the engine produced a plan
    pub plan: Option<PlanAnalysis>,
    /// Heuristic findings, most severe first
    pub findings: Vec<Finding>,
    /// Match suggestions followed by query and plan suggestions, without duplicates
    pub suggestions: IndexSet<String>,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<QueryMetrics>,
}

impl AdvisoryReport {
    /// Returns true if no stage failed
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns true if the query delivers the intent and no heuristic fired
    pub fn is_clean(&self) -> bool {
        self.is_complete() && self.suggestions.is_empty()
    }

    /// Findings at critical severity
    pub fn critical_findings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity.is_critical())
    }

    /// Renders the report as pretty-printed JSON
    pub fn to_json(&self) -> ServiceResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ServiceError::SerializationFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finding_from_suggestion_type() {
        let finding = Finding::from(SuggestionType::MissingJoinCondition);

        assert_eq!(finding.kind, SuggestionType::MissingJoinCondition);
        assert!(finding.severity.is_critical());
        assert_eq!(finding.source, SuggestionSource::Query);
        assert_eq!(finding.message, SuggestionType::MissingJoinCondition.message());
    }

    #[test]
    fn test_empty_report_is_clean() {
        let report = AdvisoryReport {
            question: String::new(),
            sql: String::new(),
            intent: Intent::default(),
            query: None,
            matches: None,
            plan: None,
            findings: Vec::new(),
            suggestions: IndexSet::new(),
            errors: Vec::new(),
            metrics: None,
        };

        assert!(report.is_complete());
        assert!(report.is_clean());
        assert_eq!(report.critical_findings().count(), 0);

        let json = report.to_json().unwrap();
        assert!(json.contains("\"suggestions\": []"));
        assert!(!json.contains("metrics"));
    }
}
