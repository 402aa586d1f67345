//! Advisory service
//!
//! Compares what a question asks for with what a SQL query does, then
//! inspects the engine's plan for the query. Each stage is independent:
//! a query the parser rejects still gets a plan, and a plan failure still
//! leaves the intent comparison in the report.

use indexmap::IndexSet;
use sqlray_analyzer::{
    analyze_plan, explain_with_placeholders, plan_suggestion_types, query_suggestion_types,
    run_with_metrics_limited, suggest,
};
use sqlray_core::{AdvisorConfig, EngineDriver, SqlEngine};
use sqlray_intent::{Intent, IntentParser, QueryDescription, compare};

use crate::error::{ServiceError, ServiceResult};
use crate::report::{AdvisoryReport, Finding};

/// Service producing `AdvisoryReport`s
///
/// The advisor holds no connection; callers pass the engine for each call,
/// or let `connect_and_advise` open one from the configured target.
#[derive(Debug, Clone)]
pub struct Advisor {
    config: AdvisorConfig,
    parser: IntentParser,
}

impl Advisor {
    /// Create an advisor from a configuration
    pub fn new(config: AdvisorConfig) -> Self {
        let parser = IntentParser::from_config(&config);
        Self { config, parser }
    }

    /// Create an advisor from the config file in the default location
    pub fn load() -> ServiceResult<Self> {
        let config = AdvisorConfig::load()
            .map_err(|e| ServiceError::ConfigurationFailed(e.to_string()))?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Extract the intent of a question with the configured filter vocabulary
    pub fn parse_question(&self, question: &str) -> Intent {
        self.parser.parse(question)
    }

    /// Analyze `sql` as an answer to `question`.
    ///
    /// Referenced tables the engine does not know are created as placeholder
    /// tables before the plan is requested.
    #[tracing::instrument(skip(self, engine, question, sql), fields(driver = engine.driver_name()))]
    pub fn advise(&self, engine: &dyn SqlEngine, question: &str, sql: &str) -> AdvisoryReport {
        let intent = self.parse_question(question);
        let mut errors = Vec::new();

        let query = match QueryDescription::from_sql(sql) {
            Ok(description) => Some(description),
            Err(e) => {
                tracing::debug!(error = %e, "query could not be described");
                errors.push(e.to_string());
                None
            }
        };
        let matches = query.as_ref().map(|description| compare(&intent, description));

        let (plan_text, plan) = match explain_with_placeholders(engine, sql) {
            Ok(text) => {
                let analysis = analyze_plan(&text);
                (text, Some(analysis))
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to explain query");
                errors.push(e.to_string());
                (String::new(), None)
            }
        };

        let mut suggestions: IndexSet<String> = matches
            .iter()
            .flat_map(|m| m.suggestions.iter().cloned())
            .collect();
        suggestions.extend(suggest(sql, &plan_text));

        let mut findings: Vec<Finding> = query_suggestion_types(sql)
            .into_iter()
            .chain(plan_suggestion_types(&plan_text))
            .map(Finding::from)
            .collect();
        findings.sort_by_key(|f| f.severity);

        tracing::debug!(
            suggestions = suggestions.len(),
            errors = errors.len(),
            "advisory completed"
        );

        AdvisoryReport {
            question: question.to_string(),
            sql: sql.to_string(),
            intent,
            query,
            matches,
            plan,
            findings,
            suggestions,
            errors,
            metrics: None,
        }
    }

    /// Like `advise`, and also runs the query and attaches its metrics.
    ///
    /// The query runs after the plan stage, so it sees any placeholder
    /// tables that stage created.
    pub fn advise_with_metrics(
        &self,
        engine: &dyn SqlEngine,
        question: &str,
        sql: &str,
    ) -> AdvisoryReport {
        let mut report = self.advise(engine, question, sql);
        report.metrics = Some(run_with_metrics_limited(
            engine,
            sql,
            self.config.sample_row_limit,
        ));
        report
    }

    /// Open the configured database with `driver` and run `advise_with_metrics`.
    /// The connection is closed before returning.
    #[tracing::instrument(skip(self, driver, question, sql), fields(driver = driver.id(), database = %self.config.database))]
    pub fn connect_and_advise(
        &self,
        driver: &dyn EngineDriver,
        question: &str,
        sql: &str,
    ) -> ServiceResult<AdvisoryReport> {
        let engine = driver
            .connect(&self.config.target())
            .map_err(|e| ServiceError::ConnectionFailed(e.to_string()))?;
        Ok(self.advise_with_metrics(engine.as_ref(), question, sql))
    }
}

impl Default for Advisor {
    fn default() -> Self {
        Self::new(AdvisorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_question_uses_configured_filters() {
        let advisor = Advisor::new(AdvisorConfig::new().with_known_filters(["Brazil"]));

        let intent = advisor.parse_question("Total sales in brazil and india");
        assert_eq!(intent.filters, vec!["brazil"]);
        assert_eq!(intent.aggregations, vec!["sum"]);
    }

    #[test]
    fn test_default_advisor_uses_default_filters() {
        let advisor = Advisor::default();

        assert_eq!(advisor.config(), &AdvisorConfig::default());
        assert_eq!(advisor.parse_question("sales in india").filters, vec!["india"]);
    }
}
