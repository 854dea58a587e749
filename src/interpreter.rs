//! Question-to-SQL interpretation.
//!
//! The question is lower-cased and annotated once. Rules are tried in
//! catalog order; the first whose trigger matches decides the outcome,
//! whether or not its extractor succeeds.

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::annotate::{Annotation, Annotator, LexiconAnnotator};
use crate::ast::{SqlQuery, Template};
use crate::config::AnnotatorConfig;
use crate::rules::{Context, RuleCatalog};
use crate::transpiler::ToSql;

/// Translates questions into SQL with a fixed catalog and annotator.
///
/// Holds no mutable state, so one instance can serve concurrent requests.
pub struct Interpreter {
    catalog: RuleCatalog,
    annotator: Box<dyn Annotator>,
}

/// Everything learned while interpreting one question.
#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    pub query: String,
    pub annotation: Annotation,
    /// `(priority, name)` of the rule that claimed the question.
    pub rule: Option<(usize, &'static str)>,
    #[serde(skip)]
    pub template: Option<Template>,
    pub sql: Option<SqlQuery>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(RuleCatalog::standard(), LexiconAnnotator::new())
    }
}

impl Interpreter {
    pub fn new(catalog: RuleCatalog, annotator: impl Annotator + 'static) -> Self {
        Self {
            catalog,
            annotator: Box::new(annotator),
        }
    }

    /// Standard catalog with the configured extra person names.
    pub fn from_config(config: &AnnotatorConfig) -> Self {
        Self::new(
            RuleCatalog::standard(),
            LexiconAnnotator::new().with_person_names(&config.person_names),
        )
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// SQL for `query`, or `None` when the question should be rephrased.
    pub fn interpret(&self, query: &str) -> Option<SqlQuery> {
        self.interpret_on(query, Local::now().date_naive())
    }

    /// Like [`interpret`](Self::interpret) with a fixed reference date.
    pub fn interpret_on(&self, query: &str, today: NaiveDate) -> Option<SqlQuery> {
        self.explain_on(query, today).sql
    }

    pub fn explain(&self, query: &str) -> Explanation {
        self.explain_on(query, Local::now().date_naive())
    }

    pub fn explain_on(&self, query: &str, today: NaiveDate) -> Explanation {
        let mut explanation = Explanation {
            query: query.to_string(),
            annotation: Annotation::default(),
            rule: None,
            template: None,
            sql: None,
        };

        if query.trim().is_empty() {
            return explanation;
        }

        let lowered = query.to_lowercase();
        explanation.annotation = self.annotator.annotate(&lowered);

        let Some(rule) = self.catalog.first_triggered(&lowered) else {
            tracing::debug!(query, "no rule triggered");
            return explanation;
        };
        explanation.rule = Some((rule.priority, rule.kind.name()));

        let ctx = Context {
            raw: query,
            lowered: &lowered,
            annotation: &explanation.annotation,
            today,
        };
        explanation.template = rule.kind.extract(&ctx);
        explanation.sql = explanation.template.as_ref().map(ToSql::to_sql);

        match &explanation.sql {
            Some(sql) => tracing::debug!(
                rule = rule.kind.name(),
                sql = %sql,
                params = sql.params.len(),
                "query interpreted"
            ),
            None => tracing::debug!(
                rule = rule.kind.name(),
                needs = rule.kind.needs(),
                "rule triggered but extraction failed"
            ),
        }

        explanation
    }
}
