//! The immutable shape of every transaction a client runs.

use std::borrow::Cow;

use workload_generator::Substituter;

use crate::config::{TxnOptions, WorkloadConfig};
use crate::error::ConfigError;
use crate::statement::{Classifier, Statement};

/// Classified statements plus the generators and options they run with.
///
/// Built once; shared read-only by every execution call.
#[derive(Debug, Clone)]
pub struct Workload {
    statements: Vec<Statement>,
    substituter: Substituter,
    options: TxnOptions,
}

impl Workload {
    /// Classify `templates` and build the generators described by `config`.
    pub fn new<I, S>(templates: I, config: &WorkloadConfig) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let statements = config.classifier().classify_all(templates)?;
        Ok(Self::from_parts(
            statements,
            Substituter::from_options(&config.generators),
            config.transaction,
        ))
    }

    /// Build a workload with a custom classifier.
    pub fn with_classifier<I, S>(
        templates: I,
        classifier: &Classifier,
        config: &WorkloadConfig,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let statements = classifier.classify_all(templates)?;
        Ok(Self::from_parts(
            statements,
            Substituter::from_options(&config.generators),
            config.transaction,
        ))
    }

    /// Assemble a workload from already classified statements.
    pub fn from_parts(
        statements: Vec<Statement>,
        substituter: Substituter,
        options: TxnOptions,
    ) -> Self {
        Self {
            statements,
            substituter,
            options,
        }
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn options(&self) -> &TxnOptions {
        &self.options
    }

    /// Concrete SQL for one run of `statement`.
    pub fn render<'a>(&self, statement: &'a Statement) -> Cow<'a, str> {
        self.substituter.substitute(statement.sql())
    }
}
