//! Statement templates and read/write classification.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use workload_generator::Placeholder;

use crate::error::ConfigError;

/// Whether a statement returns rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// Row-returning statement; its rows are drained.
    Query,
    /// Statement run for its side effects.
    Exec,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementKind::Query => f.write_str("query"),
            StatementKind::Exec => f.write_str("exec"),
        }
    }
}

/// A classified statement template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    sql: String,
    kind: StatementKind,
}

impl Statement {
    pub fn new(sql: impl Into<String>, kind: StatementKind) -> Self {
        Self {
            sql: sql.into(),
            kind,
        }
    }

    /// Template text, placeholders unexpanded.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Placeholders this template uses.
    pub fn placeholders(&self) -> Vec<Placeholder> {
        Placeholder::scan(&self.sql)
    }
}

/// Maps leading SQL keywords to statement kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    keywords: HashMap<String, StatementKind>,
}

const QUERY_KEYWORDS: &[&str] = &["select", "show"];
const DML_KEYWORDS: &[&str] = &["insert", "delete", "update"];
const DDL_KEYWORDS: &[&str] = &["create", "drop"];

impl Classifier {
    /// An empty classifier that rejects everything.
    pub fn empty() -> Self {
        Self {
            keywords: HashMap::new(),
        }
    }

    /// Reads plus `insert`/`delete`/`update`, without DDL.
    pub fn dml_only() -> Self {
        let mut classifier = Self::empty();
        classifier.extend(QUERY_KEYWORDS, StatementKind::Query);
        classifier.extend(DML_KEYWORDS, StatementKind::Exec);
        classifier
    }

    /// Add or override a keyword. Matching is case-insensitive.
    pub fn with_keyword(mut self, keyword: &str, kind: StatementKind) -> Self {
        self.keywords.insert(keyword.to_lowercase(), kind);
        self
    }

    fn extend(&mut self, keywords: &[&str], kind: StatementKind) {
        for keyword in keywords {
            self.keywords.insert((*keyword).to_string(), kind);
        }
    }

    /// Classify a template by its first whitespace-delimited token.
    pub fn classify(&self, sql: &str) -> Result<StatementKind, ConfigError> {
        let keyword = sql
            .split_whitespace()
            .next()
            .ok_or_else(|| ConfigError::UnknownStatement(sql.to_string()))?;

        self.keywords
            .get(&keyword.to_lowercase())
            .copied()
            .ok_or_else(|| ConfigError::UnknownStatement(sql.to_string()))
    }

    /// Classify every template, in order.
    ///
    /// Fails on the first template that cannot be classified; no partial
    /// list is returned.
    pub fn classify_all<I, S>(&self, templates: I) -> Result<Vec<Statement>, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut statements = Vec::new();
        for (position, template) in templates.into_iter().enumerate() {
            let sql = template.into();
            if sql.trim().is_empty() {
                return Err(ConfigError::EmptyStatement(position));
            }
            let kind = self.classify(&sql)?;
            statements.push(Statement::new(sql, kind));
        }

        if statements.is_empty() {
            return Err(ConfigError::NoStatements);
        }
        Ok(statements)
    }
}

impl Default for Classifier {
    /// Reads, DML and `create`/`drop`.
    fn default() -> Self {
        let mut classifier = Self::dml_only();
        classifier.extend(DDL_KEYWORDS, StatementKind::Exec);
        classifier
    }
}

/// Split `;`-separated SQL into statement segments.
///
/// A trailing empty segment left by a final separator is discarded. There is
/// no escaping: a `;` inside a quoted literal splits the statement.
pub fn split_statements(input: &str) -> Vec<String> {
    let mut segments: Vec<String> = input.split(';').map(str::to_string).collect();
    if segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }
    segments
}
