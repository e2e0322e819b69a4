//! Error types for building and running workloads.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building a workload. All of them are fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Leading keyword is not a known read or write keyword.
    #[error("Unknown SQL statement: {0}")]
    UnknownStatement(String),

    /// A statement segment contained no SQL at all.
    #[error("Empty SQL statement at position {0}")]
    EmptyStatement(usize),

    /// No statements were supplied.
    #[error("No SQL statements given")]
    NoStatements,

    /// Unsupported transaction isolation level.
    #[error("Unknown isolation level: {0}")]
    UnknownIsolation(String),

    /// Negative `__rand_range__` bound.
    #[error("Random range bound must not be negative, got {0}")]
    NegativeRangeBound(i64),

    /// Workload file could not be read.
    #[error("Failed to read workload file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Workload file could not be parsed.
    #[error("Invalid workload file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors returned by a single execution call.
///
/// Each variant names the phase that failed. Driver errors are carried
/// verbatim.
#[derive(Error, Debug)]
pub enum RequestError<E>
where
    E: std::error::Error + 'static,
{
    /// The transaction could not be started; no statement ran.
    #[error("Failed to begin transaction: {0}")]
    Begin(#[source] E),

    /// A statement failed; the transaction was rolled back.
    #[error("Statement {index} failed ({sql}): {source}")]
    Statement {
        index: usize,
        sql: String,
        #[source]
        source: E,
    },

    /// Commit failed.
    #[error("Failed to commit transaction: {0}")]
    Commit(#[source] E),
}

impl<E> RequestError<E>
where
    E: std::error::Error + 'static,
{
    /// Short phase label, used for logging and failure tallies.
    pub fn phase(&self) -> &'static str {
        match self {
            RequestError::Begin(_) => "begin",
            RequestError::Statement { .. } => "statement",
            RequestError::Commit(_) => "commit",
        }
    }
}
