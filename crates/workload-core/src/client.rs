//! Transactional execution of a workload.
//!
//! ## Execution Flow
//!
//! ```text
//! begin ──► render + run statement 0 ──► ... ──► statement N ──► commit
//!   │                    │                              │
//!   ▼                    └────────── error ─────────────┴──► rollback
//! RequestError::Begin
//! ```
//!
//! One call to [`Client::request`] is one transaction attempt. The client
//! holds no per-call state, so any number of calls may run at once.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, trace, warn};

use crate::config::TxnOptions;
use crate::error::RequestError;
use crate::statement::StatementKind;
use crate::workload::Workload;

/// A database handle that can start transactions.
///
/// Implementations are shared by all concurrent execution calls.
#[async_trait]
pub trait Database: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;
    type Transaction: Transaction<Error = Self::Error>;

    /// Start a transaction with the given options.
    async fn begin(&self, options: &TxnOptions) -> Result<Self::Transaction, Self::Error>;
}

/// An open transaction.
///
/// Dropping a transaction without committing must roll it back.
#[async_trait]
pub trait Transaction: Send {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run a row-returning statement and drain every row.
    ///
    /// Returns the number of rows read.
    async fn query(&mut self, sql: &str) -> Result<u64, Self::Error>;

    /// Run a statement for its effects. Returns the affected row count.
    async fn exec(&mut self, sql: &str) -> Result<u64, Self::Error>;

    async fn commit(self) -> Result<(), Self::Error>;

    async fn rollback(self) -> Result<(), Self::Error>;
}

/// What a successful execution call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOutcome {
    pub statements: usize,
    pub rows_read: u64,
    pub rows_affected: u64,
}

/// Runs a workload against a database, one transaction per call.
#[derive(Debug)]
pub struct Client<D> {
    workload: Arc<Workload>,
    db: D,
}

impl<D: Database> Client<D> {
    pub fn new(workload: impl Into<Arc<Workload>>, db: D) -> Self {
        Self {
            workload: workload.into(),
            db,
        }
    }

    pub fn workload(&self) -> &Workload {
        &self.workload
    }

    /// Give back the database handle, e.g. to disconnect it.
    pub fn into_database(self) -> D {
        self.db
    }

    /// Run the workload once as a single transaction.
    ///
    /// Every path that does not commit attempts a rollback; a failing
    /// rollback is logged and the original error is returned.
    pub async fn request(&self) -> Result<RequestOutcome, RequestError<D::Error>> {
        let options = self.workload.options();
        let mut tx = self.db.begin(options).await.map_err(RequestError::Begin)?;

        match self.run_statements(&mut tx).await {
            Ok(outcome) => {
                tx.commit().await.map_err(RequestError::Commit)?;
                debug!(
                    statements = outcome.statements,
                    rows_read = outcome.rows_read,
                    rows_affected = outcome.rows_affected,
                    "Transaction committed"
                );
                Ok(outcome)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("Rollback failed after {}: {}", err.phase(), rollback_err);
                }
                Err(err)
            }
        }
    }

    async fn run_statements(
        &self,
        tx: &mut D::Transaction,
    ) -> Result<RequestOutcome, RequestError<D::Error>> {
        let mut outcome = RequestOutcome::default();

        for (index, statement) in self.workload.statements().iter().enumerate() {
            let sql = self.workload.render(statement);
            trace!(index, kind = %statement.kind(), sql = %sql, "Executing statement");

            let result = match statement.kind() {
                StatementKind::Query => {
                    tx.query(&sql).await.map(|rows| outcome.rows_read += rows)
                }
                StatementKind::Exec => {
                    tx.exec(&sql).await.map(|rows| outcome.rows_affected += rows)
                }
            };
            if let Err(source) = result {
                return Err(RequestError::Statement {
                    index,
                    sql: sql.into_owned(),
                    source,
                });
            }

            outcome.statements += 1;
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IsolationLevel, WorkloadConfig};
    use crate::testing::{MemoryDatabase, MemoryError};
    use workload_generator::GeneratorOptions;

    fn config(start: i64) -> WorkloadConfig {
        WorkloadConfig {
            generators: GeneratorOptions {
                sequence_start: start,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn client<I, S>(templates: I, db: MemoryDatabase) -> Client<MemoryDatabase>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Client::new(Workload::new(templates, &config(1)).unwrap(), db)
    }

    #[tokio::test]
    async fn test_request_commits_all_statements() {
        let db = MemoryDatabase::new();
        let client = client(
            [
                "insert into k values('__seq_int__')",
                "update k set v = 1",
                "select * from k",
            ],
            db.clone(),
        );

        let outcome = client.request().await.unwrap();
        assert_eq!(outcome.statements, 3);
        assert_eq!(outcome.rows_affected, 2);
        assert_eq!(outcome.rows_read, 2);

        assert_eq!(
            db.committed(),
            vec![
                "insert into k values('0000000000000001')".to_string(),
                "update k set v = 1".to_string(),
            ]
        );
        assert_eq!(db.stats().commits, 1);
        assert_eq!(db.stats().rollbacks, 0);
    }

    #[tokio::test]
    async fn test_failing_statement_rolls_back_everything() {
        let db = MemoryDatabase::new().fail_statements_containing("missing_table");
        let client = client(
            [
                "insert into k values('__seq_int__')",
                "insert into missing_table values(1)",
                "insert into k values('__seq_int__')",
            ],
            db.clone(),
        );

        let err = client.request().await.unwrap_err();
        match &err {
            RequestError::Statement { index, sql, source } => {
                assert_eq!(*index, 1);
                assert_eq!(sql, "insert into missing_table values(1)");
                assert!(matches!(source, MemoryError::Rejected(_)));
            }
            other => panic!("Expected statement error, got {other:?}"),
        }

        assert!(db.committed().is_empty());
        let stats = db.stats();
        assert_eq!(stats.commits, 0);
        assert_eq!(stats.rollbacks, 1);
        assert_eq!(stats.statements, 2, "third statement must not run");
    }

    #[tokio::test]
    async fn test_begin_failure_runs_nothing() {
        let db = MemoryDatabase::new().fail_begin();
        let client = client(["insert into k values(1)"], db.clone());

        let err = client.request().await.unwrap_err();
        assert!(matches!(err, RequestError::Begin(MemoryError::BeginRefused)));
        assert_eq!(err.phase(), "begin");
        assert_eq!(db.stats().statements, 0);
        assert_eq!(db.stats().rollbacks, 0);
    }

    #[tokio::test]
    async fn test_commit_failure_is_returned() {
        let db = MemoryDatabase::new().fail_commit();
        let client = client(["insert into k values(1)"], db.clone());

        let err = client.request().await.unwrap_err();
        assert!(matches!(err, RequestError::Commit(MemoryError::CommitRefused)));
        assert!(db.committed().is_empty());
    }

    #[tokio::test]
    async fn test_rollback_failure_keeps_statement_error() {
        let db = MemoryDatabase::new()
            .fail_statements_containing("boom")
            .fail_rollback();
        let client = client(["insert into k values(1)", "delete from boom"], db.clone());

        let err = client.request().await.unwrap_err();
        assert!(matches!(err, RequestError::Statement { index: 1, .. }));
        assert!(db.committed().is_empty());
    }

    #[tokio::test]
    async fn test_transaction_options_are_passed() {
        let db = MemoryDatabase::new();
        let mut config = config(1);
        config.transaction.isolation = IsolationLevel::Serializable;
        config.transaction.read_only = true;

        let client = Client::new(
            Workload::new(["select * from k", "insert into k values(1)"], &config).unwrap(),
            db.clone(),
        );

        let err = client.request().await.unwrap_err();
        assert!(matches!(
            err,
            RequestError::Statement {
                index: 1,
                source: MemoryError::ReadOnly(_),
                ..
            }
        ));
        assert_eq!(
            db.stats().last_options,
            Some(TxnOptions {
                isolation: IsolationLevel::Serializable,
                read_only: true,
            })
        );
    }

    #[tokio::test]
    async fn test_each_statement_gets_its_own_value() {
        let db = MemoryDatabase::new();
        let client = client(
            [
                "insert into k values('__seq_int__')",
                "insert into k values('__seq_int__')",
            ],
            db.clone(),
        );

        client.request().await.unwrap();
        client.request().await.unwrap();

        assert_eq!(
            db.committed(),
            vec![
                "insert into k values('0000000000000001')".to_string(),
                "insert into k values('0000000000000002')".to_string(),
                "insert into k values('0000000000000003')".to_string(),
                "insert into k values('0000000000000004')".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_concurrent_requests_insert_distinct_keys() {
        let db = MemoryDatabase::new();
        let client = Arc::new(client(
            ["insert into k values('__seq_int__')", "select * from k"],
            db.clone(),
        ));

        let a = tokio::spawn({
            let client = Arc::clone(&client);
            async move { client.request().await }
        });
        let b = tokio::spawn({
            let client = Arc::clone(&client);
            async move { client.request().await }
        });

        assert!(a.await.unwrap().is_ok());
        assert!(b.await.unwrap().is_ok());

        let mut committed = db.committed();
        committed.sort();
        assert_eq!(
            committed,
            vec![
                "insert into k values('0000000000000001')".to_string(),
                "insert into k values('0000000000000002')".to_string(),
            ]
        );
    }
}
