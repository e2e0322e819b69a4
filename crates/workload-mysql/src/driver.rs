//! `mysql_async` implementation of the workload database seam.

use async_trait::async_trait;
use mysql_async::{prelude::*, Pool, Row, TxOpts};
use tracing::{debug, info};
use workload_core::{Database, IsolationLevel, Transaction, TxnOptions};

use crate::error::MySQLWorkloadError;

/// A pooled MySQL connection shared by all execution calls.
#[derive(Debug, Clone)]
pub struct MySQLDatabase {
    pool: Pool,
}

impl MySQLDatabase {
    /// Create a pool for `connection_string` and check that the server answers.
    pub async fn connect(connection_string: &str) -> Result<Self, MySQLWorkloadError> {
        let pool = Pool::from_url(connection_string)?;

        let mut conn = pool.get_conn().await?;
        conn.ping().await?;
        drop(conn);

        info!("Connected to MySQL");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Close every pooled connection.
    pub async fn disconnect(self) -> Result<(), MySQLWorkloadError> {
        self.pool.disconnect().await?;
        Ok(())
    }
}

fn tx_opts(options: &TxnOptions) -> TxOpts {
    let isolation = match options.isolation {
        IsolationLevel::Default => None,
        IsolationLevel::ReadUncommitted => Some(mysql_async::IsolationLevel::ReadUncommitted),
        IsolationLevel::ReadCommitted => Some(mysql_async::IsolationLevel::ReadCommitted),
        IsolationLevel::RepeatableRead => Some(mysql_async::IsolationLevel::RepeatableRead),
        IsolationLevel::Serializable => Some(mysql_async::IsolationLevel::Serializable),
    };

    let mut opts = TxOpts::default();
    opts.with_isolation_level(isolation)
        .with_readonly(options.read_only.then_some(true));
    opts
}

#[async_trait]
impl Database for MySQLDatabase {
    type Error = mysql_async::Error;
    type Transaction = MySQLTransaction;

    async fn begin(&self, options: &TxnOptions) -> Result<MySQLTransaction, mysql_async::Error> {
        let tx = self.pool.start_transaction(tx_opts(options)).await?;
        Ok(MySQLTransaction { tx })
    }
}

/// An open MySQL transaction.
///
/// `mysql_async` rolls the transaction back if it is dropped uncommitted.
pub struct MySQLTransaction {
    tx: mysql_async::Transaction<'static>,
}

#[async_trait]
impl Transaction for MySQLTransaction {
    type Error = mysql_async::Error;

    async fn query(&mut self, sql: &str) -> Result<u64, mysql_async::Error> {
        let mut result = self.tx.query_iter(sql).await?;

        // Rows left unread would block the next statement on this connection.
        let mut rows = 0u64;
        result.for_each(|_: Row| rows += 1).await?;
        result.drop_result().await?;

        Ok(rows)
    }

    async fn exec(&mut self, sql: &str) -> Result<u64, mysql_async::Error> {
        let result = self.tx.query_iter(sql).await?;
        let affected = result.affected_rows();
        result.drop_result().await?;

        Ok(affected)
    }

    async fn commit(self) -> Result<(), mysql_async::Error> {
        self.tx.commit().await
    }

    async fn rollback(self) -> Result<(), mysql_async::Error> {
        debug!("Rolling back transaction");
        self.tx.rollback().await
    }
}
