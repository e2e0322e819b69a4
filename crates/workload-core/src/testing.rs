//! In-memory transactional database for exercising clients without a server.
//!
//! Write statements are buffered per transaction and become visible in
//! [`MemoryDatabase::committed`] only on commit. Queries report one row per
//! visible write. Failures can be injected per phase.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use thiserror::Error;

use crate::client::{Database, Transaction};
use crate::config::TxnOptions;

/// Errors produced by [`MemoryDatabase`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("begin refused")]
    BeginRefused,

    #[error("statement rejected: {0}")]
    Rejected(String),

    #[error("write in read-only transaction: {0}")]
    ReadOnly(String),

    #[error("commit refused")]
    CommitRefused,

    #[error("rollback refused")]
    RollbackRefused,
}

/// Counters describing what the database has seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStats {
    pub begins: u64,
    pub statements: u64,
    pub commits: u64,
    pub rollbacks: u64,
    pub last_options: Option<TxnOptions>,
}

#[derive(Debug, Default)]
struct MemoryState {
    committed: Vec<String>,
    stats: MemoryStats,
}

#[derive(Debug, Default, Clone)]
struct Faults {
    begin: bool,
    commit: bool,
    rollback: bool,
    statement_marker: Option<String>,
}

/// Cloneable handle; clones share the same data.
#[derive(Debug, Default, Clone)]
pub struct MemoryDatabase {
    state: Arc<Mutex<MemoryState>>,
    faults: Faults,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse to begin transactions.
    pub fn fail_begin(mut self) -> Self {
        self.faults.begin = true;
        self
    }

    /// Refuse to commit.
    pub fn fail_commit(mut self) -> Self {
        self.faults.commit = true;
        self
    }

    /// Report failure on rollback (the transaction is still discarded).
    pub fn fail_rollback(mut self) -> Self {
        self.faults.rollback = true;
        self
    }

    /// Reject any statement whose text contains `marker`.
    pub fn fail_statements_containing(mut self, marker: impl Into<String>) -> Self {
        self.faults.statement_marker = Some(marker.into());
        self
    }

    /// Committed write statements, in commit order.
    pub fn committed(&self) -> Vec<String> {
        self.lock().committed.clone()
    }

    pub fn stats(&self) -> MemoryStats {
        self.lock().stats.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    type Error = MemoryError;
    type Transaction = MemoryTransaction;

    async fn begin(&self, options: &TxnOptions) -> Result<MemoryTransaction, MemoryError> {
        let mut state = self.lock();
        state.stats.last_options = Some(*options);
        if self.faults.begin {
            return Err(MemoryError::BeginRefused);
        }
        state.stats.begins += 1;

        Ok(MemoryTransaction {
            db: self.clone(),
            options: *options,
            pending: Vec::new(),
        })
    }
}

/// Transaction on a [`MemoryDatabase`]. Pending writes vanish on drop.
#[derive(Debug)]
pub struct MemoryTransaction {
    db: MemoryDatabase,
    options: TxnOptions,
    pending: Vec<String>,
}

impl MemoryTransaction {
    fn check(&self, sql: &str) -> Result<(), MemoryError> {
        self.db.lock().stats.statements += 1;
        match &self.db.faults.statement_marker {
            Some(marker) if sql.contains(marker.as_str()) => {
                Err(MemoryError::Rejected(sql.to_string()))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl Transaction for MemoryTransaction {
    type Error = MemoryError;

    async fn query(&mut self, sql: &str) -> Result<u64, MemoryError> {
        self.check(sql)?;
        let visible = self.db.lock().committed.len() + self.pending.len();
        Ok(visible as u64)
    }

    async fn exec(&mut self, sql: &str) -> Result<u64, MemoryError> {
        self.check(sql)?;
        if self.options.read_only {
            return Err(MemoryError::ReadOnly(sql.to_string()));
        }
        self.pending.push(sql.to_string());
        Ok(1)
    }

    async fn commit(self) -> Result<(), MemoryError> {
        if self.db.faults.commit {
            return Err(MemoryError::CommitRefused);
        }
        let mut state = self.db.lock();
        state.committed.extend(self.pending);
        state.stats.commits += 1;
        Ok(())
    }

    async fn rollback(self) -> Result<(), MemoryError> {
        self.db.lock().stats.rollbacks += 1;
        if self.db.faults.rollback {
            return Err(MemoryError::RollbackRefused);
        }
        Ok(())
    }
}
