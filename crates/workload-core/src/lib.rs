//! Core of the sql-workload driver.
//!
//! A [`Workload`] is an ordered list of classified statement templates plus
//! the generators that fill in their placeholders. A [`Client`] runs the
//! workload against a [`Database`], one transaction per
//! [`request`](Client::request) call, and may be called from many tasks at once.
//!
//! # Example
//!
//! ```rust
//! use workload_core::testing::MemoryDatabase;
//! use workload_core::{Client, Workload, WorkloadConfig};
//!
//! # tokio_test::block_on(async {
//! let workload = Workload::new(
//!     ["insert into k values('__seq_int__')", "select * from k"],
//!     &WorkloadConfig::default(),
//! )
//! .unwrap();
//!
//! let client = Client::new(workload, MemoryDatabase::new());
//! let outcome = client.request().await.unwrap();
//! assert_eq!(outcome.statements, 2);
//! # });
//! ```

pub mod args;
pub mod client;
pub mod config;
pub mod error;
pub mod statement;
pub mod testing;
pub mod workload;

pub use args::CommonWorkloadArgs;
pub use client::{Client, Database, RequestOutcome, Transaction};
pub use config::{IsolationLevel, TxnOptions, WorkloadConfig, WorkloadFile};
pub use error::{ConfigError, RequestError};
pub use statement::{split_statements, Classifier, Statement, StatementKind};
pub use workload::Workload;
