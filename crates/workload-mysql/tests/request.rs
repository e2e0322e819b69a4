//! Integration tests running workloads against a MySQL container
//!
//! These tests start `mysql:8.0` through Docker and are ignored by default.
//! Run them with `cargo test -p workload-mysql -- --ignored`.

use std::sync::Arc;

use anyhow::Result;
use mysql_async::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workload_core::{Client, RequestError, Workload, WorkloadConfig};
use workload_generator::GeneratorOptions;
use workload_mysql::testing::MySQLContainer;
use workload_mysql::MySQLDatabase;

/// Test port that doesn't conflict with standard MySQL port
const TEST_PORT: u16 = 13320;

/// Initialize logging for tests
fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

fn config(sequence_start: i64) -> WorkloadConfig {
    WorkloadConfig {
        generators: GeneratorOptions {
            sequence_start,
            ..Default::default()
        },
        ..Default::default()
    }
}

async fn create_table(db: &MySQLDatabase, table: &str) -> Result<()> {
    let mut conn = db.pool().get_conn().await?;
    conn.query_drop(format!("DROP TABLE IF EXISTS {table}"))
        .await?;
    conn.query_drop(format!("CREATE TABLE {table} (id CHAR(16) PRIMARY KEY)"))
        .await?;
    Ok(())
}

async fn keys(db: &MySQLDatabase, table: &str) -> Result<Vec<String>> {
    let mut conn = db.pool().get_conn().await?;
    let keys: Vec<String> = conn
        .query(format!("SELECT id FROM {table} ORDER BY id"))
        .await?;
    Ok(keys)
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_concurrent_requests_insert_consecutive_keys() -> Result<()> {
    init_logging();

    let container = MySQLContainer::new("test-workload-e2e", TEST_PORT);
    container.start()?;
    let db = container.wait_until_ready(120).await?;
    create_table(&db, "k").await?;

    let workload = Workload::new(
        ["insert into k values('__seq_int__')", "select * from k"],
        &config(1),
    )?;
    let client = Arc::new(Client::new(workload, db.clone()));

    let a = tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.request().await }
    });
    let b = tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.request().await }
    });
    assert!(a.await?.is_ok());
    assert!(b.await?.is_ok());

    let keys = keys(&db, "k").await?;
    assert_eq!(keys, vec!["0000000000000001", "0000000000000002"]);
    info!("Inserted keys: {:?}", keys);

    db.disconnect().await?;
    container.stop()?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_failing_statement_rolls_back_transaction() -> Result<()> {
    init_logging();

    let container = MySQLContainer::new("test-workload-rollback", TEST_PORT + 1);
    container.start()?;
    let db = container.wait_until_ready(120).await?;
    create_table(&db, "t").await?;

    let workload = Workload::new(
        [
            "insert into t values('__seq_int__')",
            "insert into missing_table values('__seq_int__')",
            "insert into t values('__seq_int__')",
        ],
        &config(1),
    )?;
    let client = Client::new(workload, db.clone());

    let err = client.request().await.unwrap_err();
    match &err {
        RequestError::Statement { index, sql, .. } => {
            assert_eq!(*index, 1);
            assert!(sql.contains("missing_table"));
        }
        other => panic!("Expected statement error, got {other:?}"),
    }

    assert!(keys(&db, "t").await?.is_empty());

    db.disconnect().await?;
    container.stop()?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_read_only_transaction_rejects_writes() -> Result<()> {
    init_logging();

    let container = MySQLContainer::new("test-workload-readonly", TEST_PORT + 2);
    container.start()?;
    let db = container.wait_until_ready(120).await?;
    create_table(&db, "r").await?;

    let mut config = config(1);
    config.transaction.read_only = true;
    let workload = Workload::new(["select * from r", "insert into r values('__seq_int__')"], &config)?;
    let client = Client::new(workload, db.clone());

    let err = client.request().await.unwrap_err();
    assert!(matches!(err, RequestError::Statement { index: 1, .. }));
    assert!(keys(&db, "r").await?.is_empty());

    db.disconnect().await?;
    container.stop()?;
    Ok(())
}
