//! MySQL workload runner.

use std::io;
use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info, warn};
use workload_core::Client;
use workload_mysql::{MySQLDatabase, MySQLWorkloadArgs};

use crate::bench::{run_bench, BenchSummary};
use crate::input::build_workload;
use crate::logging::mask_connection_password;

/// Usage hint printed when no statements are given.
pub const USAGE: &str = "Usage: sql-workload mysql <sqls...>
 use __rand_int__, __rand_range__ or __seq_int__ to generate random or sequence keys";

/// Build the workload, connect to MySQL and run it.
pub async fn run_mysql(args: MySQLWorkloadArgs) -> anyhow::Result<Option<BenchSummary>> {
    let common = &args.common;
    if !common.has_statement_source() {
        println!("{USAGE}");
        return Ok(None);
    }

    let workload = build_workload(common, io::stdin().lock())?;
    info!(
        "Loaded {} statements (isolation={}, read_only={})",
        workload.statements().len(),
        workload.options().isolation,
        workload.options().read_only
    );
    for (index, statement) in workload.statements().iter().enumerate() {
        debug!(
            index,
            kind = %statement.kind(),
            placeholders = ?statement.placeholders(),
            "{}",
            statement.sql()
        );
    }

    let masked = mask_connection_password(&args.mysql_connection_string);
    if common.dry_run {
        info!("[DRY-RUN] Would run {} transactions on {} workers", common.requests, common.workers);
        info!("[DRY-RUN] Connection: {}", masked);
        info!("[DRY-RUN] Statements validated successfully");
        return Ok(None);
    }

    let db = MySQLDatabase::connect(&args.mysql_connection_string)
        .await
        .with_context(|| format!("Failed to connect to MySQL at {masked}"))?;
    let client = Arc::new(Client::new(workload, db));

    let summary = run_bench(Arc::clone(&client), common.workers, common.requests).await?;

    if let Ok(client) = Arc::try_unwrap(client) {
        if let Err(e) = client.into_database().disconnect().await {
            warn!("Failed to disconnect from MySQL: {}", e);
        }
    }

    if summary.total() > 0 && summary.succeeded == 0 {
        anyhow::bail!("All {} transactions failed", summary.failed);
    }
    Ok(Some(summary))
}
