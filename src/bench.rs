//! Minimal concurrent driver for a workload client.
//!
//! Spawns `workers` tasks that share one [`Client`] and keep issuing
//! execution calls until `requests` calls have been claimed in total.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use workload_core::{Client, Database};

/// Success and failure counts of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BenchSummary {
    pub succeeded: u64,
    pub failed: u64,
    /// Failures keyed by the phase that failed (`begin`, `statement`, `commit`).
    pub failures_by_phase: BTreeMap<&'static str, u64>,
    pub elapsed: Duration,
}

impl BenchSummary {
    pub fn total(&self) -> u64 {
        self.succeeded + self.failed
    }

    fn merge(&mut self, other: BenchSummary) {
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        for (phase, count) in other.failures_by_phase {
            *self.failures_by_phase.entry(phase).or_default() += count;
        }
    }
}

/// Claim one request from the shared budget.
fn claim(remaining: &AtomicU64) -> bool {
    remaining
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

/// Run `requests` execution calls spread over `workers` concurrent tasks.
pub async fn run_bench<D>(
    client: Arc<Client<D>>,
    workers: usize,
    requests: u64,
) -> anyhow::Result<BenchSummary>
where
    D: Database + 'static,
{
    let workers = workers.max(1);
    let remaining = Arc::new(AtomicU64::new(requests));
    let started = Instant::now();

    info!("Running {} transactions on {} workers", requests, workers);

    let mut tasks = JoinSet::new();
    for worker in 0..workers {
        let client = Arc::clone(&client);
        let remaining = Arc::clone(&remaining);

        tasks.spawn(async move {
            let mut summary = BenchSummary::default();
            while claim(&remaining) {
                match client.request().await {
                    Ok(outcome) => {
                        summary.succeeded += 1;
                        debug!(worker, ?outcome, "Transaction succeeded");
                    }
                    Err(e) => {
                        summary.failed += 1;
                        let count = summary.failures_by_phase.entry(e.phase()).or_default();
                        *count += 1;
                        if *count == 1 {
                            warn!(worker, "Transaction failed: {}", e);
                        } else {
                            debug!(worker, "Transaction failed: {}", e);
                        }
                    }
                }
            }
            summary
        });
    }

    let mut summary = BenchSummary::default();
    while let Some(joined) = tasks.join_next().await {
        summary.merge(joined.context("Worker task panicked")?);
    }
    summary.elapsed = started.elapsed();

    info!(
        "Finished {} transactions in {:?}: {} succeeded, {} failed",
        summary.total(),
        summary.elapsed,
        summary.succeeded,
        summary.failed
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use workload_core::testing::MemoryDatabase;
    use workload_core::{Workload, WorkloadConfig};
    use workload_generator::GeneratorOptions;

    fn client(templates: &[&str], db: MemoryDatabase) -> Arc<Client<MemoryDatabase>> {
        let config = WorkloadConfig {
            generators: GeneratorOptions {
                sequence_start: 1,
                ..Default::default()
            },
            ..Default::default()
        };
        let workload = Workload::new(templates.iter().copied(), &config).unwrap();
        Arc::new(Client::new(workload, db))
    }

    #[test]
    fn test_claim_stops_at_zero() {
        let remaining = AtomicU64::new(2);
        assert!(claim(&remaining));
        assert!(claim(&remaining));
        assert!(!claim(&remaining));
        assert_eq!(remaining.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_runs_exact_request_count() {
        let db = MemoryDatabase::new();
        let client = client(
            &["insert into k values('__seq_int__')", "select * from k"],
            db.clone(),
        );

        let summary = run_bench(client, 8, 100).await.unwrap();
        assert_eq!(summary.succeeded, 100);
        assert_eq!(summary.failed, 0);

        let mut keys: Vec<i64> = db
            .committed()
            .iter()
            .map(|sql| sql[sql.find('\'').unwrap() + 1..sql.rfind('\'').unwrap()].parse().unwrap())
            .collect();
        keys.sort_unstable();
        assert_eq!(keys, (1..=100).collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn test_failures_are_counted_by_phase() {
        let db = MemoryDatabase::new().fail_statements_containing("missing");
        let client = client(&["insert into missing values(1)"], db.clone());

        let summary = run_bench(client, 2, 5).await.unwrap();
        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.failed, 5);
        assert_eq!(summary.failures_by_phase.get("statement"), Some(&5));
        assert!(db.committed().is_empty());
    }

    #[tokio::test]
    async fn test_zero_workers_still_runs() {
        let db = MemoryDatabase::new();
        let client = client(&["select 1"], db);

        let summary = run_bench(client, 0, 3).await.unwrap();
        assert_eq!(summary.total(), 3);
    }
}
