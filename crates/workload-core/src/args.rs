//! CLI argument definitions shared by every database driver.

use std::path::PathBuf;

use clap::Args;

use crate::config::{IsolationLevel, WorkloadConfig, WorkloadFile};
use crate::error::ConfigError;

/// Workload arguments common to all drivers.
#[derive(Args, Clone, Debug)]
pub struct CommonWorkloadArgs {
    /// `;`-separated SQL statements. Use __seq_int__, __rand_int__ or
    /// __rand_range__ to generate sequence or random keys
    pub sqls: Option<String>,

    /// Also read statements from stdin, one or more per line
    #[arg(long)]
    pub stdin: bool,

    /// YAML workload file with statements and options
    #[arg(long, value_name = "PATH")]
    pub workload: Option<PathBuf>,

    /// Transaction isolation level (name or database/sql level number)
    #[arg(long)]
    pub isolation: Option<IsolationLevel>,

    /// Run read-only transactions
    #[arg(long)]
    pub readonly: bool,

    /// Exclusive upper bound of __rand_range__ (0 = same as __rand_int__)
    #[arg(long, allow_hyphen_values = true)]
    pub rmax: Option<i64>,

    /// First value of __seq_int__
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    pub seq_start: Option<i64>,

    /// Seed random placeholders for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Reject create/drop statements
    #[arg(long)]
    pub dml_only: bool,

    /// Number of concurrent workers
    #[arg(long, default_value = "1")]
    pub workers: usize,

    /// Total number of transactions to run
    #[arg(long, default_value = "1")]
    pub requests: u64,

    /// Validate the statements and exit without connecting
    #[arg(long)]
    pub dry_run: bool,
}

impl CommonWorkloadArgs {
    /// Whether any statement source was given.
    pub fn has_statement_source(&self) -> bool {
        self.sqls.is_some() || self.stdin || self.workload.is_some()
    }

    /// Load the workload file, if any.
    pub fn load_file(&self) -> Result<Option<WorkloadFile>, ConfigError> {
        self.workload
            .as_ref()
            .map(WorkloadFile::from_file)
            .transpose()
    }

    /// Merge flags over `base` (the workload file's settings, or defaults).
    pub fn apply(&self, base: WorkloadConfig) -> Result<WorkloadConfig, ConfigError> {
        let mut config = base;
        if let Some(rmax) = self.rmax {
            config = config.with_range_bound(rmax)?;
        }
        if let Some(start) = self.seq_start {
            config.generators.sequence_start = start;
        }
        if self.seed.is_some() {
            config.generators.seed = self.seed;
        }
        if let Some(isolation) = self.isolation {
            config.transaction.isolation = isolation;
        }
        config.transaction.read_only |= self.readonly;
        config.dml_only |= self.dml_only;
        Ok(config)
    }
}

impl Default for CommonWorkloadArgs {
    fn default() -> Self {
        Self {
            sqls: None,
            stdin: false,
            workload: None,
            isolation: None,
            readonly: false,
            rmax: None,
            seq_start: None,
            seed: None,
            dml_only: false,
            workers: 1,
            requests: 1,
            dry_run: false,
        }
    }
}
