//! Error types for the MySQL driver.

use thiserror::Error;

/// Errors that can occur while setting up a MySQL workload.
#[derive(Error, Debug)]
pub enum MySQLWorkloadError {
    /// MySQL connection or query error.
    #[error("MySQL error: {0}")]
    MySQL(#[from] mysql_async::Error),

    /// Workload configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] workload_core::ConfigError),
}
