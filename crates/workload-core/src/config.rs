//! Configuration types for workloads.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;
use workload_generator::GeneratorOptions;

use crate::error::ConfigError;
use crate::statement::Classifier;

/// Transaction isolation level.
///
/// Besides the names, the numeric levels of Go's `database/sql` are accepted
/// for the levels MySQL supports (0, 1, 2, 4 and 6).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IsolationLevel {
    /// Whatever the server session uses.
    #[default]
    Default,
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl FromStr for IsolationLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "0" | "default" => Ok(IsolationLevel::Default),
            "1" | "read-uncommitted" => Ok(IsolationLevel::ReadUncommitted),
            "2" | "read-committed" => Ok(IsolationLevel::ReadCommitted),
            "4" | "repeatable-read" => Ok(IsolationLevel::RepeatableRead),
            "6" | "serializable" => Ok(IsolationLevel::Serializable),
            _ => Err(ConfigError::UnknownIsolation(s.to_string())),
        }
    }
}

impl fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IsolationLevel::Default => "default",
            IsolationLevel::ReadUncommitted => "read-uncommitted",
            IsolationLevel::ReadCommitted => "read-committed",
            IsolationLevel::RepeatableRead => "repeatable-read",
            IsolationLevel::Serializable => "serializable",
        };
        f.write_str(name)
    }
}

/// Options applied when a transaction begins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TxnOptions {
    pub isolation: IsolationLevel,
    pub read_only: bool,
}

/// Everything a workload needs besides its statements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    /// Generator settings for placeholder values.
    #[serde(flatten)]
    pub generators: GeneratorOptions,
    /// Transaction settings.
    #[serde(flatten)]
    pub transaction: TxnOptions,
    /// Reject `create`/`drop` statements.
    pub dml_only: bool,
}

impl WorkloadConfig {
    /// Classifier matching this configuration.
    pub fn classifier(&self) -> Classifier {
        if self.dml_only {
            Classifier::dml_only()
        } else {
            Classifier::default()
        }
    }

    /// Set the `__rand_range__` bound from a signed flag value.
    pub fn with_range_bound(mut self, bound: i64) -> Result<Self, ConfigError> {
        self.generators.random_range_bound =
            u64::try_from(bound).map_err(|_| ConfigError::NegativeRangeBound(bound))?;
        Ok(self)
    }
}

/// A workload described in a YAML file.
///
/// ```yaml
/// statements:
///   - insert into k values('__seq_int__')
///   - select * from k where id = '__rand_range__'
/// sequence_start: 1
/// random_range_bound: 1000
/// isolation: repeatable-read
/// read_only: false
/// ```
///
/// The config keys are flattened, so serde cannot reject unknown ones.
/// Unrecognized top-level keys are logged and otherwise ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadFile {
    /// Statement templates, in execution order.
    #[serde(default)]
    pub statements: Vec<String>,
    #[serde(flatten)]
    pub config: WorkloadConfig,
}

impl WorkloadFile {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let file: Self = serde_yaml::from_str(yaml)?;
        for key in file.unknown_keys(yaml) {
            warn!("Ignoring unknown workload file key '{}'", key);
        }
        Ok(file)
    }

    /// Top-level keys of `yaml` that no field of `self` reads.
    fn unknown_keys(&self, yaml: &str) -> Vec<String> {
        let Ok(given) = serde_yaml::from_str::<serde_yaml::Value>(yaml) else {
            return Vec::new();
        };
        let Some(given) = given.as_mapping() else {
            return Vec::new();
        };
        let known = serde_yaml::to_value(self).unwrap_or_default();

        given
            .keys()
            .filter_map(|key| key.as_str())
            .filter(|key| known.get(*key).is_none())
            .map(str::to_string)
            .collect()
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }
}
