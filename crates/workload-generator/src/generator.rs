//! Generator capability and the fixed-width value format.

use serde::{Deserialize, Serialize};

use crate::generators::random::DEFAULT_RANDOM_BOUND;
use crate::generators::sequence::DEFAULT_SEQUENCE_START;

/// Width of every generated value, in characters.
pub const VALUE_WIDTH: usize = 16;

/// Zero runs indexed by the number of characters missing from a value.
const PADDING: [&str; VALUE_WIDTH + 1] = [
    "",
    "0",
    "00",
    "000",
    "0000",
    "00000",
    "000000",
    "0000000",
    "00000000",
    "000000000",
    "0000000000",
    "00000000000",
    "000000000000",
    "0000000000000",
    "00000000000000",
    "000000000000000",
    "0000000000000000",
];

/// A stateful value producer, configured once and called many times.
///
/// Implementations must be safe to call from any number of tasks at once.
pub trait ValueGenerator: Send + Sync {
    /// Produce the next value as a fixed-width decimal string.
    fn produce(&self) -> String;
}

/// Left-pad a decimal string with `'0'` up to [`VALUE_WIDTH`].
///
/// Values already `VALUE_WIDTH` characters or longer are returned unchanged.
pub fn pad_value(digits: String) -> String {
    let missing = VALUE_WIDTH.saturating_sub(digits.len());
    if missing == 0 {
        return digits;
    }

    let mut padded = String::with_capacity(VALUE_WIDTH);
    padded.push_str(PADDING[missing]);
    padded.push_str(&digits);
    padded
}

/// Options for the generators backing the placeholder tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// First value handed out for `__seq_int__`.
    pub sequence_start: i64,
    /// Exclusive upper bound for `__rand_range__`. Zero selects [`DEFAULT_RANDOM_BOUND`].
    pub random_range_bound: u64,
    /// Seed for reproducible random values (thread-local RNG when absent).
    pub seed: Option<u64>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            sequence_start: DEFAULT_SEQUENCE_START,
            random_range_bound: 0,
            seed: None,
        }
    }
}

impl GeneratorOptions {
    /// The bound actually used by the `__rand_range__` generator.
    pub fn effective_range_bound(&self) -> u64 {
        if self.random_range_bound == 0 {
            DEFAULT_RANDOM_BOUND
        } else {
            self.random_range_bound
        }
    }
}
