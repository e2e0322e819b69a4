//! Bounded uniform random generator.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::generator::{pad_value, ValueGenerator};

/// Bound used for `__rand_int__`, and for `__rand_range__` when no bound is set.
pub const DEFAULT_RANDOM_BOUND: u64 = 10_000_000_000_000_000;

#[derive(Debug)]
enum RandomSource {
    /// Per-thread RNG, no shared state between callers.
    Thread,
    /// Single seeded RNG shared by all callers.
    Seeded(Mutex<StdRng>),
}

impl RandomSource {
    fn sample(&self, bound: u64) -> u64 {
        match self {
            RandomSource::Thread => rand::rng().random_range(0..bound),
            RandomSource::Seeded(rng) => rng
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .random_range(0..bound),
        }
    }
}

/// Draws values uniformly from `[0, bound)`.
///
/// Values are not unique; this is a load generator, not a key allocator.
#[derive(Debug)]
pub struct BoundedRandom {
    bound: u64,
    source: RandomSource,
}

impl BoundedRandom {
    /// Create a generator backed by the thread-local RNG.
    ///
    /// A `bound` of zero selects [`DEFAULT_RANDOM_BOUND`].
    pub fn new(bound: u64) -> Self {
        Self {
            bound: effective_bound(bound),
            source: RandomSource::Thread,
        }
    }

    /// Create a generator with a reproducible stream of values.
    pub fn with_seed(bound: u64, seed: u64) -> Self {
        Self {
            bound: effective_bound(bound),
            source: RandomSource::Seeded(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    /// Exclusive upper bound of generated values.
    pub fn bound(&self) -> u64 {
        self.bound
    }

    /// Draw one raw sample.
    pub fn sample(&self) -> u64 {
        self.source.sample(self.bound)
    }
}

impl Default for BoundedRandom {
    fn default() -> Self {
        Self::new(DEFAULT_RANDOM_BOUND)
    }
}

impl ValueGenerator for BoundedRandom {
    fn produce(&self) -> String {
        pad_value(self.sample().to_string())
    }
}

fn effective_bound(bound: u64) -> u64 {
    if bound == 0 {
        DEFAULT_RANDOM_BOUND
    } else {
        bound
    }
}
