//! Monotonic sequence generator.

use std::sync::atomic::{AtomicI64, Ordering};

use crate::generator::{pad_value, ValueGenerator};

/// Default first value of the sequence.
///
/// Offset far from zero so generated keys do not collide with small
/// hand-inserted fixture keys.
pub const DEFAULT_SEQUENCE_START: i64 = 1_000_000_000_000;

/// Hands out strictly increasing integers, one per call.
///
/// The read-then-increment step is a single atomic operation, so no two
/// callers ever observe the same value. The counter wraps on `i64` overflow.
#[derive(Debug)]
pub struct Sequence {
    next: AtomicI64,
}

impl Sequence {
    /// Create a sequence whose first value is `start`.
    pub fn new(start: i64) -> Self {
        Self {
            next: AtomicI64::new(start),
        }
    }

    /// Claim the next raw value.
    pub fn next_value(&self) -> i64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new(DEFAULT_SEQUENCE_START)
    }
}

impl ValueGenerator for Sequence {
    fn produce(&self) -> String {
        pad_value(self.next_value().to_string())
    }
}
