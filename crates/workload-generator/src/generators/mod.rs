//! Individual value generators.
//!
//! - [`sequence::Sequence`] - process-wide monotonic counter, unique per call
//! - [`random::BoundedRandom`] - uniform samples from `[0, bound)`

pub mod random;
pub mod sequence;
