//! Value generation for the sql-workload driver.
//!
//! This crate produces the values that parameterize every transaction a
//! workload runs, and rewrites statement templates with them.
//!
//! # Architecture
//!
//! ```text
//! GeneratorOptions
//!        │
//!        ▼
//! ┌──────────────────────────┐
//! │       Substituter        │
//! │                          │
//! │  __seq_int__    Sequence │
//! │  __rand_int__   Random   │
//! │  __rand_range__ Random   │
//! └────────────┬─────────────┘
//!              │
//!              ▼
//!     concrete SQL text
//! ```
//!
//! Every generated value is a 16 character, zero-padded decimal string.
//!
//! # Example
//!
//! ```rust
//! use workload_generator::{GeneratorOptions, Substituter};
//!
//! let options = GeneratorOptions {
//!     sequence_start: 1,
//!     ..Default::default()
//! };
//! let substituter = Substituter::from_options(&options);
//!
//! let sql = substituter.substitute("insert into k values('__seq_int__')");
//! assert_eq!(sql, "insert into k values('0000000000000001')");
//! ```

pub mod generator;
pub mod generators;
pub mod placeholder;

// Re-exports for convenience
pub use generator::{pad_value, GeneratorOptions, ValueGenerator, VALUE_WIDTH};
pub use generators::random::{BoundedRandom, DEFAULT_RANDOM_BOUND};
pub use generators::sequence::{Sequence, DEFAULT_SEQUENCE_START};
pub use placeholder::{Placeholder, Substituter};
