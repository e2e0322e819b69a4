//! Placeholder substitution for statement templates.
//!
//! Supports placeholders:
//! - `__seq_int__` - next sequence value, unique across all callers
//! - `__rand_int__` - random value below [`DEFAULT_RANDOM_BOUND`]
//! - `__rand_range__` - random value below the configured range bound
//!
//! Each token present in a template is generated once per call, and every
//! occurrence of it receives that same value.
//!
//! [`DEFAULT_RANDOM_BOUND`]: crate::DEFAULT_RANDOM_BOUND

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::generator::{GeneratorOptions, ValueGenerator};
use crate::generators::random::{BoundedRandom, DEFAULT_RANDOM_BOUND};
use crate::generators::sequence::Sequence;

/// A recognized placeholder token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Sequence,
    Random,
    RandomRange,
}

impl Placeholder {
    /// All placeholders, in substitution order.
    pub const ALL: [Placeholder; 3] = [
        Placeholder::Sequence,
        Placeholder::Random,
        Placeholder::RandomRange,
    ];

    /// The literal token as written in templates.
    pub fn token(self) -> &'static str {
        match self {
            Placeholder::Sequence => "__seq_int__",
            Placeholder::Random => "__rand_int__",
            Placeholder::RandomRange => "__rand_range__",
        }
    }

    /// Placeholders occurring in `template`, in substitution order.
    pub fn scan(template: &str) -> Vec<Placeholder> {
        Self::ALL
            .into_iter()
            .filter(|p| template.contains(p.token()))
            .collect()
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Rewrites templates with freshly generated values.
///
/// Cloning is cheap and clones share the same generators.
#[derive(Clone)]
pub struct Substituter {
    sequence: Arc<dyn ValueGenerator>,
    random: Arc<dyn ValueGenerator>,
    random_range: Arc<dyn ValueGenerator>,
}

impl Substituter {
    /// Build a substituter from explicit generators.
    pub fn new(
        sequence: Arc<dyn ValueGenerator>,
        random: Arc<dyn ValueGenerator>,
        random_range: Arc<dyn ValueGenerator>,
    ) -> Self {
        Self {
            sequence,
            random,
            random_range,
        }
    }

    /// Build the standard generator set from options.
    pub fn from_options(options: &GeneratorOptions) -> Self {
        let range_bound = options.effective_range_bound();
        let (random, random_range) = match options.seed {
            Some(seed) => (
                BoundedRandom::with_seed(DEFAULT_RANDOM_BOUND, seed),
                BoundedRandom::with_seed(range_bound, seed.wrapping_add(1)),
            ),
            None => (
                BoundedRandom::new(DEFAULT_RANDOM_BOUND),
                BoundedRandom::new(range_bound),
            ),
        };

        Self::new(
            Arc::new(Sequence::new(options.sequence_start)),
            Arc::new(random),
            Arc::new(random_range),
        )
    }

    fn generator(&self, placeholder: Placeholder) -> &dyn ValueGenerator {
        match placeholder {
            Placeholder::Sequence => self.sequence.as_ref(),
            Placeholder::Random => self.random.as_ref(),
            Placeholder::RandomRange => self.random_range.as_ref(),
        }
    }

    /// Replace every placeholder in `template`.
    ///
    /// Templates without placeholders are returned borrowed, and no generator
    /// is called for them.
    pub fn substitute<'a>(&self, template: &'a str) -> Cow<'a, str> {
        let mut sql = Cow::Borrowed(template);

        for placeholder in Placeholder::ALL {
            let token = placeholder.token();
            if sql.contains(token) {
                let value = self.generator(placeholder).produce();
                sql = Cow::Owned(sql.replace(token, &value));
            }
        }

        sql
    }
}

impl Default for Substituter {
    fn default() -> Self {
        Self::from_options(&GeneratorOptions::default())
    }
}

impl fmt::Debug for Substituter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Substituter").finish_non_exhaustive()
    }
}
