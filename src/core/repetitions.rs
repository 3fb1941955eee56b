//! How many times a unit of work is run for one measurement

use crate::error::{BenchError, Result};

/// Repetition count used by [`Repetitions::Default`] unless the config overrides it.
pub const DEFAULT_REPETITIONS: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Repetitions {
    /// Run exactly once.
    #[default]
    Single,
    /// Run the registry's default number of times and record the mean.
    Default,
    /// Run exactly this many times and record the mean.
    Count(u32),
}

impl Repetitions {
    /// Explicit repetition count. Zero, negative and counts above `u32::MAX`
    /// are rejected.
    pub fn count(n: i64) -> Result<Self> {
        if n <= 0 {
            return Err(BenchError::InvalidArgument(format!(
                "repetitions must be positive, got {n}"
            )));
        }
        u32::try_from(n).map(Repetitions::Count).map_err(|_| {
            BenchError::InvalidArgument(format!("repetitions {n} exceeds {}", u32::MAX))
        })
    }

    /// Number of iterations this resolves to, given the registry default.
    pub(crate) fn resolve(self, default: u32) -> Result<u32> {
        let n = match self {
            Repetitions::Single => 1,
            Repetitions::Default => default,
            Repetitions::Count(n) => n,
        };
        if n == 0 {
            return Err(BenchError::InvalidArgument(
                "repetitions must be positive, got 0".to_string(),
            ));
        }
        Ok(n)
    }
}

impl TryFrom<i64> for Repetitions {
    type Error = BenchError;

    fn try_from(n: i64) -> Result<Self> {
        Repetitions::count(n)
    }
}

impl From<std::num::NonZeroU32> for Repetitions {
    fn from(n: std::num::NonZeroU32) -> Self {
        Repetitions::Count(n.get())
    }
}
