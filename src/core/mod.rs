//! Timer registry
//!
//! [`Benchmark`] runs a unit of work, measures it with the monotonic clock and
//! appends one [`Measurement`] per successful call to its result log.

pub mod config;
pub mod repetitions;

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::core::config::BenchmarkConfig;
use crate::core::repetitions::Repetitions;
use crate::error::{Result, TryTimeError};
use crate::stats::measurement::Measurement;
use crate::utils::host::HostInfo;
use crate::utils::limits::{parse_memory_request, LimitAdjuster, ProcessLimits};

/// Insertion-ordered, append-only log of timing results.
#[derive(Debug, Clone)]
pub struct Benchmark {
    results: Vec<Measurement>,
    default_repetitions: u32,
}

impl Benchmark {
    pub fn new() -> Self {
        Self::with_config(BenchmarkConfig::default())
    }

    /// Build a registry from `config`, asking the process for the configured
    /// memory ceiling if there is one.
    pub fn with_config(config: BenchmarkConfig) -> Self {
        Self::with_limits(config, &ProcessLimits)
    }

    /// Like [`Benchmark::with_config`], with the limit collaborator supplied by
    /// the caller. Limit failures are logged and otherwise ignored.
    pub fn with_limits(config: BenchmarkConfig, limits: &dyn LimitAdjuster) -> Self {
        debug!(host = %HostInfo::current(), "creating benchmark registry");

        if let Some(request) = config.memory_limit.as_deref() {
            match parse_memory_request(request) {
                Some(bytes) => match limits.raise_memory_limit(bytes) {
                    Ok(ceiling) => debug!(requested = bytes, ceiling, "memory ceiling adjusted"),
                    Err(e) => {
                        warn!(requested = bytes, error = %e, "could not raise memory ceiling")
                    }
                },
                None => debug!(request, "ignoring malformed memory request"),
            }
        }

        Self {
            results: Vec::new(),
            default_repetitions: config.default_repetitions,
        }
    }

    /// Time `work` and record the result under `name`.
    ///
    /// With [`Repetitions::Single`] the work runs once and the elapsed time is
    /// recorded as is. Otherwise each iteration is timed on its own and the
    /// mean is recorded. Fails with `InvalidArgument` before running anything
    /// if the repetition count resolves to zero.
    pub fn time<F>(
        &mut self,
        name: &str,
        mut work: F,
        repetitions: Repetitions,
    ) -> Result<&mut Self>
    where
        F: FnMut(),
    {
        let iterations = repetitions.resolve(self.default_repetitions)?;

        let mut total = Duration::ZERO;
        for _ in 0..iterations {
            let start = Instant::now();
            work();
            total += start.elapsed();
        }

        self.record(name, total, iterations);
        Ok(self)
    }

    /// Time fallible `work`. The first error the work returns is handed back
    /// as [`TryTimeError::Work`] and nothing is recorded for the call.
    pub fn try_time<F, E>(
        &mut self,
        name: &str,
        mut work: F,
        repetitions: Repetitions,
    ) -> std::result::Result<&mut Self, TryTimeError<E>>
    where
        F: FnMut() -> std::result::Result<(), E>,
    {
        let iterations = repetitions.resolve(self.default_repetitions)?;

        let mut total = Duration::ZERO;
        for _ in 0..iterations {
            let start = Instant::now();
            let outcome = work();
            total += start.elapsed();
            outcome.map_err(TryTimeError::Work)?;
        }

        self.record(name, total, iterations);
        Ok(self)
    }

    fn record(&mut self, name: &str, total: Duration, iterations: u32) {
        let measurement = Measurement::from_total(name.to_string(), total, iterations);
        debug!(
            name = %measurement.name,
            iterations,
            elapsed_s = measurement.elapsed,
            "recorded measurement"
        );
        self.results.push(measurement);
    }

    /// Every measurement recorded so far, in call order.
    pub fn results(&self) -> &[Measurement] {
        &self.results
    }

    pub fn into_results(self) -> Vec<Measurement> {
        self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn default_repetitions(&self) -> u32 {
        self.default_repetitions
    }

    /// The machine these measurements are being taken on.
    pub fn host(&self) -> &'static HostInfo {
        HostInfo::current()
    }
}

impl Default for Benchmark {
    fn default() -> Self {
        Self::new()
    }
}
