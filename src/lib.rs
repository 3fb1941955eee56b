//! Code Benchmark Library
//!
//! Times a unit of work, once or averaged over many repetitions, and keeps
//! every measurement in an insertion-ordered log.
//!
//! ```
//! use code_bench::{Benchmark, Repetitions};
//!
//! let mut bench = Benchmark::new();
//! bench
//!     .time("noop", || {}, Repetitions::Single)?
//!     .time("sum", || { let _ = (0..100u64).sum::<u64>(); }, Repetitions::count(100)?)?;
//!
//! assert_eq!(bench.results().len(), 2);
//! # Ok::<(), code_bench::BenchError>(())
//! ```

pub mod core;
pub mod error;
pub mod stats;
pub mod utils;

pub use crate::core::config::BenchmarkConfig;
pub use crate::core::repetitions::{Repetitions, DEFAULT_REPETITIONS};
pub use crate::core::Benchmark;
pub use error::{BenchError, Result, TryTimeError};
pub use stats::measurement::Measurement;
pub use utils::host::HostInfo;
pub use utils::limits::{parse_memory_request, LimitAdjuster, ProcessLimits};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
