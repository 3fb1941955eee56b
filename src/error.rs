//! Error types for the benchmark registry

use thiserror::Error;

/// Failures raised by the registry itself.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to adjust process limits: {0}")]
    Limit(String),
}

pub type Result<T> = std::result::Result<T, BenchError>;

/// Outcome of timing fallible work: either the registry rejected the call,
/// or the work itself failed and its error is handed back untouched.
#[derive(Debug, Error)]
pub enum TryTimeError<E> {
    #[error(transparent)]
    Bench(#[from] BenchError),

    #[error("unit of work failed: {0}")]
    Work(E),
}

impl<E> TryTimeError<E> {
    /// The work's own error, if that is what stopped the call.
    pub fn into_work(self) -> Option<E> {
        match self {
            TryTimeError::Work(e) => Some(e),
            TryTimeError::Bench(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_error_message_includes_cause() {
        let err: TryTimeError<&str> = TryTimeError::Work("disk full");
        assert_eq!(err.to_string(), "unit of work failed: disk full");

        let err: TryTimeError<&str> = BenchError::InvalidArgument("zero".into()).into();
        assert_eq!(err.to_string(), "invalid argument: zero");
        assert!(err.into_work().is_none());
    }
}
