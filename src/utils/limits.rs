//! Advisory memory ceiling adjustment
//!
//! Long benchmark runs may need more memory than the process is allowed by
//! default. Raising the ceiling is a request to the host, never a requirement:
//! callers log a failure and carry on.

use crate::error::{BenchError, Result};

const MEGABYTE: u64 = 1024 * 1024;

/// Parse a memory request such as `"512"`, `"512M"` or `"1,024 MB"` into bytes.
///
/// Every non-digit character is dropped and the remaining digits are read as
/// megabytes. Returns `None` when nothing usable is left.
pub fn parse_memory_request(request: &str) -> Option<u64> {
    let digits: String = request.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits
        .parse::<u64>()
        .ok()
        .filter(|&mb| mb > 0)?
        .checked_mul(MEGABYTE)
}

/// Collaborator that applies memory ceiling requests to the host process.
pub trait LimitAdjuster {
    /// Raise the ceiling to at least `bytes` where the platform allows it.
    /// Returns the ceiling in effect afterwards.
    fn raise_memory_limit(&self, bytes: u64) -> Result<u64>;
}

/// Adjusts the limits of the current process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLimits;

impl LimitAdjuster for ProcessLimits {
    fn raise_memory_limit(&self, bytes: u64) -> Result<u64> {
        platform::raise(cap_to_physical(bytes))
    }
}

fn cap_to_physical(bytes: u64) -> u64 {
    let mut sys = sysinfo::System::new();
    sys.refresh_memory();
    match sys.total_memory() {
        0 => bytes,
        total => bytes.min(total),
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
mod platform {
    use super::*;
    use nix::libc::rlim_t;
    use nix::sys::resource::{getrlimit, setrlimit, Resource, RLIM_INFINITY};

    #[derive(Debug, PartialEq, Eq)]
    pub(super) enum SoftLimit {
        Keep(u64),
        Raise(u64),
    }

    /// Decide the new `RLIMIT_AS` soft limit. `None` means unlimited.
    /// The soft limit is never lowered and never exceeds the hard limit.
    pub(super) fn plan_soft_limit(soft: Option<u64>, hard: Option<u64>, bytes: u64) -> SoftLimit {
        match soft {
            None => SoftLimit::Keep(u64::MAX),
            Some(soft) if soft >= bytes => SoftLimit::Keep(soft),
            Some(soft) => {
                let target = hard.map_or(bytes, |hard| bytes.min(hard));
                if target <= soft {
                    SoftLimit::Keep(soft)
                } else {
                    SoftLimit::Raise(target)
                }
            }
        }
    }

    pub(super) fn finite(limit: rlim_t) -> Option<u64> {
        (limit != RLIM_INFINITY).then(|| u64::from(limit))
    }

    pub(super) fn raise(bytes: u64) -> Result<u64> {
        let (soft, hard) =
            getrlimit(Resource::RLIMIT_AS).map_err(|e| BenchError::Limit(e.to_string()))?;

        match plan_soft_limit(finite(soft), finite(hard), bytes) {
            SoftLimit::Keep(current) => Ok(current),
            SoftLimit::Raise(target) => {
                let target_rlim = target.try_into().map_err(|_| {
                    BenchError::Limit(format!("{target} bytes does not fit rlim_t"))
                })?;
                setrlimit(Resource::RLIMIT_AS, target_rlim, hard)
                    .map_err(|e| BenchError::Limit(e.to_string()))?;
                Ok(target)
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        const GIB: u64 = 1024 * MEGABYTE;

        #[test]
        fn test_unlimited_soft_limit_is_kept() {
            assert_eq!(plan_soft_limit(None, None, GIB), SoftLimit::Keep(u64::MAX));
            assert_eq!(plan_soft_limit(None, Some(GIB), 2 * GIB), SoftLimit::Keep(u64::MAX));
        }

        #[test]
        fn test_soft_limit_never_lowered() {
            assert_eq!(plan_soft_limit(Some(4 * GIB), None, GIB), SoftLimit::Keep(4 * GIB));
            assert_eq!(plan_soft_limit(Some(GIB), Some(GIB), GIB), SoftLimit::Keep(GIB));
        }

        #[test]
        fn test_soft_limit_raised_up_to_hard() {
            assert_eq!(plan_soft_limit(Some(GIB), None, 3 * GIB), SoftLimit::Raise(3 * GIB));
            assert_eq!(
                plan_soft_limit(Some(GIB), Some(2 * GIB), 3 * GIB),
                SoftLimit::Raise(2 * GIB)
            );
            assert_eq!(
                plan_soft_limit(Some(2 * GIB), Some(2 * GIB), 3 * GIB),
                SoftLimit::Keep(2 * GIB)
            );
        }

        #[test]
        fn test_process_soft_limit_not_lowered() {
            let (soft_before, hard_before) = getrlimit(Resource::RLIMIT_AS).unwrap();

            let ceiling = ProcessLimits.raise_memory_limit(64 * MEGABYTE).unwrap();

            let (soft_after, hard_after) = getrlimit(Resource::RLIMIT_AS).unwrap();
            assert_eq!(hard_after, hard_before);
            assert_eq!(ceiling, finite(soft_after).unwrap_or(u64::MAX));
            match (finite(soft_before), finite(soft_after)) {
                (None, after) => {
                    assert_eq!(after, None);
                    assert_eq!(ceiling, u64::MAX);
                }
                (Some(_), None) => panic!("soft limit became unlimited"),
                (Some(before), Some(after)) => {
                    assert!(after >= before);
                    if let Some(hard) = finite(hard_after) {
                        assert!(after <= hard);
                    }
                }
            }
        }
    }
}

#[cfg(windows)]
mod platform {
    use super::*;
    use windows_sys::Win32::System::Threading::{
        GetCurrentProcess, GetProcessWorkingSetSize, SetProcessWorkingSetSize,
    };

    pub(super) fn raise(bytes: u64) -> Result<u64> {
        let wanted = usize::try_from(bytes).unwrap_or(usize::MAX);
        let mut min: usize = 0;
        let mut max: usize = 0;
        unsafe {
            let process = GetCurrentProcess();
            if GetProcessWorkingSetSize(process, &mut min, &mut max) == 0 {
                return Err(BenchError::Limit(std::io::Error::last_os_error().to_string()));
            }
            if max >= wanted {
                return Ok(max as u64);
            }
            if SetProcessWorkingSetSize(process, min, wanted) == 0 {
                return Err(BenchError::Limit(std::io::Error::last_os_error().to_string()));
            }
        }
        Ok(wanted as u64)
    }
}

#[cfg(not(any(target_os = "linux", target_os = "android", windows)))]
mod platform {
    use super::*;

    pub(super) fn raise(_bytes: u64) -> Result<u64> {
        Err(BenchError::Limit(
            "memory ceiling adjustment is not supported on this platform".to_string(),
        ))
    }
}
