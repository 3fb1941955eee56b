//! Description of the machine measurements were taken on

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostInfo {
    pub os: String,
    pub cpu: String,
}

lazy_static::lazy_static! {
    static ref HOST_INFO: HostInfo = HostInfo::detect();
}

impl HostInfo {
    /// Host description, detected once per process.
    pub fn current() -> &'static HostInfo {
        &HOST_INFO
    }

    fn detect() -> Self {
        let info = os_info::get();
        Self {
            os: format!("{} {}", info.os_type(), info.version()),
            cpu: cpu_brand(),
        }
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn cpu_brand() -> String {
    let cpuid = raw_cpuid::CpuId::new();
    cpuid
        .get_processor_brand_string()
        .map(|brand| brand.as_str().trim().to_string())
        .filter(|brand| !brand.is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
fn cpu_brand() -> String {
    "Unknown".to_string()
}

impl fmt::Display for HostInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.cpu, self.os)
    }
}
