use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::repetitions::DEFAULT_REPETITIONS;
use crate::error::Result;

// ============================================================================
// CONFIGURATION STRUCTURES
// ============================================================================

/// Registry settings, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BenchmarkConfig {
    /// Advisory memory ceiling request in megabytes, e.g. `"512"` or `"512M"`.
    /// Non-digit characters are ignored; a request with no digits does nothing.
    #[serde(rename = "MemoryLimit", default)]
    pub memory_limit: Option<String>,
    #[serde(
        rename = "DefaultRepetitions",
        default = "default_repetitions",
        deserialize_with = "validate_positive_u32"
    )]
    pub default_repetitions: u32,
}

fn default_repetitions() -> u32 {
    DEFAULT_REPETITIONS
}

pub(crate) fn validate_positive_u32<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = u32::deserialize(deserializer)?;
    if value > 0 {
        Ok(value)
    } else {
        Err(serde::de::Error::custom("Value must be positive"))
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            memory_limit: None,
            default_repetitions: DEFAULT_REPETITIONS,
        }
    }
}

impl BenchmarkConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn with_memory_limit(mut self, request: impl Into<String>) -> Self {
        self.memory_limit = Some(request.into());
        self
    }
}
