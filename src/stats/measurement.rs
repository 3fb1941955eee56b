//! Recorded measurements
//!
//! One entry per successful timing call: the test name, how many iterations
//! ran, and the elapsed seconds (the mean when more than one iteration ran).

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::config::validate_positive_u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub name: String,
    #[serde(deserialize_with = "validate_positive_u32")]
    pub iterations: u32,
    /// Seconds, with sub-second precision.
    #[serde(deserialize_with = "validate_non_negative_f64")]
    pub elapsed: f64,
}

fn validate_non_negative_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(serde::de::Error::custom("Value must be a finite, non-negative number"))
    }
}

impl Measurement {
    /// Builds a measurement from the per-iteration total and the iteration count.
    pub(crate) fn from_total(name: String, total: Duration, iterations: u32) -> Self {
        let mean = total / iterations;
        Self {
            name,
            iterations,
            elapsed: mean.as_secs_f64(),
        }
    }

    /// `None` when `elapsed` has been set to a negative or non-finite value.
    pub fn elapsed_duration(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.elapsed).ok()
    }

    /// Elapsed seconds with ten fixed decimals.
    pub fn formatted_elapsed(&self) -> String {
        format!("{:.10}", self.elapsed)
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.10}s x{}", self.name, self.elapsed, self.iterations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_total() {
        let m = Measurement::from_total("avg".into(), Duration::from_millis(40), 4);
        assert_eq!(m.iterations, 4);
        assert!((m.elapsed - 0.010).abs() < 1e-12);
        assert_eq!(m.elapsed_duration(), Some(Duration::from_millis(10)));
    }

    #[test]
    fn test_formatting() {
        let m = Measurement::from_total("fmt".into(), Duration::from_nanos(1_500), 1);
        assert_eq!(m.formatted_elapsed(), "0.0000015000");
        assert_eq!(m.to_string(), "fmt: 0.0000015000s x1");
    }

    #[test]
    fn test_deserialize_rejects_zero_iterations() {
        let json = r#"{"name":"x","iterations":0,"elapsed":0.5}"#;
        assert!(serde_json::from_str::<Measurement>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_negative_elapsed() {
        let json = r#"{"name":"x","iterations":1,"elapsed":-1.0}"#;
        assert!(serde_json::from_str::<Measurement>(json).is_err());

        let json = r#"{"name":"x","iterations":2,"elapsed":0.25}"#;
        let ok = serde_json::from_str::<Measurement>(json).unwrap();
        assert_eq!(ok.elapsed_duration(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_elapsed_duration_out_of_range() {
        let mut m = Measurement::from_total("bad".into(), Duration::from_millis(1), 1);
        m.elapsed = -1.0;
        assert_eq!(m.elapsed_duration(), None);
        m.elapsed = f64::NAN;
        assert_eq!(m.elapsed_duration(), None);
    }
}
