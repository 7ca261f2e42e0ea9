//! Fitted standardization transform for the focus/fatigue pair.
//!
//! The scaler artifact carries the mean and scale fitted during training,
//! exported to JSON. Its only job here is to turn raw `[focus, fatigue]`
//! ratings into z-scores for the normalization component score.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Two-feature standardization contract.
///
/// Input and output order is `[focus, fatigue]`.
pub trait Standardizer: Send + Sync {
    /// Standardize a `[focus, fatigue]` pair into z-scores.
    fn transform(&self, values: [f64; 2]) -> [f64; 2];
}

/// Fitted mean/variance standardizer loaded from a JSON artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    /// Fitted means for `[focus, fatigue]`
    pub mean: [f64; 2],
    /// Fitted scales (standard deviations) for `[focus, fatigue]`
    pub scale: [f64; 2],
}

impl StandardScaler {
    /// Load fitted parameters from a JSON file.
    ///
    /// Failure here is startup-fatal; the service does not run without
    /// a usable scaler artifact.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scaler artifact from {:?}", path))?;
        let scaler: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse scaler artifact at {:?}", path))?;

        info!(
            path = %path.display(),
            mean = ?scaler.mean,
            scale = ?scaler.scale,
            "Scaler artifact loaded"
        );

        Ok(scaler)
    }
}

impl Standardizer for StandardScaler {
    fn transform(&self, values: [f64; 2]) -> [f64; 2] {
        let mut out = [0.0; 2];
        for i in 0..2 {
            // A degenerate fitted scale standardizes to 0 rather than
            // dividing by zero.
            out[i] = if self.scale[i] != 0.0 {
                (values[i] - self.mean[i]) / self.scale[i]
            } else {
                0.0
            };
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_transform_standardizes() {
        let scaler = StandardScaler {
            mean: [3.0, 3.0],
            scale: [1.0, 2.0],
        };

        let z = scaler.transform([4.0, 1.0]);
        assert_eq!(z, [1.0, -1.0]);
    }

    #[test]
    fn test_zero_scale_saturates() {
        let scaler = StandardScaler {
            mean: [3.0, 3.0],
            scale: [0.0, 1.0],
        };

        let z = scaler.transform([5.0, 3.0]);
        assert_eq!(z, [0.0, 0.0]);
    }

    #[test]
    fn test_load_from_json_artifact() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"mean": [3.1, 2.9], "scale": [1.2, 1.1]}}"#).unwrap();

        let scaler = StandardScaler::load(file.path()).unwrap();
        assert_eq!(scaler.mean, [3.1, 2.9]);
        assert_eq!(scaler.scale, [1.2, 1.1]);
    }

    #[test]
    fn test_missing_artifact_is_an_error() {
        assert!(StandardScaler::load("no/such/scaler.json").is_err());
    }

    #[test]
    fn test_corrupt_artifact_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(StandardScaler::load(file.path()).is_err());
    }
}
