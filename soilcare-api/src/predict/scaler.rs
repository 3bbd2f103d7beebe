//! Fitted min-max feature scaler
//!
//! The per-feature minima and maxima are fixed at training time and
//! persisted alongside the model; at inference time the scaler is a pure
//! affine transform.

use serde::{Deserialize, Serialize};
use soilcare_common::{Error, Result};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScaler {
    data_min: Vec<f64>,
    data_max: Vec<f64>,
}

impl MinMaxScaler {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let scaler: Self = serde_json::from_str(&content)?;
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn from_parts(data_min: Vec<f64>, data_max: Vec<f64>) -> Result<Self> {
        let scaler = Self { data_min, data_max };
        scaler.validate()?;
        Ok(scaler)
    }

    fn validate(&self) -> Result<()> {
        if self.data_min.len() != self.data_max.len() {
            return Err(Error::Config(format!(
                "Scaler min/max arrays disagree in length ({} vs {})",
                self.data_min.len(),
                self.data_max.len()
            )));
        }
        Ok(())
    }

    /// Number of features the scaler was fit on.
    pub fn dimension(&self) -> usize {
        self.data_min.len()
    }

    /// Map each feature to [0, 1] using the training-time range.
    ///
    /// A zero-range feature (constant training column) maps to 0.0 rather
    /// than dividing by zero. A wrong-length input is a prediction error.
    pub fn transform(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.dimension() {
            return Err(Error::Prediction(format!(
                "Feature vector has {} values, scaler expects {}",
                features.len(),
                self.dimension()
            )));
        }
        Ok(features
            .iter()
            .zip(self.data_min.iter().zip(&self.data_max))
            .map(|(&x, (&min, &max))| {
                let range = max - min;
                if range == 0.0 {
                    0.0
                } else {
                    (x - min) / range
                }
            })
            .collect())
    }
}
