//! Model artifacts and inference
//!
//! The predictor owns the three persisted training artifacts: the ordered
//! feature-name list, the fitted min-max scaler, and the gradient-boosted
//! tree ensemble. Everything is loaded once at startup; inference is pure
//! and deterministic after that.

pub mod gbdt;
pub mod scaler;

pub use gbdt::GbdtModel;
pub use scaler::MinMaxScaler;

use soilcare_common::{ArtifactPaths, Error, Result};
use std::path::Path;

/// Scaler + model + feature ordering, checked for mutual compatibility.
#[derive(Debug)]
pub struct Predictor {
    feature_names: Vec<String>,
    scaler: MinMaxScaler,
    model: GbdtModel,
}

impl Predictor {
    /// Deserialize the three JSON artifacts and verify they agree on the
    /// feature dimension. Any mismatch is fatal at startup; silently
    /// drifted column ordering is exactly the failure this check exists
    /// to catch.
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let feature_names: Vec<String> = read_json(&paths.feature_names)?;
        let scaler = MinMaxScaler::from_file(&paths.scaler)?;
        let model = GbdtModel::from_file(&paths.model)?;
        Self::new(feature_names, scaler, model)
    }

    /// Assemble a predictor from already-deserialized parts, running the
    /// same compatibility check as [`Predictor::load`].
    pub fn new(
        feature_names: Vec<String>,
        scaler: MinMaxScaler,
        model: GbdtModel,
    ) -> Result<Self> {
        if feature_names.is_empty() {
            return Err(Error::Config(
                "Feature-name list is empty".to_string(),
            ));
        }
        if scaler.dimension() != feature_names.len() {
            return Err(Error::Config(format!(
                "Scaler expects {} features but feature-name list has {}",
                scaler.dimension(),
                feature_names.len()
            )));
        }
        if model.num_features() != feature_names.len() {
            return Err(Error::Config(format!(
                "Model expects {} features but feature-name list has {}",
                model.num_features(),
                feature_names.len()
            )));
        }
        Ok(Self {
            feature_names,
            scaler,
            model,
        })
    }

    /// Column names in the exact order the scaler/model were fit on.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Scale a raw feature vector and run the model. Deterministic: the
    /// same input always yields the same score.
    pub fn score(&self, features: &[f64]) -> Result<f64> {
        let scaled = self.scaler.transform(features)?;
        self.model.predict(&scaled)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
