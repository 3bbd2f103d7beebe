//! Gradient-boosted regression tree ensemble
//!
//! Persisted as JSON: a base score plus a list of binary trees, each a
//! flat node array. Split nodes route on `feature <= threshold` to the
//! left child, otherwise right; prediction is the base score plus the sum
//! of the leaf values reached in every tree.

use serde::{Deserialize, Serialize};
use soilcare_common::{Error, Result};
use std::path::Path;

/// One node in a flat tree array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Walk from the root to a leaf. Malformed trees (dangling child
    /// index, out-of-range feature index, or a cycle) are prediction
    /// errors, never panics.
    fn evaluate(&self, features: &[f64]) -> Result<f64> {
        let mut node_idx = 0;
        // A well-formed tree reaches a leaf in fewer steps than it has
        // nodes; anything longer is a cycle.
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(node_idx) {
                Some(Node::Leaf { value }) => return Ok(*value),
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = *features.get(*feature).ok_or_else(|| {
                        Error::Prediction(format!(
                            "Split references feature {} but vector has {}",
                            feature,
                            features.len()
                        ))
                    })?;
                    node_idx = if x <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(Error::Prediction(format!(
                        "Tree references missing node {}",
                        node_idx
                    )))
                }
            }
        }
        Err(Error::Prediction("Tree contains a cycle".to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GbdtModel {
    base_score: f64,
    num_features: usize,
    trees: Vec<Tree>,
}

impl GbdtModel {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn from_parts(base_score: f64, num_features: usize, trees: Vec<Tree>) -> Self {
        Self {
            base_score,
            num_features,
            trees,
        }
    }

    /// Number of features the model was fit on.
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Evaluate the ensemble on a scaled feature vector.
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.num_features {
            return Err(Error::Prediction(format!(
                "Feature vector has {} values, model expects {}",
                features.len(),
                self.num_features
            )));
        }
        let mut score = self.base_score;
        for tree in &self.trees {
            score += tree.evaluate(features)?;
        }
        Ok(score)
    }
}
