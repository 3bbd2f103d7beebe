//! # SoilCare Common Library
//!
//! Shared code for the SoilCare prediction service:
//! - Error taxonomy with stable machine-readable codes
//! - Data folder resolution and artifact path layout

pub mod config;
pub mod error;

pub use config::ArtifactPaths;
pub use error::{Error, Result};
