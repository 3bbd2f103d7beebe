//! Degradation classification and erosion policy
//!
//! Threshold policy: three categories with boundaries at 1.5 and 2.5,
//! both boundaries belonging to the higher category. The erosion
//! indicator is the ordinal category derived from the same score.

use serde::Serialize;

/// Discrete severity derived from the continuous degradation score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DegradationClass {
    pub level: u8,
    pub label: String,
    /// Score rounded to 2 decimals.
    pub value: f64,
}

/// Classify a degradation score.
///
/// Boundaries are closed on the higher side: exactly 1.5 is Moderate,
/// exactly 2.5 is High.
pub fn classify_degradation(score: f64) -> DegradationClass {
    let (level, label) = if score < 1.5 {
        (1, "Low")
    } else if score < 2.5 {
        (2, "Moderate")
    } else {
        (3, "High")
    };
    DegradationClass {
        level,
        label: label.to_string(),
        value: round_to(score, 2),
    }
}

/// Ordinal erosion indicator derived from the degradation score.
pub fn erosion_level(score: f64) -> &'static str {
    if score < 1.5 {
        "Low"
    } else if score < 2.5 {
        "Moderate"
    } else {
        "High"
    }
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
