//! Prediction endpoint: nearest-sample lookup and degradation classification

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::analysis::{classify_degradation, erosion_level, round_to, DegradationClass};
use crate::AppState;

/// Searched vs. matched coordinates, both as [lat, lng].
#[derive(Debug, Serialize)]
pub struct Coordinates {
    pub searched: [f64; 2],
    pub matched: [f64; 2],
}

/// Successful prediction response
#[derive(Debug, Serialize)]
pub struct SoilAnalysisResponse {
    /// Matched sample's temperature, 1 decimal
    pub temperature: f64,
    /// Matched sample's moisture, 1 decimal
    pub moisture: f64,
    /// Ordinal erosion category
    pub erosion: String,
    pub degradation: DegradationClass,
    pub coordinates: Coordinates,
}

/// POST /predict
///
/// Body: `{"lat": <number>, "lng": <number>}`. Values may also arrive as
/// numeric strings (the original contract coerced with `float()`).
pub async fn predict(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<SoilAnalysisResponse>, PredictError> {
    let lat = parse_coordinate(&body, "lat")?;
    let lng = parse_coordinate(&body, "lng")?;

    let hit = state
        .store
        .nearest(lat, lng)
        .ok_or_else(|| PredictError::Resolution("Feature store has no samples".to_string()))?;

    let score = state.predictor.score(&hit.row.features)?;
    let degradation = classify_degradation(score);

    debug!(
        lat,
        lng,
        matched_lat = hit.row.latitude,
        matched_lng = hit.row.longitude,
        distance = hit.distance,
        score,
        "resolved prediction"
    );

    Ok(Json(SoilAnalysisResponse {
        temperature: round_to(hit.row.temperature, 1),
        moisture: round_to(hit.row.moisture, 1),
        erosion: erosion_level(score).to_string(),
        degradation,
        coordinates: Coordinates {
            searched: [lat, lng],
            matched: [hit.row.latitude, hit.row.longitude],
        },
    }))
}

/// Extract a coordinate from the request body, accepting JSON numbers and
/// numeric strings. Non-finite values are rejected: a NaN query would
/// poison every distance comparison.
fn parse_coordinate(body: &Value, key: &str) -> Result<f64, PredictError> {
    let value = body
        .get(key)
        .ok_or_else(|| PredictError::Validation(format!("Missing field '{}'", key)))?;

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(PredictError::Validation(format!(
            "Field '{}' is not a finite number",
            key
        ))),
    }
}

/// Prediction endpoint errors, each with a stable machine-readable code.
#[derive(Debug)]
pub enum PredictError {
    Validation(String),
    Resolution(String),
    Prediction(String),
    Internal(String),
}

impl From<soilcare_common::Error> for PredictError {
    fn from(err: soilcare_common::Error) -> Self {
        use soilcare_common::Error;
        match err {
            Error::Validation(msg) => PredictError::Validation(msg),
            Error::Resolution(msg) => PredictError::Resolution(msg),
            Error::Prediction(msg) => PredictError::Prediction(msg),
            other => PredictError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            PredictError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation", msg),
            PredictError::Resolution(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "resolution", msg)
            }
            PredictError::Prediction(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "prediction", msg)
            }
            PredictError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg),
        };

        let body = Json(json!({
            "error": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}
