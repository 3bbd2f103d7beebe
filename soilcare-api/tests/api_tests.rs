//! Integration tests for the soilcare-api HTTP endpoints
//!
//! Tests cover:
//! - POST /predict success shape, rounding, and matched coordinates
//! - Validation errors (non-numeric / missing coordinates) -> 400
//! - Resolution errors (empty store) -> 500 with stable code
//! - Classification boundary behavior through the full pipeline
//! - Concurrent queries resolving independently
//! - GET /health

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

use soilcare_api::predict::gbdt::{GbdtModel, Node, Tree};
use soilcare_api::predict::{MinMaxScaler, Predictor};
use soilcare_api::store::{FeatureStore, SampleRow};
use soilcare_api::{build_router, AppState};

/// Test fixture: two features, identity scaling (training range [0, 1]),
/// one decision stump on the first feature.
///
/// feature[0] <= 0.5 -> score 1.0 (Low), otherwise score 3.0 (High).
fn test_predictor() -> Predictor {
    let scaler = MinMaxScaler::from_parts(vec![0.0, 0.0], vec![1.0, 1.0]).unwrap();
    let tree = Tree::from_nodes(vec![
        Node::Split {
            feature: 0,
            threshold: 0.5,
            left: 1,
            right: 2,
        },
        Node::Leaf { value: 1.0 },
        Node::Leaf { value: 3.0 },
    ]);
    let model = GbdtModel::from_parts(0.0, 2, vec![tree]);
    Predictor::new(vec!["NDVI".into(), "EVI".into()], scaler, model).unwrap()
}

fn sample(lat: f64, lng: f64, temperature: f64, moisture: f64, f0: f64) -> SampleRow {
    SampleRow {
        latitude: lat,
        longitude: lng,
        temperature,
        moisture,
        ph: None,
        organic_matter: None,
        compaction: None,
        degradation_level: None,
        features: vec![f0, 0.0],
    }
}

fn setup_app(rows: Vec<SampleRow>) -> axum::Router {
    let state = AppState::new(FeatureStore::from_rows(rows), test_predictor());
    build_router(state)
}

fn predict_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

// =============================================================================
// Health Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app(vec![sample(10.0, 20.0, 25.3, 40.0, 0.2)]);

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "soilcare-api");
    assert!(body["version"].is_string());
}

// =============================================================================
// Prediction Success Tests
// =============================================================================

#[tokio::test]
async fn test_predict_resolves_nearest_sample() {
    // Store contains one row at (10.0, 20.0) with temperature 25.3 and
    // moisture 40.0; querying (10.01, 20.01) must resolve to it.
    let app = setup_app(vec![
        sample(10.0, 20.0, 25.3, 40.0, 0.2),
        sample(50.0, 60.0, 31.0, 22.0, 0.9),
    ]);

    let request = predict_request(json!({"lat": 10.01, "lng": 20.01}));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["temperature"], 25.3);
    assert_eq!(body["moisture"], 40.0);
    assert_eq!(body["coordinates"]["searched"], json!([10.01, 20.01]));
    assert_eq!(body["coordinates"]["matched"], json!([10.0, 20.0]));
    assert_eq!(body["erosion"], "Low");
    assert_eq!(body["degradation"]["level"], 1);
    assert_eq!(body["degradation"]["label"], "Low");
    assert_eq!(body["degradation"]["value"], 1.0);
}

#[tokio::test]
async fn test_predict_high_degradation_row() {
    let app = setup_app(vec![
        sample(10.0, 20.0, 25.3, 40.0, 0.2),
        sample(50.0, 60.0, 31.0, 22.0, 0.9),
    ]);

    let request = predict_request(json!({"lat": 49.9, "lng": 60.2}));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["coordinates"]["matched"], json!([50.0, 60.0]));
    assert_eq!(body["erosion"], "High");
    assert_eq!(body["degradation"]["level"], 3);
    assert_eq!(body["degradation"]["label"], "High");
}

#[tokio::test]
async fn test_predict_rounds_readings_to_one_decimal() {
    let app = setup_app(vec![sample(10.0, 20.0, 25.347, 40.04, 0.2)]);

    let request = predict_request(json!({"lat": 10.0, "lng": 20.0}));
    let response = app.oneshot(request).await.unwrap();

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["temperature"], 25.3);
    assert_eq!(body["moisture"], 40.0);
}

#[tokio::test]
async fn test_predict_accepts_numeric_strings() {
    let app = setup_app(vec![sample(10.0, 20.0, 25.3, 40.0, 0.2)]);

    let request = predict_request(json!({"lat": "10.01", "lng": "20.01"}));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["coordinates"]["matched"], json!([10.0, 20.0]));
}

#[tokio::test]
async fn test_predict_is_deterministic_across_calls() {
    let app = setup_app(vec![sample(10.0, 20.0, 25.3, 40.0, 0.2)]);

    let mut values = Vec::new();
    for _ in 0..5 {
        let request = predict_request(json!({"lat": 10.0, "lng": 20.0}));
        let response = app.clone().oneshot(request).await.unwrap();
        let body = extract_json(response.into_body()).await;
        values.push(body["degradation"]["value"].as_f64().unwrap());
    }
    assert!(values.windows(2).all(|w| w[0] == w[1]));
}

// =============================================================================
// Validation Error Tests
// =============================================================================

#[tokio::test]
async fn test_predict_non_numeric_lat_is_400() {
    let app = setup_app(vec![sample(10.0, 20.0, 25.3, 40.0, 0.2)]);

    let request = predict_request(json!({"lat": "abc", "lng": 5}));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert!(!body["error"].as_str().unwrap().is_empty());
    assert_eq!(body["code"], "validation");
}

#[tokio::test]
async fn test_predict_missing_lng_is_400() {
    let app = setup_app(vec![sample(10.0, 20.0, 25.3, 40.0, 0.2)]);

    let request = predict_request(json!({"lat": 10.0}));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("lng"));
    assert_eq!(body["code"], "validation");
}

#[tokio::test]
async fn test_predict_null_coordinate_is_400() {
    let app = setup_app(vec![sample(10.0, 20.0, 25.3, 40.0, 0.2)]);

    let request = predict_request(json!({"lat": null, "lng": 5}));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Resolution Error Tests
// =============================================================================

#[tokio::test]
async fn test_predict_empty_store_is_resolution_error() {
    let app = setup_app(vec![]);

    let request = predict_request(json!({"lat": 10.0, "lng": 20.0}));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["code"], "resolution");
    assert!(!body["error"].as_str().unwrap().is_empty());
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[tokio::test]
async fn test_concurrent_queries_resolve_independently() {
    // Rows spread far apart; each query sits right next to its own row.
    // Concurrent calls must never pick up another call's nearest match.
    let rows: Vec<SampleRow> = (0..8)
        .map(|i| {
            let base = (i * 10) as f64;
            sample(base, base, 20.0 + i as f64, 50.0, 0.2)
        })
        .collect();
    let app = setup_app(rows);

    let mut handles = Vec::new();
    for i in 0..8 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let base = (i * 10) as f64;
            let request = predict_request(json!({"lat": base + 0.01, "lng": base - 0.01}));
            let response = app.oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body = extract_json(response.into_body()).await;
            assert_eq!(body["coordinates"]["matched"], json!([base, base]));
            assert_eq!(body["temperature"], 20.0 + i as f64);
        }));
    }
    for handle in handles {
        handle.await.expect("task should not panic");
    }
}
