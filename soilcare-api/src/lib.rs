//! soilcare-api library - soil degradation prediction service
//!
//! Resolves the nearest geotagged soil sample to a query coordinate and
//! classifies its predicted degradation. All state is loaded once at
//! startup and shared read-only across requests.

use axum::Router;
use std::sync::Arc;

use crate::predict::Predictor;
use crate::store::FeatureStore;

pub mod analysis;
pub mod api;
pub mod predict;
pub mod store;

/// Application state shared across HTTP handlers.
///
/// Both halves are immutable after startup, so cloning the state is two
/// `Arc` bumps and concurrent readers are safe by construction.
#[derive(Clone)]
pub struct AppState {
    /// Geotagged sample table (read-only)
    pub store: Arc<FeatureStore>,
    /// Scaler + model + feature ordering (read-only)
    pub predictor: Arc<Predictor>,
}

impl AppState {
    /// Create new application state
    pub fn new(store: FeatureStore, predictor: Predictor) -> Self {
        Self {
            store: Arc::new(store),
            predictor: Arc::new(predictor),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::post;
    use tower_http::cors::CorsLayer;
    use tower_http::trace::TraceLayer;

    Router::new()
        .route("/predict", post(api::predict))
        .merge(api::health_routes())
        // The original backend serves browsers from other origins.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
