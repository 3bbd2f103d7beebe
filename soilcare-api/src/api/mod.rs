//! HTTP API handlers for soilcare-api

pub mod health;
pub mod predict;

pub use health::health_routes;
pub use predict::predict;
