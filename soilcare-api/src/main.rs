//! soilcare-api - soil degradation prediction service
//!
//! Loads the four persisted training artifacts (sample table, scaler,
//! model, feature-name list) at startup and serves `POST /predict`.
//! Startup errors are fatal: the service never answers with degraded
//! predictions.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use tracing::{info, warn};

use soilcare_api::predict::Predictor;
use soilcare_api::store::FeatureStore;
use soilcare_api::{build_router, AppState};
use soilcare_common::config::{resolve_data_folder, ArtifactPaths};

/// Command-line arguments for soilcare-api
#[derive(Parser, Debug)]
#[command(name = "soilcare-api")]
#[command(about = "Soil degradation prediction service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5000", env = "SOILCARE_PORT")]
    port: u16,

    /// Folder containing the persisted artifacts (overrides
    /// SOILCARE_DATA_FOLDER and the config file)
    #[arg(short, long)]
    data_folder: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting SoilCare prediction service v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let data_folder = resolve_data_folder(args.data_folder.as_deref(), "SOILCARE_DATA_FOLDER");
    info!("Data folder: {}", data_folder.display());

    let paths = ArtifactPaths::in_folder(&data_folder);
    paths.verify_present().context("Artifact check failed")?;

    let predictor = Predictor::load(&paths).context("Failed to load model artifacts")?;
    info!(
        "✓ Loaded model artifacts ({} features)",
        predictor.feature_names().len()
    );

    let store = FeatureStore::load(&paths.samples, predictor.feature_names())
        .context("Failed to load sample table")?;
    if store.is_empty() {
        // Not fatal, but every /predict call will fail with a resolution
        // error until the table has rows.
        warn!("Sample table at {} has no rows", paths.samples.display());
    } else {
        info!("✓ Loaded {} samples", store.len());
    }

    let state = AppState::new(store, predictor);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("soilcare-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
