//! soil-lookup - command-line twin of the prediction endpoint
//!
//! Loads the same four artifacts as the service, resolves the nearest
//! sample to a coordinate given on the command line, and prints the
//! analysis. Useful for spot-checking a deployment without standing up
//! the HTTP server.

use anyhow::{bail, Context, Result};
use clap::Parser;

use soilcare_api::analysis::{classify_degradation, erosion_level, round_to};
use soilcare_api::predict::Predictor;
use soilcare_api::store::FeatureStore;
use soilcare_common::config::{resolve_data_folder, ArtifactPaths};

#[derive(Parser, Debug)]
#[command(name = "soil-lookup")]
#[command(about = "Look up the nearest soil sample and classify its degradation")]
#[command(version)]
struct Args {
    /// Query latitude (degrees)
    lat: f64,

    /// Query longitude (degrees)
    lng: f64,

    /// Folder containing the persisted artifacts (overrides
    /// SOILCARE_DATA_FOLDER and the config file)
    #[arg(short, long)]
    data_folder: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if !args.lat.is_finite() || !args.lng.is_finite() {
        bail!("Coordinates must be finite numbers");
    }

    let data_folder = resolve_data_folder(args.data_folder.as_deref(), "SOILCARE_DATA_FOLDER");
    let paths = ArtifactPaths::in_folder(&data_folder);
    paths.verify_present().context("Artifact check failed")?;

    let predictor = Predictor::load(&paths).context("Failed to load model artifacts")?;
    let store = FeatureStore::load(&paths.samples, predictor.feature_names())
        .context("Failed to load sample table")?;

    let Some(hit) = store.nearest(args.lat, args.lng) else {
        bail!("Sample table at {} has no rows", paths.samples.display());
    };

    let score = predictor.score(&hit.row.features)?;
    let degradation = classify_degradation(score);

    println!("Soil Health Analysis");
    println!("--------------------");
    println!("Searched: {}, {}", args.lat, args.lng);
    println!("Matched:  {}, {}", hit.row.latitude, hit.row.longitude);
    println!("Distance: {} degrees", round_to(hit.distance, 6));
    println!();
    println!("Temperature: {} C", round_to(hit.row.temperature, 1));
    println!("Moisture:    {} %", round_to(hit.row.moisture, 1));
    if let Some(ph) = hit.row.ph {
        println!("pH:          {}", round_to(ph, 2));
    }
    if let Some(om) = hit.row.organic_matter {
        println!("Org. matter: {} %", round_to(om, 2));
    }
    if let Some(compaction) = hit.row.compaction {
        println!("Compaction:  {} g/cm3", round_to(compaction, 2));
    }
    println!();
    println!("Erosion:     {}", erosion_level(score));
    println!(
        "Degradation: {} (level {}, score {})",
        degradation.label, degradation.level, degradation.value
    );
    if let Some(reference) = hit.row.degradation_level {
        println!("Ground truth in table: {}", round_to(reference, 4));
    }

    Ok(())
}
