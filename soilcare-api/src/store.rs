//! In-memory feature store: sample table loading and nearest-row lookup
//!
//! The sample table is loaded once at startup and is immutable afterwards.
//! Distance computation never touches the store; each query works against
//! a call-local minimum, so concurrent lookups cannot interfere.

use soilcare_common::{Error, Result};
use std::collections::HashMap;
use std::path::Path;

/// Required coordinate/reading columns in the sample CSV.
const COL_LATITUDE: &str = "Latitude";
const COL_LONGITUDE: &str = "Longitude";
const COL_TEMPERATURE: &str = "Temperature";
const COL_MOISTURE: &str = "Moisture";

/// Optional raw chemistry / reference columns.
const COL_PH: &str = "pH";
const COL_ORGANIC_MATTER: &str = "Organic Matter";
const COL_COMPACTION: &str = "Compaction";
const COL_DEGRADATION_LEVEL: &str = "Degradation-Level";

/// One geotagged soil sample.
///
/// `features` is materialized at load time in the exact order of the
/// persisted feature-name list; the classifier feeds it to the scaler
/// without any further reordering.
#[derive(Debug, Clone)]
pub struct SampleRow {
    pub latitude: f64,
    pub longitude: f64,
    pub temperature: f64,
    pub moisture: f64,
    pub ph: Option<f64>,
    pub organic_matter: Option<f64>,
    pub compaction: Option<f64>,
    /// Ground-truth label, kept for reference only; never returned as the
    /// prediction.
    pub degradation_level: Option<f64>,
    pub features: Vec<f64>,
}

/// Result of a nearest-sample lookup.
#[derive(Debug, Clone, Copy)]
pub struct NearestMatch<'a> {
    pub row: &'a SampleRow,
    /// Planar Euclidean distance in degrees.
    pub distance: f64,
}

/// Read-only sample table held in memory for the process lifetime.
#[derive(Debug)]
pub struct FeatureStore {
    rows: Vec<SampleRow>,
}

impl FeatureStore {
    /// Load the sample CSV, materializing each row's feature vector in
    /// `feature_names` order.
    ///
    /// Fatal at startup: missing required column, a feature name absent
    /// from the header, or any unparseable numeric cell.
    pub fn load(path: &Path, feature_names: &[String]) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;

        let headers = reader.headers()?.clone();
        let column_index: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim(), i))
            .collect();

        let required = |name: &str| -> Result<usize> {
            column_index.get(name).copied().ok_or_else(|| {
                Error::Config(format!("Sample table missing required column '{}'", name))
            })
        };

        let lat_idx = required(COL_LATITUDE)?;
        let lng_idx = required(COL_LONGITUDE)?;
        let temp_idx = required(COL_TEMPERATURE)?;
        let moist_idx = required(COL_MOISTURE)?;

        let ph_idx = column_index.get(COL_PH).copied();
        let om_idx = column_index.get(COL_ORGANIC_MATTER).copied();
        let comp_idx = column_index.get(COL_COMPACTION).copied();
        let degr_idx = column_index.get(COL_DEGRADATION_LEVEL).copied();

        // Feature columns are resolved once against the header; this is
        // the load-time half of the feature-order compatibility check.
        let mut feature_indices = Vec::with_capacity(feature_names.len());
        for name in feature_names {
            feature_indices.push(column_index.get(name.as_str()).copied().ok_or_else(|| {
                Error::Config(format!(
                    "Feature column '{}' not found in sample table",
                    name
                ))
            })?);
        }

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record?;
            let cell = |idx: usize| -> Result<f64> {
                let raw = record.get(idx).unwrap_or("");
                raw.trim().parse::<f64>().map_err(|_| {
                    Error::Config(format!(
                        "Row {}: column '{}' is not numeric: '{}'",
                        line + 1,
                        headers.get(idx).unwrap_or("?"),
                        raw
                    ))
                })
            };
            let optional_cell = |idx: Option<usize>| -> Result<Option<f64>> {
                idx.map(cell).transpose()
            };

            let mut features = Vec::with_capacity(feature_indices.len());
            for &idx in &feature_indices {
                features.push(cell(idx)?);
            }

            rows.push(SampleRow {
                latitude: cell(lat_idx)?,
                longitude: cell(lng_idx)?,
                temperature: cell(temp_idx)?,
                moisture: cell(moist_idx)?,
                ph: optional_cell(ph_idx)?,
                organic_matter: optional_cell(om_idx)?,
                compaction: optional_cell(comp_idx)?,
                degradation_level: optional_cell(degr_idx)?,
                features,
            });
        }

        Ok(Self { rows })
    }

    /// Build a store directly from rows (tests and fixtures).
    pub fn from_rows(rows: Vec<SampleRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find the sample minimizing planar Euclidean distance to the query.
    ///
    /// Flat-earth approximation, acceptable for a geographically localized
    /// dataset. Ties break to the first row in load order. Returns `None`
    /// only for an empty store.
    pub fn nearest(&self, lat: f64, lng: f64) -> Option<NearestMatch<'_>> {
        let mut best: Option<(usize, f64)> = None;
        for (i, row) in self.rows.iter().enumerate() {
            let dlat = row.latitude - lat;
            let dlng = row.longitude - lng;
            let dist_sq = dlat * dlat + dlng * dlng;
            match best {
                Some((_, best_sq)) if dist_sq >= best_sq => {}
                _ => best = Some((i, dist_sq)),
            }
        }
        best.map(|(i, dist_sq)| NearestMatch {
            row: &self.rows[i],
            distance: dist_sq.sqrt(),
        })
    }
}
