//! Configuration loading and data folder resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Names of the persisted artifacts inside the data folder.
const SAMPLES_FILE: &str = "merged_features.csv";
const MODEL_FILE: &str = "model.json";
const SCALER_FILE: &str = "scaler.json";
const FEATURE_NAMES_FILE: &str = "feature_names.json";

/// Locations of the four persisted artifacts the service consumes.
///
/// All four live in one data folder; the layout is fixed, only the folder
/// moves between deployments.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub samples: PathBuf,
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub feature_names: PathBuf,
}

impl ArtifactPaths {
    pub fn in_folder(folder: &Path) -> Self {
        Self {
            samples: folder.join(SAMPLES_FILE),
            model: folder.join(MODEL_FILE),
            scaler: folder.join(SCALER_FILE),
            feature_names: folder.join(FEATURE_NAMES_FILE),
        }
    }

    /// Verify all four artifacts exist before attempting to parse any of
    /// them. Missing artifacts are fatal at startup.
    pub fn verify_present(&self) -> Result<()> {
        for path in [&self.samples, &self.model, &self.scaler, &self.feature_names] {
            if !path.is_file() {
                return Err(Error::Config(format!(
                    "Missing artifact: {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Data folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file (`data_folder` key)
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_folder(cli_arg: Option<&str>, env_var_name: &str) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = find_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(folder) = config.get("data_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(folder);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_data_folder()
}

/// Get default configuration file path for the platform
fn find_config_file() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/soilcare/config.toml first, then /etc/soilcare/config.toml
        if let Some(path) = dirs::config_dir().map(|d| d.join("soilcare").join("config.toml")) {
            if path.exists() {
                return Ok(path);
            }
        }
        let system_config = PathBuf::from("/etc/soilcare/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
        Err(Error::Config("No config file found".to_string()))
    } else {
        let path = dirs::config_dir()
            .map(|d| d.join("soilcare").join("config.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;
        if path.exists() {
            Ok(path)
        } else {
            Err(Error::Config(format!("Config file not found: {:?}", path)))
        }
    }
}

/// Get OS-dependent default data folder path
fn default_data_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("soilcare"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/soilcare"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("soilcare"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/soilcare"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("soilcare"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\soilcare"))
    } else {
        PathBuf::from("./soilcare_data")
    }
}
