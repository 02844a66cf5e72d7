//! Environment variable overrides and validation.

use std::path::PathBuf;

use super::settings::Settings;

/// Re-roots every derived path before file-specific overrides apply.
pub const ENV_DATA_DIR: &str = "SHARKCAST_DATA_DIR";

/// Overrides the model artifact path.
pub const ENV_MODEL_PATH: &str = "SHARKCAST_MODEL_PATH";

/// Overrides the chlorophyll raster path.
pub const ENV_CHLOROPHYLL_PATH: &str = "SHARKCAST_CHLOROPHYLL_PATH";

/// Overrides the sea surface temperature raster path.
pub const ENV_SST_PATH: &str = "SHARKCAST_SST_PATH";

/// Overrides the tag event database path.
pub const ENV_EVENTS_DB: &str = "SHARKCAST_EVENTS_DB";

/// Overrides the grid center latitude, decimal degrees.
pub const ENV_GRID_CENTER_LAT: &str = "SHARKCAST_GRID_CENTER_LAT";

/// Overrides the grid center longitude, decimal degrees.
pub const ENV_GRID_CENTER_LON: &str = "SHARKCAST_GRID_CENTER_LON";

/// Overrides the grid cell spacing, decimal degrees.
pub const ENV_GRID_SPACING_DEG: &str = "SHARKCAST_GRID_SPACING_DEG";

/// Overrides the grid edge length in cells.
pub const ENV_GRID_SIZE: &str = "SHARKCAST_GRID_SIZE";

/// A setting that cannot be used as supplied.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl Settings {
    /// Resolve settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when an override fails to
    /// parse or the resolved grid geometry is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through an arbitrary key lookup.
    ///
    /// Tests use this to exercise override handling without touching
    /// the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut settings = match lookup(ENV_DATA_DIR) {
            Some(dir) => Settings::in_dir(dir),
            None => Settings::default(),
        };

        if let Some(path) = lookup(ENV_MODEL_PATH) {
            settings.data.model_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_CHLOROPHYLL_PATH) {
            settings.data.chlorophyll_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_SST_PATH) {
            settings.data.sst_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_EVENTS_DB) {
            settings.storage.events_db = PathBuf::from(path);
        }

        if let Some(value) = lookup(ENV_GRID_CENTER_LAT) {
            settings.grid.center_lat = parse_f64(ENV_GRID_CENTER_LAT, &value)?;
        }
        if let Some(value) = lookup(ENV_GRID_CENTER_LON) {
            settings.grid.center_lon = parse_f64(ENV_GRID_CENTER_LON, &value)?;
        }
        if let Some(value) = lookup(ENV_GRID_SPACING_DEG) {
            settings.grid.spacing_deg = parse_f64(ENV_GRID_SPACING_DEG, &value)?;
        }
        if let Some(value) = lookup(ENV_GRID_SIZE) {
            settings.grid.size = parse_u32(ENV_GRID_SIZE, &value)?;
        }

        validate(&settings)?;
        Ok(settings)
    }
}

fn parse_f64(key: &'static str, value: &str) -> Result<f64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: "expected a decimal number".to_string(),
    })
}

fn parse_u32(key: &'static str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: "expected a positive integer".to_string(),
    })
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    let grid = &settings.grid;

    if !grid.center_lat.is_finite() || !(-90.0..=90.0).contains(&grid.center_lat) {
        return Err(ConfigError::InvalidValue {
            key: ENV_GRID_CENTER_LAT,
            value: grid.center_lat.to_string(),
            reason: "latitude must be between -90 and 90".to_string(),
        });
    }
    if !grid.center_lon.is_finite() || !(-180.0..=180.0).contains(&grid.center_lon) {
        return Err(ConfigError::InvalidValue {
            key: ENV_GRID_CENTER_LON,
            value: grid.center_lon.to_string(),
            reason: "longitude must be between -180 and 180".to_string(),
        });
    }
    if !grid.spacing_deg.is_finite() || grid.spacing_deg <= 0.0 {
        return Err(ConfigError::InvalidValue {
            key: ENV_GRID_SPACING_DEG,
            value: grid.spacing_deg.to_string(),
            reason: "spacing must be a positive number of degrees".to_string(),
        });
    }
    if grid.size == 0 {
        return Err(ConfigError::InvalidValue {
            key: ENV_GRID_SIZE,
            value: grid.size.to_string(),
            reason: "grid must be at least 1 cell wide".to_string(),
        });
    }

    Ok(())
}
