//! Resolved settings structs and their compiled defaults.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::grid::{
    GridSpec, DEFAULT_CENTER_LAT, DEFAULT_CENTER_LON, DEFAULT_GRID_SIZE, DEFAULT_SPACING_DEG,
};

// =============================================================================
// Data file defaults
// =============================================================================

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default model artifact file name.
pub const DEFAULT_MODEL_FILE: &str = "habitat_model.json";

/// Default chlorophyll raster file name.
pub const DEFAULT_CHLOROPHYLL_FILE: &str = "chlorophyll_mean.tif";

/// Default sea surface temperature raster file name.
pub const DEFAULT_SST_FILE: &str = "sst_mean.tif";

/// Default tag event database file name.
pub const DEFAULT_EVENTS_DB_FILE: &str = "events.db";

// =============================================================================
// Settings structs
// =============================================================================

/// Fully resolved runtime settings.
///
/// Built from the environment by [`Settings::from_env`](crate::config)
/// or rooted at a directory with [`Settings::in_dir`]. Every path is
/// absolute or relative to the working directory; nothing is resolved
/// lazily after this point.
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    pub data: DataSettings,
    pub grid: GridSettings,
    pub storage: StorageSettings,
}

impl Settings {
    /// Settings rooted at `dir`, every file at its default name.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            data: DataSettings::in_dir(dir),
            grid: GridSettings::default(),
            storage: StorageSettings::in_dir(dir),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::in_dir(DEFAULT_DATA_DIR)
    }
}

/// Locations of the model artifact and covariate rasters.
#[derive(Debug, Clone, Serialize)]
pub struct DataSettings {
    pub data_dir: PathBuf,
    pub model_path: PathBuf,
    pub chlorophyll_path: PathBuf,
    pub sst_path: PathBuf,
}

impl DataSettings {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            data_dir: dir.to_path_buf(),
            model_path: dir.join(DEFAULT_MODEL_FILE),
            chlorophyll_path: dir.join(DEFAULT_CHLOROPHYLL_FILE),
            sst_path: dir.join(DEFAULT_SST_FILE),
        }
    }
}

/// Prediction grid geometry.
#[derive(Debug, Clone, Serialize)]
pub struct GridSettings {
    pub center_lat: f64,
    pub center_lon: f64,
    pub spacing_deg: f64,
    pub size: u32,
}

impl GridSettings {
    pub fn spec(&self) -> GridSpec {
        GridSpec {
            center_lat: self.center_lat,
            center_lon: self.center_lon,
            spacing_deg: self.spacing_deg,
            size: self.size,
        }
    }
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            center_lat: DEFAULT_CENTER_LAT,
            center_lon: DEFAULT_CENTER_LON,
            spacing_deg: DEFAULT_SPACING_DEG,
            size: DEFAULT_GRID_SIZE,
        }
    }
}

/// Location of the tag event database.
#[derive(Debug, Clone, Serialize)]
pub struct StorageSettings {
    pub events_db: PathBuf,
}

impl StorageSettings {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            events_db: dir.as_ref().join(DEFAULT_EVENTS_DB_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_root_under_data_dir() {
        let settings = Settings::default();
        assert_eq!(settings.data.data_dir, PathBuf::from("data"));
        assert_eq!(
            settings.data.model_path,
            PathBuf::from("data").join(DEFAULT_MODEL_FILE)
        );
        assert_eq!(
            settings.storage.events_db,
            PathBuf::from("data").join(DEFAULT_EVENTS_DB_FILE)
        );
    }

    #[test]
    fn test_in_dir_derives_every_path() {
        let settings = Settings::in_dir("/srv/sharkcast");
        assert_eq!(
            settings.data.chlorophyll_path,
            PathBuf::from("/srv/sharkcast").join(DEFAULT_CHLOROPHYLL_FILE)
        );
        assert_eq!(
            settings.data.sst_path,
            PathBuf::from("/srv/sharkcast").join(DEFAULT_SST_FILE)
        );
    }

    #[test]
    fn test_default_grid_matches_grid_constants() {
        let grid = GridSettings::default();
        assert!((grid.center_lat - DEFAULT_CENTER_LAT).abs() < 1e-12);
        assert!((grid.center_lon - DEFAULT_CENTER_LON).abs() < 1e-12);
        assert!((grid.spacing_deg - DEFAULT_SPACING_DEG).abs() < 1e-12);
        assert_eq!(grid.size, DEFAULT_GRID_SIZE);
    }

    #[test]
    fn test_grid_settings_build_the_spec() {
        let grid = GridSettings {
            center_lat: 1.0,
            center_lon: 2.0,
            spacing_deg: 0.5,
            size: 4,
        };
        let spec = grid.spec();
        assert_eq!(spec.size, 4);
        assert!((spec.center_lat - 1.0).abs() < 1e-12);
        assert_eq!(spec.total_points(), 16);
    }
}
