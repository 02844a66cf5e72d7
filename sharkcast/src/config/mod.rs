//! Runtime configuration resolved from the environment.
//!
//! Settings start from compiled defaults, take `SHARKCAST_*`
//! environment overrides, and are validated before use. There is no
//! config file; the service is meant to run with a data directory and
//! at most a handful of overrides.
//!
//! Overrides resolve in two passes: `SHARKCAST_DATA_DIR` re-roots every
//! derived path first, then file-specific variables replace individual
//! paths.
//!
//! # Example
//!
//! ```ignore
//! use sharkcast::config::Settings;
//!
//! let settings = Settings::from_env()?;
//! println!("model: {}", settings.data.model_path.display());
//! ```

mod env;
mod settings;

pub use env::{
    ConfigError, ENV_CHLOROPHYLL_PATH, ENV_DATA_DIR, ENV_EVENTS_DB, ENV_GRID_CENTER_LAT,
    ENV_GRID_CENTER_LON, ENV_GRID_SIZE, ENV_GRID_SPACING_DEG, ENV_MODEL_PATH, ENV_SST_PATH,
};
pub use settings::{
    DataSettings, GridSettings, Settings, StorageSettings, DEFAULT_CHLOROPHYLL_FILE,
    DEFAULT_DATA_DIR, DEFAULT_EVENTS_DB_FILE, DEFAULT_MODEL_FILE, DEFAULT_SST_FILE,
};
