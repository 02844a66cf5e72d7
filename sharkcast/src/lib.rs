//! SharkCast - shark foraging hotspot prediction
//!
//! This library samples environmental covariate rasters (chlorophyll-a and
//! sea surface temperature) over a survey grid, scores every cell with a
//! trained habitat model, and serves the ranked result set through a cached
//! service facade. Tag telemetry persistence and simulation live alongside
//! the prediction core.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides a simplified facade:
//!
//! ```ignore
//! use sharkcast::config::Settings;
//! use sharkcast::service::HotspotService;
//!
//! let settings = Settings::from_env()?;
//! let service = HotspotService::new(settings);
//!
//! // First call computes and caches; later calls share the published set
//! let records = service.hotspots().await?;
//! service.invalidate_cache().await;
//! ```

pub mod cache;
pub mod config;
pub mod grid;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod raster;
pub mod service;
pub mod telemetry;

/// Version of the SharkCast library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
