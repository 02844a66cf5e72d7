//! High-level service facade for hotspot predictions.
//!
//! This module wires the prediction pipeline and cache together behind
//! one entry point, following the Facade pattern.
//!
//! # Example
//!
//! ```ignore
//! use sharkcast::config::Settings;
//! use sharkcast::service::HotspotService;
//!
//! let settings = Settings::from_env()?;
//! let service = HotspotService::new(settings);
//!
//! // First call computes; later calls serve the cached records.
//! let records = service.hotspots().await?;
//!
//! // After retraining the artifact, force a recompute.
//! service.invalidate_cache().await;
//! ```

mod facade;

pub use facade::HotspotService;
