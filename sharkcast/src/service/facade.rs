//! Hotspot service facade implementation.

use std::sync::Arc;

use tokio::task;
use tracing::debug;

use crate::cache::PredictionCache;
use crate::config::Settings;
use crate::pipeline::{PredictError, PredictionPipeline, PredictionRecord};

/// High-level facade for hotspot prediction.
///
/// Owns the prediction cache and builds a [`PredictionPipeline`] from
/// the resolved settings on demand. Callers share one service value
/// (typically behind an `Arc`); every consumer then sees the same
/// cached record set.
pub struct HotspotService {
    settings: Settings,
    cache: PredictionCache,
}

impl HotspotService {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            cache: PredictionCache::new(),
        }
    }

    /// Get the resolved settings the service was built with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Return the current prediction records, computing them on first
    /// call.
    ///
    /// The pipeline run is blocking (raster decode plus a full grid
    /// scoring pass), so it executes on the blocking thread pool. The
    /// cache guarantees at most one run regardless of how many callers
    /// arrive together; everyone shares one immutable record set.
    ///
    /// # Errors
    ///
    /// Propagates [`PredictError`] from the pipeline. A failed run is
    /// not cached; the next call starts fresh.
    pub async fn hotspots(&self) -> Result<Arc<[PredictionRecord]>, PredictError> {
        let pipeline = self.pipeline();
        self.cache
            .get_or_compute(|| async move {
                task::spawn_blocking(move || pipeline.run())
                    .await
                    .map_err(|e| PredictError::Task(e.to_string()))?
            })
            .await
    }

    /// Drop the cached records so the next call recomputes.
    ///
    /// Call this after replacing the model artifact or either covariate
    /// raster on disk.
    pub async fn invalidate_cache(&self) {
        debug!("cache invalidation requested");
        self.cache.invalidate().await;
    }

    pub async fn cache_populated(&self) -> bool {
        self.cache.is_populated().await
    }

    /// Generation token of the cached records, if any.
    pub async fn cache_generation(&self) -> Option<String> {
        self.cache.generation().await
    }

    fn pipeline(&self) -> PredictionPipeline {
        PredictionPipeline::new(
            &self.settings.data.model_path,
            &self.settings.data.chlorophyll_path,
            &self.settings.data.sst_path,
            self.settings.grid.spec(),
        )
    }
}
