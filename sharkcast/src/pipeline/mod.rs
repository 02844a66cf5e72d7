//! Habitat prediction pipeline.
//!
//! This module turns a grid specification, two covariate rasters, and a
//! scoring model into a sorted set of prediction records.
//!
//! # Flow
//!
//! ```text
//! GridSpec → Grid Points → Sample Chlorophyll + SST → Score → Clamp → Sort → PredictionOutcome
//! ```
//!
//! # Error Handling
//!
//! The run follows an optimistic strategy: a grid point with a missing
//! covariate or a per-point model rejection is skipped and counted, and
//! the run carries on. Only failures that poison the whole run abort it:
//! a missing or broken artifact, an unreadable raster, or a model whose
//! declared input cardinality does not match what the pipeline supplies.
//! The cardinality check runs before any raster is opened.

mod error;

pub use error::{PredictError, PredictErrorKind};

use std::cmp::Ordering;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::grid::{GridPoint, GridSpec};
use crate::model::{ArtifactModel, CovariateSet, ModelError, ScoringModel};
use crate::raster::GeoTiffRaster;

/// Log a progress line after this many scored points.
const PROGRESS_INTERVAL: usize = 100;

/// One scored grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub latitude: f64,
    pub longitude: f64,
    /// Habitat suitability in `[0.0, 1.0]`.
    pub prediction_value: f64,
}

/// Counters describing one prediction run.
#[derive(Debug, Clone, Copy)]
pub struct RunStats {
    /// Grid cells visited.
    pub total_points: usize,
    /// Cells that produced a record.
    pub valid: usize,
    /// Cells skipped because a covariate was absent.
    pub skipped_missing: usize,
    /// Cells skipped because the model rejected them.
    pub skipped_model: usize,
    pub elapsed: Duration,
}

impl RunStats {
    /// Total cells that produced no record.
    pub fn skipped(&self) -> usize {
        self.skipped_missing + self.skipped_model
    }
}

/// The product of one prediction run.
#[derive(Debug, Clone)]
pub struct PredictionOutcome {
    /// Records sorted north-to-south, then west-to-east.
    pub records: Vec<PredictionRecord>,
    /// Token identifying the artifact and grid this run was built from.
    pub generation: String,
    pub stats: RunStats,
}

/// Scores every cell of a prediction grid against two covariate rasters.
#[derive(Debug, Clone)]
pub struct PredictionPipeline {
    model_path: PathBuf,
    chlorophyll_path: PathBuf,
    sst_path: PathBuf,
    grid: GridSpec,
}

impl PredictionPipeline {
    pub fn new(
        model_path: impl Into<PathBuf>,
        chlorophyll_path: impl Into<PathBuf>,
        sst_path: impl Into<PathBuf>,
        grid: GridSpec,
    ) -> Self {
        Self {
            model_path: model_path.into(),
            chlorophyll_path: chlorophyll_path.into(),
            sst_path: sst_path.into(),
            grid,
        }
    }

    /// Run the pipeline to completion.
    ///
    /// Blocking: decodes both rasters into memory and scores the full
    /// grid. Callers on an async runtime should wrap this in
    /// `spawn_blocking`.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::FeatureCountMismatch`] before opening any
    /// raster when the artifact declares an input width other than
    /// [`CovariateSet::WIDTH`]. Missing or undecodable inputs surface as
    /// the corresponding model or raster error. A run in which every
    /// cell is skipped is not an error; it yields an empty record set.
    pub fn run(&self) -> Result<PredictionOutcome, PredictError> {
        let start = Instant::now();
        let total_points = self.grid.total_points();

        info!(
            model = %self.model_path.display(),
            grid_size = self.grid.size,
            total_points,
            "starting prediction run"
        );

        // Stage 1: Load the artifact and check its input cardinality
        // before touching any raster.
        let model = ArtifactModel::load(&self.model_path)?;
        match model.expected_input_size() {
            Some(expected) if expected != CovariateSet::WIDTH => {
                return Err(PredictError::FeatureCountMismatch {
                    expected,
                    supplied: CovariateSet::WIDTH,
                });
            }
            None => {
                warn!("model artifact does not declare its input cardinality; proceeding");
            }
            _ => {}
        }

        // Stage 2: Sample both covariate bands across the grid.
        let chlorophyll = GeoTiffRaster::open(&self.chlorophyll_path)?;
        let sea_surface_temp = GeoTiffRaster::open(&self.sst_path)?;

        let points: Vec<GridPoint> = self.grid.points().collect();
        let chlorophyll_samples = chlorophyll.sample_points(&points);
        let sst_samples = sea_surface_temp.sample_points(&points);

        // Both bands are sampled; the decoded rasters are not needed
        // past this point.
        drop(chlorophyll);
        drop(sea_surface_temp);

        // Stage 3: Score each cell, skipping cells with absent data and
        // cells the model rejects.
        let mut records = Vec::with_capacity(points.len());
        let mut skipped_missing = 0usize;
        let mut skipped_model = 0usize;

        for (index, point) in points.iter().enumerate() {
            if (index + 1) % PROGRESS_INTERVAL == 0 {
                debug!(processed = index + 1, total = total_points, "scored grid points");
            }

            let covariates = match (chlorophyll_samples[index], sst_samples[index]) {
                (Some(chlorophyll), Some(sst)) => CovariateSet { chlorophyll, sst },
                _ => {
                    skipped_missing += 1;
                    continue;
                }
            };

            let score = match model.predict(&covariates) {
                Ok(score) => score,
                Err(e) => {
                    skipped_model += 1;
                    warn!(
                        latitude = point.latitude,
                        longitude = point.longitude,
                        error = %e,
                        "model rejected grid point, skipping"
                    );
                    continue;
                }
            };

            records.push(PredictionRecord {
                latitude: point.latitude,
                longitude: point.longitude,
                prediction_value: score.clamp(0.0, 1.0),
            });
        }

        // Stage 4: Order north-to-south, ties west-to-east.
        sort_records(&mut records);

        let generation = self.artifact_generation(total_points)?;

        if records.is_empty() {
            warn!("prediction run produced no records; every grid point was skipped");
        }

        let stats = RunStats {
            total_points,
            valid: records.len(),
            skipped_missing,
            skipped_model,
            elapsed: start.elapsed(),
        };

        info!(
            total = stats.total_points,
            valid = stats.valid,
            skipped_missing = stats.skipped_missing,
            skipped_model = stats.skipped_model,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            generation = %generation,
            "prediction run complete"
        );

        Ok(PredictionOutcome {
            records,
            generation,
            stats,
        })
    }

    /// Token tying a record set to the artifact file and grid that
    /// produced it. Changes when the artifact is retrained in place.
    fn artifact_generation(&self, total_points: usize) -> Result<String, PredictError> {
        let metadata = fs::metadata(&self.model_path).map_err(|e| ModelError::Io {
            path: self.model_path.clone(),
            source: e,
        })?;
        let mtime_secs = metadata
            .modified()
            .map_err(|e| ModelError::Io {
                path: self.model_path.clone(),
                source: e,
            })?
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Ok(format!("{}-{}", mtime_secs, total_points))
    }
}

/// Descending latitude, then ascending longitude.
fn sort_records(records: &mut [PredictionRecord]) {
    records.sort_by(|a, b| {
        b.latitude
            .partial_cmp(&a.latitude)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                a.longitude
                    .partial_cmp(&b.longitude)
                    .unwrap_or(Ordering::Equal)
            })
    });
}
