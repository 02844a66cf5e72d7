//! Habitat scoring models.
//!
//! A scoring model turns one covariate set into a raw habitat score. The
//! pipeline talks to models through the [`ScoringModel`] trait so stub
//! models can stand in during tests; the production implementation is
//! [`ArtifactModel`], deserialized from a JSON export.

mod artifact;

pub use artifact::{ArtifactModel, LinkFunction};

use std::path::PathBuf;

use thiserror::Error;

/// Covariates for one grid point, in the order models are trained on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CovariateSet {
    /// Chlorophyll-a concentration (mg/m^3)
    pub chlorophyll: f64,
    /// Sea surface temperature (deg C)
    pub sst: f64,
}

impl CovariateSet {
    /// Number of features supplied to a model per point.
    pub const WIDTH: usize = 2;

    /// The covariates as a feature vector, training order.
    pub fn as_array(&self) -> [f64; Self::WIDTH] {
        [self.chlorophyll, self.sst]
    }
}

/// Errors raised while loading or evaluating a scoring model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The artifact file does not exist.
    #[error("model artifact not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The artifact file could not be read.
    #[error("failed to read model artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The artifact is not valid JSON for any supported layout.
    #[error("failed to parse model artifact {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The artifact parsed but is structurally unusable.
    #[error("invalid model artifact: {reason}")]
    Invalid { reason: String },

    /// Evaluation produced NaN or an infinity.
    #[error("model produced a non-finite score")]
    NonFiniteScore,
}

/// A trained habitat scoring model.
///
/// Implementations score one point at a time and never panic on strange
/// inputs: evaluation problems surface as [`ModelError`] so the caller
/// can apply its partial-failure policy. Scores are raw model output; the
/// pipeline clamps them to the `[0, 1]` probability range.
pub trait ScoringModel: Send + Sync {
    /// Declared input cardinality, if the artifact records one.
    ///
    /// `None` means the model makes no declaration and the caller
    /// proceeds at its own risk.
    fn expected_input_size(&self) -> Option<usize>;

    /// Score a single covariate set.
    fn predict(&self, covariates: &CovariateSet) -> Result<f64, ModelError>;
}
