//! Errors surfaced by a prediction run.

use crate::model::ModelError;
use crate::raster::RasterError;

/// Anything that aborts a prediction run.
///
/// Per-point failures (a missing covariate, a model rejection for one
/// cell) are skipped and counted, not raised. This type covers the
/// failures that invalidate the whole run.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Raster(#[from] RasterError),

    /// The model wants a different number of inputs than the pipeline
    /// supplies. Checked before any raster is opened.
    #[error("model expects {expected} input features but the pipeline supplies {supplied}")]
    FeatureCountMismatch { expected: usize, supplied: usize },

    /// A background task running the pipeline failed to complete.
    #[error("prediction task failed: {0}")]
    Task(String),
}

/// Coarse classification of a [`PredictError`], for callers that map
/// errors onto user-facing outcomes without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictErrorKind {
    /// A required input file does not exist.
    NotFound,
    /// An input exists but is unusable as supplied.
    Validation,
    /// Reading or decoding an input failed.
    Io,
}

impl PredictError {
    pub fn kind(&self) -> PredictErrorKind {
        match self {
            PredictError::Model(ModelError::NotFound { .. })
            | PredictError::Raster(RasterError::NotFound { .. }) => PredictErrorKind::NotFound,

            PredictError::Model(ModelError::Parse { .. })
            | PredictError::Model(ModelError::Invalid { .. })
            | PredictError::Raster(RasterError::Unsupported { .. })
            | PredictError::FeatureCountMismatch { .. } => PredictErrorKind::Validation,

            PredictError::Model(ModelError::Io { .. })
            | PredictError::Model(ModelError::NonFiniteScore)
            | PredictError::Raster(RasterError::Decode { .. })
            | PredictError::Raster(RasterError::Io { .. })
            | PredictError::Task(_) => PredictErrorKind::Io,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == PredictErrorKind::NotFound
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == PredictErrorKind::Validation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_model_classifies_as_not_found() {
        let err = PredictError::from(ModelError::NotFound {
            path: PathBuf::from("/data/habitat_model.json"),
        });
        assert_eq!(err.kind(), PredictErrorKind::NotFound);
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_missing_raster_classifies_as_not_found() {
        let err = PredictError::from(RasterError::NotFound {
            path: PathBuf::from("/data/sst_mean.tif"),
        });
        assert!(err.is_not_found());
    }

    #[test]
    fn test_cardinality_mismatch_classifies_as_validation() {
        let err = PredictError::FeatureCountMismatch {
            expected: 3,
            supplied: 2,
        };
        assert_eq!(err.kind(), PredictErrorKind::Validation);
        assert!(err.is_validation());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_broken_artifact_classifies_as_validation() {
        let err = PredictError::from(ModelError::Invalid {
            reason: "forest has no trees".to_string(),
        });
        assert!(err.is_validation());
    }

    #[test]
    fn test_task_failure_classifies_as_io() {
        let err = PredictError::Task("cancelled".to_string());
        assert_eq!(err.kind(), PredictErrorKind::Io);
    }

    #[test]
    fn test_mismatch_message_names_both_sides() {
        let err = PredictError::FeatureCountMismatch {
            expected: 3,
            supplied: 2,
        };
        let message = err.to_string();
        assert!(message.contains('3'));
        assert!(message.contains('2'));
    }
}
