//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use sharkcast::config::ConfigError;
use sharkcast::pipeline::{PredictError, PredictErrorKind};
use sharkcast::telemetry::StoreError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Failed to build the async runtime
    Runtime(std::io::Error),
    /// Configuration error
    Config(ConfigError),
    /// Prediction pipeline failure
    Predict(PredictError),
    /// Event store failure
    Store(StoreError),
    /// Failed to write output file
    FileWrite { path: String, error: std::io::Error },
    /// Failed to serialize command output
    Serialize(serde_json::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Predict(e) if e.kind() == PredictErrorKind::NotFound => {
                eprintln!();
                eprintln!("Make sure the data directory holds the prediction inputs:");
                eprintln!("  1. Model artifact: habitat_model.json (or SHARKCAST_MODEL_PATH)");
                eprintln!(
                    "  2. Chlorophyll raster: chlorophyll_mean.tif (or SHARKCAST_CHLOROPHYLL_PATH)"
                );
                eprintln!("  3. SST raster: sst_mean.tif (or SHARKCAST_SST_PATH)");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Check the SHARKCAST_* environment variables.");
                eprintln!("Run 'sharkcast config' to see the resolved values.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Predict(e) => write!(f, "Prediction failed: {}", e),
            CliError::Store(e) => write!(f, "Event store error: {}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
            CliError::Serialize(e) => write!(f, "Failed to serialize output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Runtime(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::Predict(e) => Some(e),
            CliError::Store(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            CliError::Serialize(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<PredictError> for CliError {
    fn from(e: PredictError) -> Self {
        CliError::Predict(e)
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        CliError::Store(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialize(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_failing_file() {
        let err = CliError::FileWrite {
            path: "out/hotspots.json".to_string(),
            error: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let text = err.to_string();
        assert!(text.contains("out/hotspots.json"));
        assert!(text.contains("denied"));
    }

    #[test]
    fn test_predict_errors_convert_and_keep_their_kind() {
        let err: CliError = PredictError::Task("worker gone".to_string()).into();
        match err {
            CliError::Predict(inner) => assert_eq!(inner.kind(), PredictErrorKind::Io),
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_source_chain_reaches_the_inner_error() {
        use std::error::Error;

        let err = CliError::LoggingInit("no permission".to_string());
        assert!(err.source().is_none());

        let err: CliError = PredictError::Task("worker gone".to_string()).into();
        assert!(err.source().is_some());
    }
}
