//! CLI runner for common setup and operations.
//!
//! Encapsulates settings resolution, logging initialization, and runtime
//! construction to reduce duplication across command handlers.

use sharkcast::config::Settings;
use sharkcast::logging::{default_log_dir, default_log_file, init_logging_full, LoggingGuard};
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Settings resolved from the environment
    settings: Settings,
}

impl CliRunner {
    /// Create a new CLI runner with optional debug logging.
    ///
    /// Stdout log mirroring stays off unless debug mode is requested,
    /// so command output on stdout remains clean JSON.
    ///
    /// # Arguments
    ///
    /// * `debug_mode` - When true, enables debug-level logging regardless of RUST_LOG
    pub fn with_debug(debug_mode: bool) -> Result<Self, CliError> {
        let settings = Settings::from_env()?;

        let logging_guard = init_logging_full(
            default_log_dir(),
            default_log_file(),
            debug_mode,
            debug_mode,
        )
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            settings,
        })
    }

    /// Get the resolved settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("SharkCast v{}", sharkcast::VERSION);
        info!("SharkCast CLI: {} command", command);
    }

    /// Build the async runtime that command handlers block on.
    pub fn runtime(&self) -> Result<tokio::runtime::Runtime, CliError> {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(CliError::Runtime)
    }
}
