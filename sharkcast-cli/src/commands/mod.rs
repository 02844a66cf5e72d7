//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Show the resolved runtime configuration
//! - [`events`] - Telemetry event listing and simulation
//! - [`hotspots`] - Prediction grid computation and output

pub mod config;
pub mod events;
pub mod hotspots;
