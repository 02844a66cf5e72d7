//! Tag telemetry: event types, durable storage, and a field simulator.
//!
//! Acoustic tags report position, dive depth, acceleration, and water
//! chemistry on every transmission, plus an onboard classification of
//! what the animal is doing. Events are appended to a local SQLite
//! database and read back newest-first.
//!
//! # Key Components
//!
//! - [`TagEvent`] - One telemetry report from a tag
//! - [`EventStore`] - Append-only SQLite storage with newest-first reads
//! - [`TagSimulator`] - Deterministic synthetic tag for development

mod simulator;
mod store;

pub use simulator::{TagSimulator, DEFAULT_START_LAT, DEFAULT_START_LON};
pub use store::{EventStore, StoreError, StoredEvent, MIGRATION_SQL};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Behavior classification transmitted with each event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTrigger {
    /// Routine movement.
    Transiting,
    /// Acceleration burst consistent with a feeding strike.
    PossibleFeeding,
}

impl EventTrigger {
    /// Spelling used in storage and JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            EventTrigger::Transiting => "transiting",
            EventTrigger::PossibleFeeding => "possible_feeding",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s {
            "transiting" => Some(EventTrigger::Transiting),
            "possible_feeding" => Some(EventTrigger::PossibleFeeding),
            _ => None,
        }
    }
}

/// One telemetry report from a tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagEvent {
    pub tag_id: String,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub depth_m: f64,
    /// Three-axis acceleration, g.
    pub acceleration: [f64; 3],
    pub env_temperature_c: f64,
    pub salinity_psu: f64,
    pub battery_level_pct: u8,
    pub event_trigger: EventTrigger,
    /// Classifier confidence in `[0.0, 1.0]`.
    pub event_confidence: f64,
}
