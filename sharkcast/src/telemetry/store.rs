//! Queries for the tag_events table, an append-only log of tag reports.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use serde::Serialize;
use tracing::debug;

use super::{EventTrigger, TagEvent};

/// Schema, applied on every open.
///
/// Timestamps are stored as RFC 3339 TEXT with microsecond precision,
/// so lexicographic order is chronological and the timestamp index
/// serves newest-first reads directly.
pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS tag_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tag_id TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    depth_m REAL NOT NULL,
    accel_x REAL NOT NULL,
    accel_y REAL NOT NULL,
    accel_z REAL NOT NULL,
    env_temperature_c REAL NOT NULL,
    salinity_psu REAL NOT NULL,
    battery_level_pct INTEGER NOT NULL,
    event_trigger TEXT NOT NULL,
    event_confidence REAL NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_tag_events_timestamp
    ON tag_events(timestamp DESC);
CREATE INDEX IF NOT EXISTS idx_tag_events_tag
    ON tag_events(tag_id);
"#;

/// Anything that goes wrong talking to the event database.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to open event database: {0}")]
    Open(#[source] rusqlite::Error),

    #[error("event query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// A row that cannot be mapped back to a [`TagEvent`].
    #[error("stored event is corrupt: {reason}")]
    Corrupt { reason: String },
}

/// An event read back from the store, with its row id.
#[derive(Debug, Clone, Serialize)]
pub struct StoredEvent {
    pub id: i64,
    #[serde(flatten)]
    pub event: TagEvent,
}

/// Append-only storage for tag events.
pub struct EventStore {
    conn: Connection,
}

impl EventStore {
    /// Open the event database at `path`, creating and migrating it as
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] if the file cannot be opened; the
    /// parent directory must already exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(StoreError::Open)?;
        conn.execute_batch(MIGRATION_SQL)?;
        debug!(path = %path.display(), "event store opened");
        Ok(Self { conn })
    }

    /// In-memory store for tests and dry runs.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::Open)?;
        conn.execute_batch(MIGRATION_SQL)?;
        Ok(Self { conn })
    }

    /// Append one event. Returns the new row id.
    pub fn insert(&self, event: &TagEvent) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO tag_events (
                tag_id, timestamp, latitude, longitude, depth_m,
                accel_x, accel_y, accel_z,
                env_temperature_c, salinity_psu, battery_level_pct,
                event_trigger, event_confidence
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                event.tag_id,
                event.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
                event.latitude,
                event.longitude,
                event.depth_m,
                event.acceleration[0],
                event.acceleration[1],
                event.acceleration[2],
                event.env_temperature_c,
                event.salinity_psu,
                event.battery_level_pct,
                event.event_trigger.as_str(),
                event.event_confidence,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// The most recent events, newest first. Ties on timestamp break
    /// toward the later insert.
    pub fn recent(&self, limit: usize) -> Result<Vec<StoredEvent>, StoreError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, tag_id, timestamp, latitude, longitude, depth_m,
                    accel_x, accel_y, accel_z,
                    env_temperature_c, salinity_psu, battery_level_pct,
                    event_trigger, event_confidence
             FROM tag_events
             ORDER BY timestamp DESC, id DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(RawEventRow {
                id: row.get(0)?,
                tag_id: row.get(1)?,
                timestamp: row.get(2)?,
                latitude: row.get(3)?,
                longitude: row.get(4)?,
                depth_m: row.get(5)?,
                accel_x: row.get(6)?,
                accel_y: row.get(7)?,
                accel_z: row.get(8)?,
                env_temperature_c: row.get(9)?,
                salinity_psu: row.get(10)?,
                battery_level_pct: row.get(11)?,
                event_trigger: row.get(12)?,
                event_confidence: row.get(13)?,
            })
        })?;

        let mut events = Vec::new();
        for row in rows {
            events.push(row?.into_stored()?);
        }
        Ok(events)
    }

    /// Total stored events.
    pub fn count(&self) -> Result<i64, StoreError> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM tag_events", [], |row| row.get(0))?)
    }
}

/// Column-by-column image of one row, before validation.
struct RawEventRow {
    id: i64,
    tag_id: String,
    timestamp: String,
    latitude: f64,
    longitude: f64,
    depth_m: f64,
    accel_x: f64,
    accel_y: f64,
    accel_z: f64,
    env_temperature_c: f64,
    salinity_psu: f64,
    battery_level_pct: i64,
    event_trigger: String,
    event_confidence: f64,
}

impl RawEventRow {
    fn into_stored(self) -> Result<StoredEvent, StoreError> {
        let timestamp = DateTime::parse_from_rfc3339(&self.timestamp)
            .map_err(|e| StoreError::Corrupt {
                reason: format!("bad timestamp '{}': {}", self.timestamp, e),
            })?
            .with_timezone(&Utc);

        let event_trigger =
            EventTrigger::parse(&self.event_trigger).ok_or_else(|| StoreError::Corrupt {
                reason: format!("unknown event trigger '{}'", self.event_trigger),
            })?;

        let battery_level_pct =
            u8::try_from(self.battery_level_pct).map_err(|_| StoreError::Corrupt {
                reason: format!("battery level {} out of range", self.battery_level_pct),
            })?;

        Ok(StoredEvent {
            id: self.id,
            event: TagEvent {
                tag_id: self.tag_id,
                timestamp,
                latitude: self.latitude,
                longitude: self.longitude,
                depth_m: self.depth_m,
                acceleration: [self.accel_x, self.accel_y, self.accel_z],
                env_temperature_c: self.env_temperature_c,
                salinity_psu: self.salinity_psu,
                battery_level_pct,
                event_trigger,
                event_confidence: self.event_confidence,
            },
        })
    }
}
