//! Events commands - list stored telemetry and generate synthetic events.

use std::fs;

use clap::Subcommand;
use sharkcast::telemetry::{EventStore, TagSimulator, DEFAULT_START_LAT, DEFAULT_START_LON};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Events subcommands.
#[derive(Debug, Subcommand)]
pub enum EventsCommands {
    /// List the most recent telemetry events as JSON
    List {
        /// Maximum number of events to return
        #[arg(long, default_value = "20")]
        limit: usize,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Generate synthetic telemetry events into the store
    Simulate {
        /// Number of simulated tags
        #[arg(long, default_value = "3")]
        tags: usize,

        /// Events to generate per tag
        #[arg(long, default_value = "10")]
        count: usize,

        /// Seed for reproducible runs (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Run an events subcommand.
pub fn run(command: EventsCommands, debug: bool) -> Result<(), CliError> {
    match command {
        EventsCommands::List { limit, pretty } => run_list(limit, pretty, debug),
        EventsCommands::Simulate { tags, count, seed } => run_simulate(tags, count, seed, debug),
    }
}

/// List the newest events from the store.
fn run_list(limit: usize, pretty: bool, debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(debug)?;
    runner.log_startup("events list");

    let store = EventStore::open(&runner.settings().storage.events_db)?;
    let events = store.recent(limit)?;

    let json = if pretty {
        serde_json::to_string_pretty(&events)?
    } else {
        serde_json::to_string(&events)?
    };
    println!("{}", json);

    Ok(())
}

/// Generate and persist synthetic tag events.
fn run_simulate(tags: usize, count: usize, seed: Option<u64>, debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(debug)?;
    runner.log_startup("events simulate");

    let db_path = runner.settings().storage.events_db.clone();
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).map_err(|e| CliError::FileWrite {
            path: parent.display().to_string(),
            error: e,
        })?;
    }
    let store = EventStore::open(&db_path)?;

    let mut inserted = 0usize;
    for tag_index in 0..tags {
        let tag_id = format!("SHK{:03}", tag_index + 1);
        // Spread the tags out slightly around the default start fix.
        let start_lat = DEFAULT_START_LAT + tag_index as f64 * 0.01;
        let start_lon = DEFAULT_START_LON - tag_index as f64 * 0.01;

        let mut simulator = match seed {
            Some(seed) => {
                TagSimulator::with_seed(&tag_id, start_lat, start_lon, seed + tag_index as u64)
            }
            None => TagSimulator::new(&tag_id, start_lat, start_lon),
        };

        for _ in 0..count {
            let event = simulator.next_event();
            store.insert(&event)?;
            inserted += 1;
        }
    }

    println!(
        "Inserted {} event(s) for {} tag(s) into {}",
        inserted,
        tags,
        db_path.display()
    );

    Ok(())
}
