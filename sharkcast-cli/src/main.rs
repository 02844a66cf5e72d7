//! SharkCast CLI - command-line interface.
//!
//! This binary provides a command-line interface to the sharkcast library:
//! hotspot grid prediction, telemetry event inspection and simulation, and
//! configuration introspection.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::events::EventsCommands;
use commands::hotspots::HotspotsArgs;

#[derive(Parser)]
#[command(name = "sharkcast")]
#[command(about = "Shark foraging hotspot prediction from satellite covariates", long_about = None)]
#[command(version = sharkcast::VERSION)]
struct Cli {
    /// Enable debug logging (also mirrors log lines to stdout)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the hotspot prediction grid and emit it as JSON
    Hotspots(HotspotsArgs),

    /// Inspect and simulate tag telemetry events
    Events {
        #[command(subcommand)]
        command: EventsCommands,
    },

    /// Show the resolved runtime configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Hotspots(args) => commands::hotspots::run(args, cli.debug),
        Commands::Events { command } => commands::events::run(command, cli.debug),
        Commands::Config => commands::config::run(cli.debug),
    };

    if let Err(err) = result {
        err.exit();
    }
}
