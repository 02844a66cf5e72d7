//! Config command - print the resolved runtime configuration.
//!
//! Shows the settings the other commands would run with after applying
//! `SHARKCAST_*` environment overrides, as pretty JSON.

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the config command.
pub fn run(debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(debug)?;
    runner.log_startup("config");

    let json = serde_json::to_string_pretty(runner.settings())?;
    println!("{}", json);

    Ok(())
}
