//! Hotspots command - run the prediction pipeline and emit the grid.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use sharkcast::pipeline::PredictionRecord;
use sharkcast::service::HotspotService;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the hotspots command.
#[derive(Debug, Args)]
pub struct HotspotsArgs {
    /// Write the JSON records to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Emit only the N highest-scoring cells
    #[arg(long)]
    pub top: Option<usize>,
}

/// Run the hotspots command.
pub fn run(args: HotspotsArgs, debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(debug)?;
    runner.log_startup("hotspots");

    let service = HotspotService::new(runner.settings().clone());
    let records = runner.runtime()?.block_on(service.hotspots())?;

    let selected = select_records(&records, args.top);
    let json = if args.pretty {
        serde_json::to_string_pretty(&selected)?
    } else {
        serde_json::to_string(&selected)?
    };

    match args.output {
        Some(path) => {
            fs::write(&path, &json).map_err(|e| CliError::FileWrite {
                path: path.display().to_string(),
                error: e,
            })?;
            println!("Wrote {} record(s) to {}", selected.len(), path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Select records for output.
///
/// The full set keeps the grid's north-to-south ordering; a `--top`
/// request re-sorts by score so callers get the strongest cells first.
fn select_records(records: &[PredictionRecord], top: Option<usize>) -> Vec<PredictionRecord> {
    match top {
        Some(n) => {
            let mut by_score = records.to_vec();
            by_score.sort_by(|a, b| {
                b.prediction_value
                    .partial_cmp(&a.prediction_value)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            by_score.truncate(n);
            by_score
        }
        None => records.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(latitude: f64, prediction_value: f64) -> PredictionRecord {
        PredictionRecord {
            latitude,
            longitude: 46.23,
            prediction_value,
        }
    }

    #[test]
    fn test_no_top_keeps_grid_order() {
        let records = vec![record(1.0, 0.2), record(0.0, 0.9), record(-1.0, 0.5)];

        let selected = select_records(&records, None);

        assert_eq!(selected, records);
    }

    #[test]
    fn test_top_takes_highest_scores_first() {
        let records = vec![record(1.0, 0.2), record(0.0, 0.9), record(-1.0, 0.5)];

        let selected = select_records(&records, Some(2));

        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].prediction_value, 0.9);
        assert_eq!(selected[1].prediction_value, 0.5);
    }

    #[test]
    fn test_top_larger_than_set_returns_everything() {
        let records = vec![record(1.0, 0.2), record(0.0, 0.9)];

        let selected = select_records(&records, Some(10));

        assert_eq!(selected.len(), 2);
    }
}
