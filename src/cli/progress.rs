//! Progress command implementation - shows or clears saved progress.

use super::{CliError, OutputFormat};
use gatewalk::maze::{ProgressRecord, StoredGate};
use gatewalk::storage::{gatewalk_data_dir, FileStore, STORE_FILE};
use serde::Serialize;
use std::path::PathBuf;

/// JSON view of the saved progress.
#[derive(Serialize)]
struct ProgressReport<'a> {
    level: u32,
    score: u32,
    lives: u8,
    gates_solved: usize,
    gates: &'a [StoredGate],
}

/// Execute the progress command.
///
/// # Errors
///
/// Returns an error if the data directory cannot be resolved or JSON
/// serialization fails.
pub(crate) fn execute(
    format: OutputFormat,
    data_dir: Option<PathBuf>,
    clear: bool,
) -> Result<(), CliError> {
    let dir = match data_dir {
        Some(dir) => dir,
        None => gatewalk_data_dir()?,
    };
    let mut store = FileStore::open(dir.join(STORE_FILE));

    if clear {
        ProgressRecord::clear(&mut store);
        println!("Progress cleared.");
        return Ok(());
    }

    let record = ProgressRecord::load(&store);
    match format {
        OutputFormat::Text => {
            println!("Level: {}", record.level);
            println!("Score: {}", record.score);
            println!("Lives: {}", record.lives);
            println!("Gates solved: {}", record.solved());
            for gate in &record.gates {
                let state = if gate.unlocked { "unlocked" } else { "locked" };
                println!("  ({}, {}) {state}", gate.x, gate.y);
            }
        }
        OutputFormat::Json => {
            let report = ProgressReport {
                level: record.level,
                score: record.score,
                lives: record.lives,
                gates_solved: record.solved(),
                gates: &record.gates,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
