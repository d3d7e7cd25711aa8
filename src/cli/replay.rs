//! Replay command implementation.

use std::path::Path;

use clipem::replay::{render_board, render_game, Recording, ReplayEngine};

use super::CliError;

/// Execute the replay command.
///
/// Without `turn` the whole game is narrated; with it, only the board
/// after that turn is shown.
///
/// # Errors
///
/// Returns an error if the recording cannot be loaded or does not re-play.
pub(crate) fn execute(recording_path: &Path, turn: Option<u32>) -> Result<(), CliError> {
    let recording = Recording::load(recording_path).map_err(|e| {
        CliError::new(format!(
            "Failed to load recording {}: {e}",
            recording_path.display()
        ))
    })?;

    match turn {
        Some(target_turn) => {
            let engine = ReplayEngine::new_at_turn(recording, target_turn)?;
            println!(
                "=== TURN {} OF {} ===",
                engine.turn(),
                engine.recording().turns()
            );
            print!("{}", render_board(engine.state()));
        }
        None => print!("{}", render_game(&recording)?),
    }

    Ok(())
}
