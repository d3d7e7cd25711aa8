//! Run command implementation.

use std::path::Path;

use clipem::replay::{render_game, Recording};
use clipem::tournament::{run_game, Strategy};

use super::output::{format_text, JsonGameResult};
use super::{load_config, seed_or_clock, CliError, OutputFormat};

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the config is invalid or the game fails to run.
pub(crate) fn execute(
    strategies: &[Strategy],
    seed: Option<u64>,
    config: Option<&Path>,
    format: OutputFormat,
    save: Option<&Path>,
    quiet: bool,
) -> Result<(), CliError> {
    let config = load_config(config)?;
    let seed = seed_or_clock(seed);
    let names: Vec<String> = config.players.iter().map(|p| p.name.clone()).collect();

    if !quiet && format != OutputFormat::Json {
        println!("Running game with seed {seed}...");
        let seats: Vec<String> = names
            .iter()
            .zip(strategies)
            .map(|(name, strategy)| format!("{name} ({strategy})"))
            .collect();
        println!("Players: {}", seats.join(", "));
        println!();
    }

    let result = run_game(seed, strategies, &config)?;
    let recording = Recording::from_result(config, &result);

    if let Some(save_path) = save {
        recording
            .save(save_path)
            .map_err(|e| CliError::new(format!("Failed to save recording: {e}")))?;
        if !quiet && format != OutputFormat::Json {
            println!("Recording saved to: {}", save_path.display());
            println!();
        }
    }

    match format {
        OutputFormat::Text => {
            print!("{}", format_text(&result, &names));
        }
        OutputFormat::Json => {
            let json_result = JsonGameResult::from_game_result(&result, &names);
            let json = serde_json::to_string_pretty(&json_result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
        OutputFormat::Log => {
            print!("{}", render_game(&recording)?);
        }
    }

    Ok(())
}
