//! Tournament command implementation.

use std::path::Path;
use std::time::Instant;

use clipem::game::NUM_PLAYERS;
use clipem::tournament::{run_game, Strategy};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use super::output::{
    format_tournament_csv, format_tournament_text, JsonTournamentResult, TournamentStats,
};
use super::{load_config, seed_or_clock, CliError, TournamentFormat};

/// Execute the tournament command.
///
/// # Errors
///
/// Returns an error if the config is invalid or output fails.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn execute(
    strategies: &[Strategy],
    games: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    config: Option<&Path>,
    format: TournamentFormat,
    progress: bool,
) -> Result<(), CliError> {
    let config = load_config(config)?;
    if strategies.len() != NUM_PLAYERS {
        return Err(CliError::new(format!(
            "Expected {NUM_PLAYERS} strategies, got {}",
            strategies.len()
        )));
    }
    let names: Vec<String> = strategies.iter().map(ToString::to_string).collect();

    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = seed_or_clock(seed);

    let pb = if progress {
        let style = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})",
            )
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        let pb = ProgressBar::new(games);
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    // Each thread accumulates into its own TournamentStats, merged at the end
    let stats = (0..games)
        .into_par_iter()
        .fold(
            || TournamentStats::new(NUM_PLAYERS),
            |mut local_stats, i| {
                let game_seed = base_seed.wrapping_add(i);
                match run_game(game_seed, strategies, &config) {
                    Ok(result) => local_stats.add_result(&result),
                    Err(e) => {
                        log::warn!("game {game_seed} aborted: {e}");
                        local_stats.add_failure();
                    }
                }
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
                local_stats
            },
        )
        .reduce(
            || TournamentStats::new(NUM_PLAYERS),
            |mut a, b| {
                a.merge(&b);
                a
            },
        );

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        TournamentFormat::Text => {
            println!();
            print!("{}", format_tournament_text(&stats, &names));
            println!();
            println!(
                "Duration: {:.2}s ({:.0} games/sec)",
                duration.as_secs_f64(),
                games_per_sec
            );
        }
        TournamentFormat::Json => {
            let json_result = JsonTournamentResult::from_stats(&stats, &names);
            let json = serde_json::to_string_pretty(&json_result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
        TournamentFormat::Csv => {
            print!("{}", format_tournament_csv(&stats, &names));
        }
    }

    Ok(())
}
