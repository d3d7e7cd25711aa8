//! Clip 'Em CLI - play, simulate and replay games from the terminal.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use clipem::tournament::Strategy;

/// Clip 'Em - a four-player race-and-capture board game
#[derive(Parser, Debug)]
#[command(name = "clipem")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a hot-seat game on the terminal
    Play {
        /// Table config (TOML); defaults to four players named Player 1-4
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Die seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Draw the seating order at random instead of using config order
        #[arg(long)]
        draw_seats: bool,

        /// Save recording to file
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Run a single game between bots
    Run {
        /// One strategy per seat
        #[arg(required = true, num_args = 4, value_enum)]
        strategies: Vec<Strategy>,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Table config (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: text, json, or log
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Save recording to file
        #[arg(long)]
        save: Option<PathBuf>,

        /// Suppress headers
        #[arg(short, long)]
        quiet: bool,
    },

    /// Replay a recorded game
    Replay {
        /// Recording file (.json)
        #[arg(required = true)]
        recording: PathBuf,

        /// Show the board after this turn instead of the whole game
        #[arg(short, long)]
        turn: Option<u32>,
    },

    /// Run mass parallel games and aggregate statistics
    Tournament {
        /// One strategy per seat
        #[arg(required = true, num_args = 4, value_enum)]
        strategies: Vec<Strategy>,

        /// Number of games to run (default: 1000)
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Starting seed (increments for each game)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Table config (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::TournamentFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Validate a table config file
    CheckConfig {
        /// Config file to validate
        #[arg(required = true)]
        config: PathBuf,

        /// Print the config with every default filled in
        #[arg(long)]
        print: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Play {
            config,
            seed,
            draw_seats,
            save,
        } => cli::play::execute(config.as_deref(), seed, draw_seats, save.as_deref()),

        Commands::Run {
            strategies,
            seed,
            config,
            format,
            save,
            quiet,
        } => cli::run::execute(
            &strategies,
            seed,
            config.as_deref(),
            format,
            save.as_deref(),
            quiet,
        ),

        Commands::Replay { recording, turn } => cli::replay::execute(&recording, turn),

        Commands::Tournament {
            strategies,
            games,
            seed,
            threads,
            config,
            format,
            progress,
        } => cli::tournament::execute(
            &strategies,
            games,
            seed,
            threads,
            config.as_deref(),
            format,
            progress,
        ),

        Commands::CheckConfig { config, print } => cli::check_config::execute(&config, print),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
