//! Play command implementation.
//!
//! Hot-seat play on one terminal: every seat picks its move from stdin.

use std::io::{self, BufRead, Write};
use std::path::Path;

use clipem::game::{
    Candidate, EventSink, GameEvent, SeededDie, SelectionRequest, SelectionSource, TurnController,
};
use clipem::replay::{describe_action, render_board, Recording};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{load_config, seed_or_clock, CliError};

/// Reads each seat's choice from stdin.
#[derive(Debug)]
struct StdinSelection<R> {
    input: R,
}

impl<R: BufRead> StdinSelection<R> {
    fn prompt(request: &SelectionRequest<'_>) {
        let name = request
            .state
            .player(request.seat)
            .map_or("?", |p| p.name.as_str());
        println!("{} ({name}) rolled {}:", request.seat, request.roll);
        for candidate in request.legal.iter() {
            println!(
                "  [{}] token {}: {}",
                candidate.slot + 1,
                candidate.slot + 1,
                describe_action(candidate.action)
            );
        }
        print!("token> ");
        // A failed flush only delays the prompt
        let _ = io::stdout().flush();
    }
}

impl<R: BufRead> SelectionSource for StdinSelection<R> {
    fn select(&mut self, request: &SelectionRequest<'_>) -> Candidate {
        // Only one candidate: nothing to ask
        let mut candidates = request.legal.iter();
        if let (Some(only), None) = (candidates.next(), candidates.next()) {
            println!(
                "{} rolled {}: {}",
                request.seat,
                request.roll,
                describe_action(only.action)
            );
            return only;
        }

        loop {
            Self::prompt(request);
            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    println!("not a legal token, try again");
                    continue;
                }
                Ok(0) | Err(_) => {
                    // Input closed; fall back to the first candidate so the game can finish
                    log::warn!("stdin closed, choosing the first legal move");
                    if let Some(first) = request.legal.iter().next() {
                        return first;
                    }
                }
                Ok(_) => {}
            }
            let chosen = line
                .trim()
                .parse::<u8>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|slot| request.legal.get(slot));
            match chosen {
                Some(candidate) => return candidate,
                None => println!("not a legal token, try again"),
            }
        }
    }
}

/// Seed for the seating draw, kept apart from the die stream.
const fn seating_seed(seed: u64) -> u64 {
    seed.rotate_left(32) ^ 0x9E37_79B9_7F4A_7C15
}

/// Prints board events as they happen.
#[derive(Debug, Clone, Copy)]
struct PrintSink;

impl EventSink for PrintSink {
    fn emit(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Moved { seat, slot, cell, .. } => {
                println!("  {seat} token {} -> {cell}", slot + 1);
            }
            GameEvent::Captured(capture) => {
                println!(
                    "  captured {} token {} at {}",
                    capture.seat,
                    capture.slot + 1,
                    capture.cell
                );
            }
            GameEvent::Passed { seat, roll } => {
                println!("{seat} rolled {roll}: no legal move");
            }
            GameEvent::GameOver { winner } => {
                println!();
                println!("*** {winner} wins ***");
            }
        }
    }
}

fn print_winner(controller: &TurnController) {
    let state = controller.state();
    match controller.winner() {
        Some(winner) => {
            let name = state.player(winner).map_or("?", |p| p.name.as_str());
            println!("Winner: {winner} ({name}) after {} turns", state.turn);
        }
        None => println!("No winner after {} turns", state.turn),
    }
}

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the config is invalid, the engine rejects a turn, or
/// the recording cannot be saved.
pub(crate) fn execute(
    config: Option<&Path>,
    seed: Option<u64>,
    draw_seats: bool,
    save: Option<&Path>,
) -> Result<(), CliError> {
    let mut config = load_config(config)?;
    let seed = seed_or_clock(seed);
    if draw_seats {
        config = config.seated(&mut StdRng::seed_from_u64(seating_seed(seed)))?;
    }

    let mut controller = TurnController::new(config.build_state()?)?;
    println!("Clip 'Em (seed {seed})");
    print!("{}", render_board(controller.state()));
    println!();

    let mut die = SeededDie::new(seed);
    let stdin = io::stdin();
    let mut selector = StdinSelection {
        input: stdin.lock(),
    };
    let log = controller.play_to_end(&mut die, &mut selector, &mut PrintSink, config.max_turns)?;

    println!();
    print!("{}", render_board(controller.state()));
    print_winner(&controller);

    if let Some(path) = save {
        let recording = Recording {
            seed,
            config,
            strategies: Vec::new(),
            log,
        };
        recording.save(path)?;
        println!("Recording saved to: {}", path.display());
    }

    Ok(())
}
