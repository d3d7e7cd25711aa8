//! Plain text rendering of boards and game logs.

// Allow format! with push_str for readability - the allocation overhead is negligible for text rendering
#![allow(clippy::format_push_string)]

use crate::game::{Action, GameState, TurnOutcome, TurnRecord, Zone};
use crate::replay::{Recording, ReplayEngine, ReplayError};

/// Describe one turn in a single line.
///
/// ```text
/// turn 17  Ada (P1, red) rolled 6: token 2 entered at ring 0, captured P3 token 1
/// ```
#[must_use]
pub fn render_turn(state: &GameState, record: &TurnRecord) -> String {
    let who = state.player(record.seat).map_or_else(
        || record.seat.to_string(),
        |p| format!("{} ({}, {})", p.name, p.seat, p.color),
    );
    let mut line = format!("turn {:<4} {who} rolled {}: ", record.turn, record.roll);

    match record.outcome {
        TurnOutcome::Passed => line.push_str("no legal move"),
        TurnOutcome::Moved(outcome) => {
            let verb = if outcome.from == 0 {
                "entered at"
            } else if outcome.reached_home() {
                "reached"
            } else {
                "moved to"
            };
            line.push_str(&format!("token {} {verb} {}", outcome.slot, outcome.cell));
            if let Some(capture) = outcome.capture {
                line.push_str(&format!(
                    ", captured {} token {}",
                    capture.seat, capture.slot
                ));
                if capture.stacked > 0 {
                    line.push_str(&format!(" and {} more", capture.stacked));
                }
            }
        }
    }

    line
}

/// Render every player's tokens and progress.
///
/// ```text
/// P1 Ada        red    start  ring 12  P1 stretch 2  P1 home 3   [1 home]
/// ```
#[must_use]
pub fn render_board(state: &GameState) -> String {
    let mut output = String::new();

    for player in &state.players {
        output.push_str(&format!(
            "{} {:<12} {:<6}",
            player.seat, player.name, player.color
        ));
        for token in &player.tokens {
            let cell = match token.zone() {
                Zone::AtStart => "start".to_string(),
                Zone::OnRing | Zone::OnHomeStretch | Zone::Home => player
                    .token_cell(token.slot)
                    .map_or_else(|| "?".to_string(), |c| c.to_string()),
            };
            output.push_str(&format!(" {cell:<13}"));
        }
        output.push_str(&format!(" [{} home]\n", player.count_in(Zone::Home)));
    }

    output
}

/// Re-play a recording and narrate it, ending with the final board.
///
/// # Errors
///
/// Returns an error if the recording does not re-play cleanly.
pub fn render_game(recording: &Recording) -> Result<String, ReplayError> {
    let mut engine = ReplayEngine::new(recording.clone())?;
    let mut output = format!("=== GAME (seed {}) ===\n\n", recording.seed);

    while !engine.is_finished() {
        let record = engine.step_forward()?;
        output.push_str(&render_turn(engine.state(), &record));
        output.push('\n');
    }

    let state = engine.state();
    output.push_str(&format!(
        "\n=== AFTER {} TURNS, {} ROUNDS ===\n",
        state.turn, state.round
    ));
    output.push_str(&render_board(state));
    match state.winner.and_then(|seat| state.player(seat)) {
        Some(winner) => output.push_str(&format!("\nWinner: {} ({})\n", winner.name, winner.seat)),
        None => output.push_str("\nNo winner\n"),
    }

    Ok(output)
}

/// Short label for an action, used by interactive prompts.
#[must_use]
pub fn describe_action(action: Action) -> String {
    match action {
        Action::Enter => "enter the board".to_string(),
        Action::Advance { from, to } => format!("advance {from} -> {to}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CaptureEvent, Cell, MoveOutcome, RuleSet, Seat};

    #[test]
    fn test_render_pass() {
        let state = GameState::default();
        let record = TurnRecord {
            turn: 3,
            seat: Seat::ALL[2],
            roll: 4,
            outcome: TurnOutcome::Passed,
        };
        let line = render_turn(&state, &record);
        assert!(line.contains("Player 3 (P3, blue)"));
        assert!(line.ends_with("rolled 4: no legal move"));
    }

    #[test]
    fn test_render_capture() {
        let state = GameState::default();
        let record = TurnRecord {
            turn: 1,
            seat: Seat::FIRST,
            roll: 6,
            outcome: TurnOutcome::Moved(MoveOutcome {
                seat: Seat::FIRST,
                slot: 2,
                from: 0,
                to: 1,
                cell: Cell::Ring(0),
                capture: Some(CaptureEvent {
                    seat: Seat::ALL[2],
                    slot: 1,
                    cell: Cell::Ring(0),
                    lost_distance: 27,
                    stacked: 0,
                }),
            }),
        };
        let line = render_turn(&state, &record);
        assert!(line.contains("token 2 entered at ring 0, captured P3 token 1"));
    }

    #[test]
    fn test_render_board() {
        let state = GameState::from_distances(
            [[0, 13, 55, 58], [0; 4], [0; 4], [0; 4]],
            RuleSet::default(),
        );
        let board = render_board(&state);
        let first = board.lines().next().unwrap();
        assert!(first.starts_with("P1 Player 1"));
        assert!(first.contains("ring 12"));
        assert!(first.contains("P1 stretch 2"));
        assert!(first.contains("P1 home 3"));
        assert!(first.ends_with("[1 home]"));
        assert_eq!(board.lines().count(), 4);
    }

    #[test]
    fn test_describe_action() {
        assert_eq!(describe_action(Action::Enter), "enter the board");
        assert_eq!(
            describe_action(Action::Advance { from: 3, to: 9 }),
            "advance 3 -> 9"
        );
    }
}
