//! Board invariants - sanity checks that detect engine bugs.
//!
//! In a correctly implemented game these never trigger. The turn
//! controller runs them on the starting board and after every applied
//! move, and reports the first violation as an engine error.

use crate::game::{GameState, Seat, Slot, BOARD_CELLS, HOME_DISTANCE, NUM_PLAYERS};

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all board invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    if state.players.len() != NUM_PLAYERS {
        violations.push(InvariantViolation {
            message: format!(
                "Table has {} players, expected {NUM_PLAYERS}",
                state.players.len()
            ),
        });
    }

    let mut occupants: Vec<Vec<(Seat, Slot)>> = vec![Vec::new(); BOARD_CELLS];

    for (index, player) in state.players.iter().enumerate() {
        if player.seat.index() != index {
            violations.push(InvariantViolation {
                message: format!("{} sits at table position {index}", player.seat),
            });
        }

        for (position, token) in player.tokens.iter().enumerate() {
            if usize::from(token.slot) != position {
                violations.push(InvariantViolation {
                    message: format!(
                        "{} token at position {position} carries slot {}",
                        player.seat, token.slot
                    ),
                });
                continue;
            }

            if token.distance > HOME_DISTANCE {
                violations.push(InvariantViolation {
                    message: format!(
                        "{} token {} has distance {} > {HOME_DISTANCE}",
                        player.seat, token.slot, token.distance
                    ),
                });
                continue;
            }

            if let Some(cell) = player
                .token_cell(token.slot)
                .and_then(|c| occupants.get_mut(c.board_index()))
            {
                cell.push((player.seat, token.slot));
            }
        }
    }

    // Shared cells
    for (index, held) in occupants.iter().enumerate() {
        if held.len() < 2 {
            continue;
        }
        let single_owner = held.iter().all(|(seat, _)| *seat == held[0].0);
        if single_owner && !state.rules.block_own_tokens {
            continue;
        }

        let holders: Vec<String> = held
            .iter()
            .map(|(seat, slot)| format!("{seat}#{slot}"))
            .collect();
        let cell = crate::game::Cell::from_board_index(index)
            .map_or_else(|| format!("board cell {index}"), |c| c.to_string());
        violations.push(InvariantViolation {
            message: format!("Cell {cell} held by {}", holders.join(", ")),
        });
    }

    violations
}

/// Assert all board invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &GameState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Board invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &GameState) {}
