//! Game layer for Clip 'Em.
//!
//! Implements the rules on top of a pure track model:
//! - Track geometry (distance to board cell)
//! - Players and their four tokens
//! - Legal move enumeration
//! - Move application and capture resolution
//! - The turn controller state machine
//! - Collaborator seams for dice, selection and presentation

mod capture;
mod collaborators;
mod dice;
mod invariants;
mod moves;
mod player;
mod seating;
mod state;
mod track;
mod turn;

pub use capture::{apply_move, CaptureEvent, MoveOutcome};
pub use collaborators::{
    DieSource, EventSink, GameEvent, NullSink, ScriptedSelection, SelectionRequest,
    SelectionSource,
};
pub use dice::{ScriptedDie, SeededDie};
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use moves::{
    advance_distance, enumerate_moves, Action, Candidate, LegalActionSet, RuleSet, DIE_FACES,
};
pub use player::{Color, Player, Slot, Token};
pub use seating::draw_seating;
pub use state::{GameState, SeatStats};
pub use track::{
    cell, entry_offset, ring_cell, Cell, Distance, Seat, Zone, BOARD_CELLS, ENTRY_SPACING,
    FIRST_STRETCH_DISTANCE, HOME_DISTANCE, LAST_RING_DISTANCE, NUM_PLAYERS, RING_LEN,
    STRETCH_LEN, TOKENS_PER_PLAYER,
};
pub use turn::{
    Phase, RollOutcome, TurnController, TurnOutcome, TurnRecord, MAX_SELECTION_ATTEMPTS,
};
