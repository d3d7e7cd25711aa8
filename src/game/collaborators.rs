//! Seams between the engine and the outside world.
//!
//! The controller pulls die values and selections through these traits and
//! pushes every state change into an [`EventSink`]. All calls block; there
//! are no timeouts.

use serde::{Deserialize, Serialize};

use crate::game::{Action, Candidate, CaptureEvent, Cell, GameState, LegalActionSet, Seat, Slot};

/// Source of die values.
pub trait DieSource {
    /// Produce the next roll. Values outside `1..=6` are rejected by the
    /// controller.
    fn roll(&mut self) -> u8;
}

/// A pending decision handed to a [`SelectionSource`].
#[derive(Debug, Clone, Copy)]
pub struct SelectionRequest<'a> {
    /// Seat that must choose.
    pub seat: Seat,
    /// Roll being spent.
    pub roll: u8,
    /// Candidates on offer; never empty.
    pub legal: &'a LegalActionSet,
    /// Read-only view of the board.
    pub state: &'a GameState,
}

/// Chooses one candidate from a non-empty legal set.
pub trait SelectionSource {
    /// Pick a candidate. Returning one that is not in `request.legal` makes
    /// the controller ask again.
    fn select(&mut self, request: &SelectionRequest<'_>) -> Candidate;
}

/// Something that happened on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A token moved.
    Moved {
        /// Seat that moved.
        seat: Seat,
        /// Slot of the moved token.
        slot: Slot,
        /// Roll that was spent.
        roll: u8,
        /// Cell the token now occupies.
        cell: Cell,
    },
    /// An opponent token was sent back to start.
    Captured(CaptureEvent),
    /// A seat had no legal move.
    Passed {
        /// Seat that passed.
        seat: Seat,
        /// Roll that could not be used.
        roll: u8,
    },
    /// The round ended with a winner.
    GameOver {
        /// Winning seat.
        winner: Seat,
    },
}

/// Receives board events, e.g. to redraw a display.
pub trait EventSink {
    /// Handle one event.
    fn emit(&mut self, event: &GameEvent);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &GameEvent) {}
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: &GameEvent) {
        self.push(*event);
    }
}

/// Plays back a fixed list of selections by slot.
///
/// Each entry is looked up in the pending legal set; a slot with no
/// candidate is submitted as-is so the controller rejects it.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSelection {
    slots: Vec<Slot>,
    next: usize,
}

impl ScriptedSelection {
    /// Create a source from a list of slots.
    #[must_use]
    pub fn new(slots: impl Into<Vec<Slot>>) -> Self {
        Self {
            slots: slots.into(),
            next: 0,
        }
    }

    /// Selections not yet used.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.slots.len().saturating_sub(self.next)
    }
}

impl SelectionSource for ScriptedSelection {
    fn select(&mut self, request: &SelectionRequest<'_>) -> Candidate {
        let slot = self.slots.get(self.next).copied();
        self.next += 1;

        match slot {
            Some(slot) => request.legal.get(slot).unwrap_or(Candidate {
                slot,
                action: Action::Enter,
            }),
            // Exhausted: fall back to the lowest slot.
            None => request.legal.iter().next().unwrap_or(Candidate {
                slot: 0,
                action: Action::Enter,
            }),
        }
    }
}
