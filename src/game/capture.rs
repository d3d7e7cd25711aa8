//! Move application and capture resolution.
//!
//! Landing on a ring cell held by an opponent sends that token back to its
//! start area. Home-stretch and home cells are private and never
//! contested, the mover's own tokens are never captured, and a capture
//! never triggers a further move.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::game::{
    cell, ring_cell, Action, Candidate, Cell, Distance, InvariantViolation, Player, Seat, Slot,
    Zone, DIE_FACES, HOME_DISTANCE,
};

/// An opponent token sent back to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaptureEvent {
    /// Owner of the captured token.
    pub seat: Seat,
    /// Slot of the captured token.
    pub slot: Slot,
    /// Ring cell the token was captured on.
    pub cell: Cell,
    /// Distance the token had travelled before being reset.
    pub lost_distance: Distance,
    /// Further tokens of the same seat stacked on the cell and reset with
    /// it. Always 0 when own tokens block each other.
    #[serde(default)]
    pub stacked: u8,
}

impl CaptureEvent {
    /// Number of tokens sent back to start.
    #[must_use]
    pub const fn tokens(&self) -> u32 {
        1 + self.stacked as u32
    }
}

/// Result of applying one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// Seat that moved.
    pub seat: Seat,
    /// Slot of the moved token.
    pub slot: Slot,
    /// Distance before the move.
    pub from: Distance,
    /// Distance after the move.
    pub to: Distance,
    /// Cell the token now occupies.
    pub cell: Cell,
    /// The opponent token evicted by this move, if any.
    pub capture: Option<CaptureEvent>,
}

impl MoveOutcome {
    /// Whether the move brought the token out of start.
    #[must_use]
    pub const fn entered(&self) -> bool {
        self.from == 0
    }

    /// Whether the move brought the token home.
    #[must_use]
    pub const fn reached_home(&self) -> bool {
        self.to >= HOME_DISTANCE
    }
}

/// Whether `action` is a move a token at `distance` could make with one roll.
fn fits(action: Action, distance: Distance) -> bool {
    match action {
        Action::Enter => Zone::of(distance) == Zone::AtStart,
        Action::Advance { from, to } => {
            from == distance
                && matches!(Zone::of(from), Zone::OnRing | Zone::OnHomeStretch)
                && to > from
                && to <= HOME_DISTANCE
                && to - from <= DIE_FACES
        }
    }
}

/// Apply `candidate` for `mover` and resolve any capture.
///
/// The candidate must describe the token's current distance and a step one
/// roll can make: entering from start, or advancing a token on the ring or
/// stretch by at most six without passing home. Anything else is rejected
/// without touching the board.
///
/// # Errors
///
/// Returns [`EngineError::InvalidSelection`] if the candidate does not
/// match the token, and [`EngineError::Invariant`] if the landing cell is
/// held by tokens of more than one opponent or a distance is out of range.
pub fn apply_move(
    players: &mut [Player],
    mover: Seat,
    candidate: Candidate,
) -> EngineResult<MoveOutcome> {
    let invalid = EngineError::InvalidSelection {
        seat: mover,
        slot: candidate.slot,
    };

    let from = {
        let player = players
            .iter()
            .find(|p| p.seat == mover)
            .ok_or(invalid.clone())?;
        let token = player
            .tokens
            .get(usize::from(candidate.slot))
            .ok_or(invalid.clone())?;
        if token.distance > HOME_DISTANCE {
            return Err(InvariantViolation {
                message: format!(
                    "{mover} token {} has distance {} > {HOME_DISTANCE}",
                    candidate.slot, token.distance
                ),
            }
            .into());
        }
        if !fits(candidate.action, token.distance) {
            return Err(invalid);
        }
        token.distance
    };

    let to = candidate.action.target();
    let landing = cell(mover, candidate.slot, to);
    let victims = occupants_of(players, mover, landing);
    if let Some(&(owner, _)) = victims.first()
        && victims.iter().any(|&(seat, _)| seat != owner)
    {
        return Err(InvariantViolation {
            message: format!("{landing} is held by several opponents before {mover} moves"),
        }
        .into());
    }

    if let Some(token) = players
        .iter_mut()
        .find(|p| p.seat == mover)
        .and_then(|p| p.tokens.get_mut(usize::from(candidate.slot)))
    {
        token.distance = to;
    }

    // Only a single owner's stack can be hit, so the whole stack goes back
    let mut capture: Option<CaptureEvent> = None;
    for &(seat, slot) in &victims {
        let Some(token) = players
            .iter_mut()
            .find(|p| p.seat == seat)
            .and_then(|p| p.tokens.get_mut(usize::from(slot)))
        else {
            continue;
        };
        let lost_distance = token.distance;
        token.distance = 0;
        match capture.as_mut() {
            Some(first) => first.stacked += 1,
            None => {
                capture = Some(CaptureEvent {
                    seat,
                    slot,
                    cell: landing,
                    lost_distance,
                    stacked: 0,
                });
            }
        }
    }

    Ok(MoveOutcome {
        seat: mover,
        slot: candidate.slot,
        from,
        to,
        cell: landing,
        capture,
    })
}

/// Opponent tokens standing on a contested cell.
fn occupants_of(players: &[Player], mover: Seat, landing: Cell) -> Vec<(Seat, Slot)> {
    let Cell::Ring(target) = landing else {
        return Vec::new();
    };

    players
        .iter()
        .filter(|p| p.seat != mover)
        .flat_map(|p| {
            p.tokens
                .iter()
                .filter(move |t| ring_cell(p.seat, t.distance) == Some(target))
                .map(move |t| (p.seat, t.slot))
        })
        .collect()
}
