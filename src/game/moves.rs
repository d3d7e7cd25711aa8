//! Legal move enumeration.
//!
//! Each slot is judged on its own: a home token never moves, a token at
//! start may only enter on the entry roll, and a token in play advances by
//! the roll, clamped at home. No exact roll is needed to finish.

use serde::{Deserialize, Serialize};

use crate::game::{Distance, Slot, Token, Zone, HOME_DISTANCE, TOKENS_PER_PLAYER};

/// Highest face of the die.
pub const DIE_FACES: u8 = 6;

/// Table rules that vary between house variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Roll that releases a token from start (default: 6).
    pub entry_roll: u8,
    /// Refuse moves that would land on a cell held by one of the mover's
    /// own tokens (default: true).
    pub block_own_tokens: bool,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            entry_roll: DIE_FACES,
            block_own_tokens: true,
        }
    }
}

/// What a token does with the roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Leave start and stand on the seat's entry cell (`d: 0 → 1`).
    Enter,
    /// Move forward along the track.
    Advance {
        /// Distance before the move.
        from: Distance,
        /// Distance after the move, clamped at home.
        to: Distance,
    },
}

impl Action {
    /// Distance before the move.
    #[must_use]
    pub const fn source(self) -> Distance {
        match self {
            Self::Enter => 0,
            Self::Advance { from, .. } => from,
        }
    }

    /// Distance after the move.
    #[must_use]
    pub const fn target(self) -> Distance {
        match self {
            Self::Enter => 1,
            Self::Advance { to, .. } => to,
        }
    }
}

/// A token that may act this turn and the effect it would have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    /// Slot of the token.
    pub slot: Slot,
    /// The move it would make.
    pub action: Action,
}

impl Candidate {
    /// Whether choosing this candidate brings the token home.
    #[must_use]
    pub const fn reaches_home(&self) -> bool {
        self.action.target() >= HOME_DISTANCE
    }
}

/// Candidates for one decision, at most one per slot, in slot order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LegalActionSet {
    by_slot: [Option<Candidate>; TOKENS_PER_PLAYER],
}

impl LegalActionSet {
    /// Whether no token can act (the turn passes).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_slot.iter().all(Option::is_none)
    }

    /// Number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_slot.iter().flatten().count()
    }

    /// Candidate for a slot, if that token may act.
    #[must_use]
    pub fn get(&self, slot: Slot) -> Option<Candidate> {
        self.by_slot.get(usize::from(slot)).copied().flatten()
    }

    /// Whether `candidate` is exactly one of the issued candidates.
    #[must_use]
    pub fn contains(&self, candidate: &Candidate) -> bool {
        self.get(candidate.slot).as_ref() == Some(candidate)
    }

    /// Candidates in ascending slot order.
    pub fn iter(&self) -> impl Iterator<Item = Candidate> + '_ {
        self.by_slot.iter().flatten().copied()
    }

    /// Slots that may act, ascending.
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.iter().map(|c| c.slot)
    }

    fn insert(&mut self, candidate: Candidate) {
        if let Some(entry) = self.by_slot.get_mut(usize::from(candidate.slot)) {
            *entry = Some(candidate);
        }
    }
}

/// Distance reached by advancing `distance` by `roll`, clamped at home.
#[must_use]
pub const fn advance_distance(distance: Distance, roll: u8) -> Distance {
    let target = distance.saturating_add(roll);
    if target < HOME_DISTANCE {
        target
    } else {
        HOME_DISTANCE
    }
}

/// Enumerate the legal actions for one player's tokens and a roll.
///
/// The result never ranks candidates; ordering is by slot only. An empty
/// set means the player passes.
#[must_use]
pub fn enumerate_moves(
    tokens: &[Token; TOKENS_PER_PLAYER],
    roll: u8,
    rules: &RuleSet,
) -> LegalActionSet {
    let mut legal = LegalActionSet::default();

    for token in tokens {
        let action = match token.zone() {
            Zone::Home => continue,
            Zone::AtStart if roll == rules.entry_roll => Action::Enter,
            Zone::AtStart => continue,
            Zone::OnRing | Zone::OnHomeStretch => Action::Advance {
                from: token.distance,
                to: advance_distance(token.distance, roll),
            },
        };

        if rules.block_own_tokens && lands_on_own_token(tokens, token.slot, action.target()) {
            continue;
        }

        legal.insert(Candidate {
            slot: token.slot,
            action,
        });
    }

    legal
}

/// Two of a seat's tokens at the same ring or stretch distance share a cell.
fn lands_on_own_token(tokens: &[Token; TOKENS_PER_PLAYER], mover: Slot, target: Distance) -> bool {
    Zone::of(target).in_play()
        && tokens
            .iter()
            .any(|t| t.slot != mover && t.distance == target)
}
