//! Built-in automated players.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::game::{
    ring_cell, Action, Candidate, GameState, Seat, SelectionRequest, SelectionSource, Zone,
    LAST_RING_DISTANCE, RING_LEN,
};

/// How a bot picks among the legal candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Always the lowest slot.
    First,
    /// Uniformly at random.
    Random,
    /// The token furthest along.
    Runner,
    /// A capture if possible, then an entry, then the runner's choice.
    Hunter,
    /// The landing cell with the most room behind it, then the runner's choice.
    Cautious,
}

impl Strategy {
    /// All strategies, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::First,
        Self::Random,
        Self::Runner,
        Self::Hunter,
        Self::Cautious,
    ];

    /// Lowercase name, as accepted on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Random => "random",
            Self::Runner => "runner",
            Self::Hunter => "hunter",
            Self::Cautious => "cautious",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A [`SelectionSource`] playing one [`Strategy`].
#[derive(Debug, Clone)]
pub struct Bot {
    strategy: Strategy,
    rng: StdRng,
}

impl Bot {
    /// Create a bot; `seed` only matters for [`Strategy::Random`].
    #[must_use]
    pub fn new(strategy: Strategy, seed: u64) -> Self {
        Self {
            strategy,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Strategy this bot plays.
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }
}

impl SelectionSource for Bot {
    fn select(&mut self, request: &SelectionRequest<'_>) -> Candidate {
        let mut candidates = request.legal.iter();
        let fallback = Candidate {
            slot: 0,
            action: Action::Enter,
        };

        let chosen = match self.strategy {
            Strategy::First => candidates.next(),
            Strategy::Random => {
                let n = request.legal.len();
                if n == 0 {
                    None
                } else {
                    candidates.nth(self.rng.random_range(0..n))
                }
            }
            Strategy::Runner => runner(candidates),
            Strategy::Hunter => {
                let all: Vec<Candidate> = candidates.collect();
                all.iter()
                    .copied()
                    .find(|c| captures(request.state, request.seat, *c))
                    .or_else(|| all.iter().copied().find(|c| c.action == Action::Enter))
                    .or_else(|| runner(all.into_iter()))
            }
            Strategy::Cautious => {
                // Highest gap wins; ties go to the token furthest along, then the lowest slot.
                candidates.max_by_key(|c| {
                    (
                        gap_behind(request.state, request.seat, *c),
                        c.action.source(),
                        std::cmp::Reverse(c.slot),
                    )
                })
            }
        };

        chosen.unwrap_or(fallback)
    }
}

/// Furthest-along token; ties go to the lowest slot.
fn runner(candidates: impl Iterator<Item = Candidate>) -> Option<Candidate> {
    candidates.max_by_key(|c| (c.action.source(), std::cmp::Reverse(c.slot)))
}

/// Whether `candidate` lands on an opponent.
fn captures(state: &GameState, seat: Seat, candidate: Candidate) -> bool {
    let Some(target) = ring_cell(seat, candidate.action.target()) else {
        return false;
    };
    state
        .players
        .iter()
        .filter(|p| p.seat != seat)
        .flat_map(|p| p.tokens.iter().map(move |t| ring_cell(p.seat, t.distance)))
        .any(|cell| cell == Some(target))
}

/// Ring cells between the landing cell and the nearest opponent that could
/// still reach it. Off-ring landings are out of reach.
fn gap_behind(state: &GameState, seat: Seat, candidate: Candidate) -> u8 {
    let Some(target) = ring_cell(seat, candidate.action.target()) else {
        return u8::MAX;
    };

    state
        .players
        .iter()
        .filter(|p| p.seat != seat)
        .flat_map(|p| p.tokens.iter().map(move |t| (p.seat, t.distance)))
        .filter(|&(_, d)| Zone::of(d) == Zone::OnRing)
        .filter_map(|(owner, d)| {
            let cell = ring_cell(owner, d)?;
            let gap = (target + RING_LEN - cell) % RING_LEN;
            // The opponent leaves the ring before passing the target.
            (gap > 0 && d + gap <= LAST_RING_DISTANCE).then_some(gap)
        })
        .min()
        .unwrap_or(RING_LEN)
}
