//! Player and token state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::{
    cell, Cell, Distance, Seat, Zone, HOME_DISTANCE, NUM_PLAYERS, TOKENS_PER_PLAYER,
};

/// Fixed index `0..4` of a token within its owner.
pub type Slot = u8;

/// Display color of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Red.
    Red,
    /// White.
    White,
    /// Blue.
    Blue,
    /// Green.
    Green,
}

impl Color {
    /// Default palette in seat order.
    pub const PALETTE: [Self; NUM_PLAYERS] = [Self::Red, Self::White, Self::Blue, Self::Green];
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Red => "red",
            Self::White => "white",
            Self::Blue => "blue",
            Self::Green => "green",
        };
        f.write_str(name)
    }
}

/// A single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// Slot assigned at creation; never changes.
    pub slot: Slot,
    /// Travel distance from the start area.
    pub distance: Distance,
}

impl Token {
    /// Create a token parked in its start cell.
    #[must_use]
    pub const fn new(slot: Slot) -> Self {
        Self { slot, distance: 0 }
    }

    /// Create a token at an arbitrary distance.
    #[must_use]
    pub const fn at(slot: Slot, distance: Distance) -> Self {
        Self { slot, distance }
    }

    /// Zone the token is in.
    #[must_use]
    pub const fn zone(&self) -> Zone {
        Zone::of(self.distance)
    }

    /// Whether the token has reached home.
    #[must_use]
    pub const fn is_home(&self) -> bool {
        self.distance >= HOME_DISTANCE
    }
}

/// State for a single player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Seat in play order.
    pub seat: Seat,
    /// Display name.
    pub name: String,
    /// Display color.
    pub color: Color,
    /// The player's four tokens, indexed by slot.
    pub tokens: [Token; TOKENS_PER_PLAYER],
}

impl Player {
    /// Create a player with all tokens at start.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(seat: Seat, name: impl Into<String>, color: Color) -> Self {
        Self {
            seat,
            name: name.into(),
            color,
            tokens: std::array::from_fn(|slot| Token::new(slot as Slot)),
        }
    }

    /// Replace all four travel distances, keeping slot identities.
    #[must_use]
    pub fn with_distances(mut self, distances: [Distance; TOKENS_PER_PLAYER]) -> Self {
        for (token, distance) in self.tokens.iter_mut().zip(distances) {
            token.distance = distance;
        }
        self
    }

    /// Travel distances of the four tokens, by slot.
    #[must_use]
    pub fn distances(&self) -> [Distance; TOKENS_PER_PLAYER] {
        self.tokens.map(|t| t.distance)
    }

    /// Whether all four tokens are home.
    #[must_use]
    pub fn all_home(&self) -> bool {
        self.tokens.iter().all(Token::is_home)
    }

    /// Number of tokens in the given zone.
    #[must_use]
    pub fn count_in(&self, zone: Zone) -> usize {
        self.tokens.iter().filter(|t| t.zone() == zone).count()
    }

    /// Cell occupied by the token in `slot`.
    #[must_use]
    pub fn token_cell(&self, slot: Slot) -> Option<Cell> {
        self.tokens
            .get(usize::from(slot))
            .map(|t| cell(self.seat, t.slot, t.distance))
    }

    /// Sum of all travel distances, home tokens counted at home distance.
    #[must_use]
    pub fn progress(&self) -> u32 {
        self.tokens
            .iter()
            .map(|t| u32::from(t.distance.min(HOME_DISTANCE)))
            .sum()
    }
}
