//! Track geometry.
//!
//! A token's only state is its travel distance `d`. This module turns a
//! `(seat, slot, d)` triple into the board cell the token occupies. The
//! mapping is the same for every seat apart from the seat's entry offset
//! into the shared ring and the seat's private stretch and home cells.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::Slot;

/// Number of seats at the table.
pub const NUM_PLAYERS: usize = SEAT_COUNT as usize;

const SEAT_COUNT: u8 = 4;

/// Number of tokens owned by every player.
pub const TOKENS_PER_PLAYER: usize = 4;

/// Cells in the shared ring.
pub const RING_LEN: u8 = 52;

/// Cells in each player's private home stretch.
pub const STRETCH_LEN: u8 = 5;

/// Ring cells between the entry points of consecutive seats.
pub const ENTRY_SPACING: u8 = RING_LEN / SEAT_COUNT;

/// Largest distance that is still on the ring.
pub const LAST_RING_DISTANCE: Distance = RING_LEN;

/// First distance inside the home stretch.
pub const FIRST_STRETCH_DISTANCE: Distance = RING_LEN + 1;

/// Distance at which a token is home. Any overshoot is clamped to this.
pub const HOME_DISTANCE: Distance = RING_LEN + STRETCH_LEN + 1;

/// Total number of distinct cells on the board.
///
/// 16 start cells, 52 ring cells, 4 × 5 stretch cells and 16 home cells.
pub const BOARD_CELLS: usize = 2 * NUM_PLAYERS * TOKENS_PER_PLAYER
    + RING_LEN as usize
    + NUM_PLAYERS * STRETCH_LEN as usize;

const START_BASE: usize = 0;
const RING_BASE: usize = START_BASE + NUM_PLAYERS * TOKENS_PER_PLAYER;
const STRETCH_BASE: usize = RING_BASE + RING_LEN as usize;
const HOME_BASE: usize = STRETCH_BASE + NUM_PLAYERS * STRETCH_LEN as usize;

/// Travel distance of a token from its owner's start area.
pub type Distance = u8;

/// A seat at the table, in fixed play order.
///
/// Seats are indexed `0..4` internally and displayed as `P1`..`P4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Seat(u8);

impl Seat {
    /// The seat that opens the game.
    pub const FIRST: Self = Self(0);

    /// All seats in play order.
    pub const ALL: [Self; NUM_PLAYERS] = [Self(0), Self(1), Self(2), Self(3)];

    /// Create a seat from a zero-based index.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < NUM_PLAYERS {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Create a seat from its one-based player number.
    #[must_use]
    pub const fn from_number(number: u8) -> Option<Self> {
        match number.checked_sub(1) {
            Some(index) => Self::new(index),
            None => None,
        }
    }

    /// Zero-based index, usable for array lookups.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// One-based player number.
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0 + 1
    }

    /// The seat that plays after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self((self.0 + 1) % SEAT_COUNT)
    }

    /// Whether this seat closes a round.
    #[must_use]
    pub const fn is_last(self) -> bool {
        self.0 as usize == NUM_PLAYERS - 1
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.number())
    }
}

impl TryFrom<u8> for Seat {
    type Error = String;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index).ok_or_else(|| format!("seat index {index} out of range 0..{NUM_PLAYERS}"))
    }
}

impl From<Seat> for u8 {
    fn from(seat: Seat) -> Self {
        seat.0
    }
}

/// Where on its journey a token is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// `d = 0`.
    AtStart,
    /// `1 ≤ d ≤ 52`.
    OnRing,
    /// `53 ≤ d ≤ 57`.
    OnHomeStretch,
    /// `d ≥ 58`.
    Home,
}

impl Zone {
    /// Classify a travel distance.
    #[must_use]
    pub const fn of(distance: Distance) -> Self {
        match distance {
            0 => Self::AtStart,
            1..=LAST_RING_DISTANCE => Self::OnRing,
            FIRST_STRETCH_DISTANCE..HOME_DISTANCE => Self::OnHomeStretch,
            _ => Self::Home,
        }
    }

    /// Whether a token in this zone can still be moved.
    #[must_use]
    pub const fn in_play(self) -> bool {
        matches!(self, Self::OnRing | Self::OnHomeStretch)
    }
}

/// A canonical board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// One of a seat's four start cells, keyed by slot.
    Start {
        /// Owning seat.
        seat: Seat,
        /// Slot of the token parked here.
        slot: Slot,
    },
    /// Absolute ring cell `0..52`, shared by all seats.
    Ring(u8),
    /// Step `0..5` of a seat's private home stretch.
    Stretch {
        /// Owning seat.
        seat: Seat,
        /// Step along the stretch.
        step: u8,
    },
    /// One of a seat's four home cells, keyed by slot.
    Home {
        /// Owning seat.
        seat: Seat,
        /// Slot of the token resting here.
        slot: Slot,
    },
}

impl Cell {
    /// Whether tokens of different seats can meet on this cell.
    #[must_use]
    pub const fn is_contested(self) -> bool {
        matches!(self, Self::Ring(_))
    }

    /// Flat index in `0..BOARD_CELLS`, the key a renderer draws by.
    #[must_use]
    pub fn board_index(self) -> usize {
        match self {
            Self::Start { seat, slot } => {
                START_BASE + seat.index() * TOKENS_PER_PLAYER + usize::from(slot)
            }
            Self::Ring(index) => RING_BASE + usize::from(index),
            Self::Stretch { seat, step } => {
                STRETCH_BASE + seat.index() * usize::from(STRETCH_LEN) + usize::from(step)
            }
            Self::Home { seat, slot } => {
                HOME_BASE + seat.index() * TOKENS_PER_PLAYER + usize::from(slot)
            }
        }
    }

    /// Inverse of [`Cell::board_index`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_board_index(index: usize) -> Option<Self> {
        let per_seat = |offset: usize, width: usize| {
            let seat = Seat::new((offset / width) as u8)?;
            Some((seat, (offset % width) as u8))
        };
        match index {
            i if i < RING_BASE => {
                per_seat(i - START_BASE, TOKENS_PER_PLAYER).map(|(seat, slot)| Self::Start { seat, slot })
            }
            i if i < STRETCH_BASE => Some(Self::Ring((i - RING_BASE) as u8)),
            i if i < HOME_BASE => per_seat(i - STRETCH_BASE, usize::from(STRETCH_LEN))
                .map(|(seat, step)| Self::Stretch { seat, step }),
            i if i < BOARD_CELLS => {
                per_seat(i - HOME_BASE, TOKENS_PER_PLAYER).map(|(seat, slot)| Self::Home { seat, slot })
            }
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start { seat, slot } => write!(f, "{seat} start {slot}"),
            Self::Ring(index) => write!(f, "ring {index}"),
            Self::Stretch { seat, step } => write!(f, "{seat} stretch {step}"),
            Self::Home { seat, slot } => write!(f, "{seat} home {slot}"),
        }
    }
}

/// Ring cell where a seat's tokens enter the board.
#[must_use]
pub const fn entry_offset(seat: Seat) -> u8 {
    seat.0 * ENTRY_SPACING
}

/// Absolute ring cell of a token at `distance`, or `None` off the ring.
#[must_use]
pub const fn ring_cell(seat: Seat, distance: Distance) -> Option<u8> {
    match Zone::of(distance) {
        Zone::OnRing => Some((entry_offset(seat) + distance - 1) % RING_LEN),
        _ => None,
    }
}

/// Map a token's travel distance to the cell it occupies.
#[must_use]
pub const fn cell(seat: Seat, slot: Slot, distance: Distance) -> Cell {
    match Zone::of(distance) {
        Zone::AtStart => Cell::Start { seat, slot },
        Zone::OnRing => Cell::Ring((entry_offset(seat) + distance - 1) % RING_LEN),
        Zone::OnHomeStretch => Cell::Stretch {
            seat,
            step: distance - FIRST_STRETCH_DISTANCE,
        },
        Zone::Home => Cell::Home { seat, slot },
    }
}
