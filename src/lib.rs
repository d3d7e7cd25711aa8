// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Clip 'Em: the rules engine for a four-player race-and-capture board game.
//!
//! Every player owns four tokens. A token leaves its start area on a roll
//! of six, travels the shared 52-cell ring, turns into a private 5-cell
//! home stretch and finally rests on one of its owner's four home cells.
//! Landing on an opponent's ring cell sends that token back to start.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  CLI / Tournament / Replay          │
//! ├─────────────────────────────────────┤
//! │  Turn Controller (game::turn)       │
//! ├─────────────────────────────────────┤
//! │  Move Applier & Collision Resolver  │
//! │  Legal Move Enumerator              │
//! ├─────────────────────────────────────┤
//! │  Track Geometry (game::track)       │
//! └─────────────────────────────────────┘
//! ```
//!
//! The die, the choice of token and the presentation layer are external
//! collaborators, modelled by the [`DieSource`], [`SelectionSource`] and
//! [`EventSink`] traits.

pub mod config;
pub mod error;
pub mod game;
pub mod replay;
pub mod tournament;

pub use config::{ConfigError, GameConfig, PlayerConfig};
pub use error::{EngineError, EngineResult};

// Re-export key game types at crate root for convenience
pub use game::{
    Action, Candidate, CaptureEvent, Cell, Color, DieSource, EventSink, GameEvent, GameState,
    LegalActionSet, MoveOutcome, Phase, Player, RuleSet, Seat, SelectionSource, Token,
    TurnController, Zone,
};
