//! Automated games between bots.
//!
//! Provides a pure function interface: `(seed, strategies, config) -> GameResult`.
//! The same inputs always produce the same result, so games can run in
//! parallel and any of them can be replayed from its seed.

mod bots;

pub use bots::{Bot, Strategy};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, GameConfig};
use crate::error::EngineError;
use crate::game::{
    Action, Candidate, Distance, NullSink, Seat, SeatStats, SeededDie, SelectionRequest, SelectionSource,
    TurnController, TurnRecord, NUM_PLAYERS, TOKENS_PER_PLAYER,
};

/// Turn cap applied when the config leaves `max_turns` at 0.
///
/// Bot games finish long before this; it only guards against a stuck game.
pub const DEFAULT_MAX_TURNS: u32 = 20_000;

/// Final result of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// The seed used for this game.
    pub seed: u64,
    /// Strategy per seat.
    pub strategies: Vec<Strategy>,
    /// Winning seat (None if the turn cap was hit).
    pub winner: Option<Seat>,
    /// Total turns played.
    pub turns_played: u32,
    /// Completed rounds.
    pub rounds: u32,
    /// Per-seat statistics.
    pub stats: [SeatStats; NUM_PLAYERS],
    /// Seats ordered by progress, furthest first.
    pub standings: Vec<Seat>,
    /// Final token distances, by seat then slot.
    pub distances: [[Distance; TOKENS_PER_PLAYER]; NUM_PLAYERS],
    /// Every turn in order.
    pub log: Vec<TurnRecord>,
}

impl GameResult {
    /// Total captures across all seats.
    #[must_use]
    pub fn total_captures(&self) -> u32 {
        self.stats.iter().map(|s| s.captures).sum()
    }
}

/// Error type for tournament operations.
#[derive(Debug)]
pub enum TournamentError {
    /// Not exactly one strategy per seat.
    StrategyCount(usize),
    /// The table configuration is invalid.
    Config(ConfigError),
    /// The engine aborted the game.
    Engine(EngineError),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StrategyCount(n) => {
                write!(f, "Expected {NUM_PLAYERS} strategies, one per seat, got {n}")
            }
            Self::Config(e) => write!(f, "Invalid config: {e}"),
            Self::Engine(e) => write!(f, "Game aborted: {e}"),
        }
    }
}

impl std::error::Error for TournamentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::StrategyCount(_) => None,
            Self::Config(e) => Some(e),
            Self::Engine(e) => Some(e),
        }
    }
}

impl From<ConfigError> for TournamentError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<EngineError> for TournamentError {
    fn from(e: EngineError) -> Self {
        Self::Engine(e)
    }
}

/// One bot per seat, dispatched by the seat being asked.
#[derive(Debug, Clone)]
pub struct BotTable {
    bots: Vec<Bot>,
}

impl BotTable {
    /// Seat a bot for each strategy. Bot RNGs are derived from `seed`.
    #[must_use]
    pub fn new(seed: u64, strategies: &[Strategy]) -> Self {
        let bots = strategies
            .iter()
            .zip(1u64..)
            .map(|(&strategy, n)| Bot::new(strategy, bot_seed(seed, n)))
            .collect();
        Self { bots }
    }
}

impl SelectionSource for BotTable {
    fn select(&mut self, request: &SelectionRequest<'_>) -> Candidate {
        match self.bots.get_mut(request.seat.index()) {
            Some(bot) => bot.select(request),
            None => request.legal.iter().next().unwrap_or(Candidate {
                slot: 0,
                action: Action::Enter,
            }),
        }
    }
}

/// Spread per-seat seeds so bots and the die never share a stream.
const fn bot_seed(seed: u64, n: u64) -> u64 {
    seed ^ n.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Run a complete game with the given seed and strategies.
///
/// # Determinism
///
/// Given the same seed, strategies and config, this function always
/// produces the same `GameResult`.
///
/// # Errors
///
/// Returns an error if there is not exactly one strategy per seat, the
/// config is invalid, or the engine aborts the game.
pub fn run_game(
    seed: u64,
    strategies: &[Strategy],
    config: &GameConfig,
) -> Result<GameResult, TournamentError> {
    if strategies.len() != NUM_PLAYERS {
        return Err(TournamentError::StrategyCount(strategies.len()));
    }

    let mut controller = TurnController::new(config.build_state()?)?;
    let mut die = SeededDie::new(seed);
    let mut table = BotTable::new(seed, strategies);
    let max_turns = match config.max_turns {
        0 => DEFAULT_MAX_TURNS,
        n => n,
    };

    let log = controller.play_to_end(&mut die, &mut table, &mut NullSink, max_turns)?;
    let state = controller.into_state();
    log::debug!(
        "game {seed}: winner {:?} after {} turns",
        state.winner,
        state.turn
    );

    Ok(GameResult {
        seed,
        strategies: strategies.to_vec(),
        winner: state.winner,
        turns_played: state.turn,
        rounds: state.round,
        stats: state.stats,
        standings: state.standings(),
        distances: state.distances(),
        log,
    })
}
