//! Game recording and replay.
//!
//! A [`Recording`] keeps the seed, the table config, the strategy per seat
//! and the turn log. Replaying feeds the logged rolls and selections back
//! through a fresh [`TurnController`] and checks that every turn comes out
//! exactly as recorded, so a tampered or stale log is caught at the first
//! turn that diverges.
//!
//! # Time Travel
//!
//! - **Forward**: play the next logged turn
//! - **Backward**: re-play from turn 0 to (`current_turn` - 1)
//! - **Jump to turn N**: re-play from turn 0 to N

mod text;

pub use text::{describe_action, render_board, render_game, render_turn};

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, GameConfig};
use crate::error::EngineError;
use crate::game::{GameState, NullSink, ScriptedDie, ScriptedSelection, TurnController, TurnRecord};
use crate::tournament::{GameResult, Strategy};

/// Everything needed to re-play a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    /// Seed the game was played with.
    pub seed: u64,
    /// Table configuration.
    pub config: GameConfig,
    /// Strategy per seat; empty for games played by people.
    #[serde(default)]
    pub strategies: Vec<Strategy>,
    /// Every turn in order.
    pub log: Vec<TurnRecord>,
}

impl Recording {
    /// Record a finished bot game.
    #[must_use]
    pub fn from_result(config: GameConfig, result: &GameResult) -> Self {
        Self {
            seed: result.seed,
            config,
            strategies: result.strategies.clone(),
            log: result.log.clone(),
        }
    }

    /// Save as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), ReplayError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| ReplayError::Json(e.to_string()))?;
        fs::write(path, json).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or its config
    /// is invalid.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let json = fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let recording: Self =
            serde_json::from_str(&json).map_err(|e| ReplayError::Json(e.to_string()))?;
        recording.config.validate()?;
        Ok(recording)
    }

    /// Number of logged turns.
    #[must_use]
    pub fn turns(&self) -> u32 {
        u32::try_from(self.log.len()).unwrap_or(u32::MAX)
    }
}

/// Error type for replay operations.
#[derive(Debug)]
pub enum ReplayError {
    /// The recording file could not be read or written.
    Io {
        /// Path involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The recording is not valid JSON.
    Json(String),
    /// The recorded config is invalid.
    Config(ConfigError),
    /// The engine rejected a logged turn.
    Engine {
        /// Turn being re-played.
        turn: u32,
        /// Engine error.
        error: EngineError,
    },
    /// A re-played turn differs from the log.
    Diverged {
        /// First turn that differs.
        turn: u32,
    },
    /// Turn number out of bounds.
    TurnOutOfBounds {
        /// Requested turn.
        requested: u32,
        /// Last turn in the recording.
        max_turn: u32,
    },
    /// The log is exhausted.
    EndOfLog,
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Json(msg) => write!(f, "Invalid recording: {msg}"),
            Self::Config(e) => write!(f, "Invalid recorded config: {e}"),
            Self::Engine { turn, error } => write!(f, "Turn {turn} rejected: {error}"),
            Self::Diverged { turn } => write!(f, "Turn {turn} does not match the recording"),
            Self::TurnOutOfBounds { requested, max_turn } => {
                write!(f, "Turn {requested} out of bounds (max: {max_turn})")
            }
            Self::EndOfLog => write!(f, "No more turns in the recording"),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Config(e) => Some(e),
            Self::Engine { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigError> for ReplayError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Replay engine - steps through a recording turn by turn.
#[derive(Debug, Clone)]
pub struct ReplayEngine {
    recording: Recording,
    controller: TurnController,
    die: ScriptedDie,
    selector: ScriptedSelection,
    current_turn: u32,
}

impl ReplayEngine {
    /// Start a replay at turn 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the recorded config is invalid or yields a
    /// corrupt starting board.
    pub fn new(recording: Recording) -> Result<Self, ReplayError> {
        let controller = TurnController::new(recording.config.build_state()?)
            .map_err(|error| ReplayError::Engine { turn: 0, error })?;
        let die = ScriptedDie::new(recording.log.iter().map(|r| r.roll).collect::<Vec<_>>());
        let selector = ScriptedSelection::new(
            recording
                .log
                .iter()
                .filter_map(TurnRecord::moved_slot)
                .collect::<Vec<_>>(),
        );

        Ok(Self {
            recording,
            controller,
            die,
            selector,
            current_turn: 0,
        })
    }

    /// Start a replay and advance to `target_turn`.
    ///
    /// # Errors
    ///
    /// Returns an error if the turn is out of bounds or a turn diverges.
    pub fn new_at_turn(recording: Recording, target_turn: u32) -> Result<Self, ReplayError> {
        let max_turn = recording.turns();
        if target_turn > max_turn {
            return Err(ReplayError::TurnOutOfBounds {
                requested: target_turn,
                max_turn,
            });
        }

        let mut engine = Self::new(recording)?;
        while engine.current_turn < target_turn {
            engine.step_forward()?;
        }
        Ok(engine)
    }

    /// Get the recording.
    #[must_use]
    pub const fn recording(&self) -> &Recording {
        &self.recording
    }

    /// Turns re-played so far.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.current_turn
    }

    /// Current board.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        self.controller.state()
    }

    /// Whether every logged turn has been re-played.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.current_turn >= self.recording.turns()
    }

    /// Re-play the next logged turn and check it against the log.
    ///
    /// # Errors
    ///
    /// Returns an error at the end of the log, if the engine rejects the
    /// turn, or if the outcome differs from the log.
    pub fn step_forward(&mut self) -> Result<TurnRecord, ReplayError> {
        let index = self.current_turn as usize;
        let turn = self.current_turn + 1;
        let Some(&expected) = self.recording.log.get(index) else {
            return Err(ReplayError::EndOfLog);
        };

        let actual = self
            .controller
            .play_turn(&mut self.die, &mut self.selector, &mut NullSink)
            .map_err(|error| ReplayError::Engine { turn, error })?;

        if actual != expected {
            log::warn!("replay diverged at turn {turn}: logged {expected:?}, got {actual:?}");
            return Err(ReplayError::Diverged { turn });
        }

        self.current_turn = turn;
        Ok(expected)
    }

    /// Step backward one turn by re-playing from the start.
    ///
    /// # Errors
    ///
    /// Returns an error if already at turn 0.
    pub fn step_backward(&mut self) -> Result<(), ReplayError> {
        if self.current_turn == 0 {
            return Err(ReplayError::TurnOutOfBounds {
                requested: 0,
                max_turn: self.recording.turns(),
            });
        }
        self.goto_turn(self.current_turn - 1)
    }

    /// Jump to a specific turn by re-playing from the start.
    ///
    /// # Errors
    ///
    /// Returns an error if the turn is out of bounds or a turn diverges.
    pub fn goto_turn(&mut self, target_turn: u32) -> Result<(), ReplayError> {
        *self = Self::new_at_turn(self.recording.clone(), target_turn)?;
        Ok(())
    }

    /// Re-play every remaining turn.
    ///
    /// # Errors
    ///
    /// Returns the first divergence or engine error.
    pub fn verify_all(&mut self) -> Result<&GameState, ReplayError> {
        while !self.is_finished() {
            self.step_forward()?;
        }
        Ok(self.state())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::NamedTempFile;

    use super::*;
    use crate::game::{Seat, TurnOutcome};
    use crate::tournament::run_game;

    fn recorded_game(seed: u64) -> Recording {
        let config = GameConfig::default();
        let strategies = [
            Strategy::Runner,
            Strategy::Hunter,
            Strategy::Random,
            Strategy::Cautious,
        ];
        let result = run_game(seed, &strategies, &config).unwrap();
        Recording::from_result(config, &result)
    }

    #[test]
    fn test_replay_reaches_recorded_winner() {
        let recording = recorded_game(2024);
        let expected = run_game(2024, &recording.strategies, &recording.config).unwrap();

        let mut engine = ReplayEngine::new(recording).unwrap();
        let state = engine.verify_all().unwrap();
        assert_eq!(state.winner, expected.winner);
        assert_eq!(state.distances(), expected.distances);
        assert!(engine.is_finished());
        assert!(matches!(engine.step_forward(), Err(ReplayError::EndOfLog)));
    }

    #[test]
    fn test_recording_save_load_roundtrip() {
        let recording = recorded_game(31);
        let temp_file = NamedTempFile::new().unwrap();
        recording.save(temp_file.path()).unwrap();
        let loaded = Recording::load(temp_file.path()).unwrap();
        assert_eq!(loaded, recording);
    }

    #[test]
    fn test_tampered_roll_detected() {
        let mut recording = recorded_game(8);
        // Turn 1 is P1's opening roll; change a pass into a six or vice versa.
        let first = &mut recording.log[0];
        first.roll = if first.roll == 6 { 5 } else { 6 };

        let mut engine = ReplayEngine::new(recording).unwrap();
        let err = engine.step_forward().unwrap_err();
        assert!(matches!(err, ReplayError::Diverged { turn: 1 }), "{err}");
    }

    #[test]
    fn test_tampered_outcome_detected() {
        let mut recording = recorded_game(8);
        let moved = recording
            .log
            .iter()
            .position(|r| matches!(r.outcome, TurnOutcome::Moved(_)))
            .unwrap();
        if let TurnOutcome::Moved(outcome) = &mut recording.log[moved].outcome {
            outcome.seat = Seat::ALL[(outcome.seat.index() + 1) % 4];
        }

        let mut engine = ReplayEngine::new(recording).unwrap();
        let err = engine.verify_all().unwrap_err();
        let expected_turn = u32::try_from(moved).unwrap() + 1;
        assert!(matches!(err, ReplayError::Diverged { turn } if turn == expected_turn));
    }

    #[test]
    fn test_goto_and_step_backward() {
        let recording = recorded_game(77);
        let mut engine = ReplayEngine::new_at_turn(recording.clone(), 20).unwrap();
        assert_eq!(engine.turn(), 20);
        let at_20 = engine.state().clone();

        engine.step_forward().unwrap();
        engine.step_backward().unwrap();
        assert_eq!(engine.turn(), 20);
        assert_eq!(engine.state(), &at_20);

        let max = recording.turns();
        assert!(matches!(
            engine.goto_turn(max + 1),
            Err(ReplayError::TurnOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Recording::load(Path::new("/nonexistent/clipem.json")).unwrap_err();
        assert!(matches!(err, ReplayError::Io { .. }));
    }

    #[test]
    fn test_replay_error_display() {
        let err = ReplayError::TurnOutOfBounds {
            requested: 1500,
            max_turn: 1000,
        };
        assert!(format!("{err}").contains("1500"));
        assert!(format!("{err}").contains("1000"));
        assert!(ReplayError::Diverged { turn: 3 }.to_string().contains('3'));
    }
}
