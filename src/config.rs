//! Table configuration.
//!
//! A [`GameConfig`] names the four players, their colors and the house
//! rules. It loads from TOML; every field has a default, so an empty file
//! is a valid configuration.
//!
//! ```toml
//! max_turns = 2000
//!
//! [rules]
//! entry_roll = 6
//! block_own_tokens = true
//!
//! [[players]]
//! name = "Ada"
//! color = "red"
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::{draw_seating, Color, GameState, Player, RuleSet, Seat, DIE_FACES, NUM_PLAYERS};

/// One seat at the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Display name; must be non-empty and unique.
    pub name: String,
    /// Display color.
    pub color: Color,
}

/// Full game configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Players in seat order.
    pub players: Vec<PlayerConfig>,
    /// House rules.
    pub rules: RuleSet,
    /// Turn cap for automated play (0 = unlimited).
    pub max_turns: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            players: Seat::ALL
                .iter()
                .map(|seat| PlayerConfig {
                    name: format!("Player {}", seat.number()),
                    color: Color::PALETTE[seat.index()],
                })
                .collect(),
            rules: RuleSet::default(),
            max_turns: 0,
        }
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read or written.
    Io {
        /// Path involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The TOML could not be parsed or produced.
    Toml(String),
    /// Not exactly four players.
    PlayerCount(usize),
    /// A player has an empty name.
    EmptyName(Seat),
    /// Two players share a name.
    DuplicateName(String),
    /// The entry roll is not a die face.
    EntryRoll(u8),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Toml(msg) => write!(f, "invalid config: {msg}"),
            Self::PlayerCount(n) => write!(f, "expected {NUM_PLAYERS} players, found {n}"),
            Self::EmptyName(seat) => write!(f, "{seat} has an empty name"),
            Self::DuplicateName(name) => write!(f, "player name {name:?} is used twice"),
            Self::EntryRoll(roll) => write!(f, "entry roll {roll} is outside 1..={DIE_FACES}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl GameConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or fails validation.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Toml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Render as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Toml(e.to_string()))
    }

    /// Check the table is playable.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players.len() != NUM_PLAYERS {
            return Err(ConfigError::PlayerCount(self.players.len()));
        }

        let mut names = HashSet::new();
        for (seat, player) in Seat::ALL.iter().zip(&self.players) {
            let name = player.name.trim();
            if name.is_empty() {
                return Err(ConfigError::EmptyName(*seat));
            }
            if !names.insert(name) {
                return Err(ConfigError::DuplicateName(name.to_string()));
            }
        }

        if !(1..=DIE_FACES).contains(&self.rules.entry_roll) {
            return Err(ConfigError::EntryRoll(self.rules.entry_roll));
        }

        Ok(())
    }

    /// Reorder the players by a random seating draw.
    ///
    /// # Errors
    ///
    /// Returns an error if the config does not have exactly four players.
    pub fn seated<R: Rng + ?Sized>(mut self, rng: &mut R) -> Result<Self, ConfigError> {
        let entrants: [PlayerConfig; NUM_PLAYERS] = self
            .players
            .try_into()
            .map_err(|players: Vec<PlayerConfig>| ConfigError::PlayerCount(players.len()))?;
        self.players = draw_seating(entrants, rng).into();
        Ok(self)
    }

    /// Build the initial board.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build_state(&self) -> Result<GameState, ConfigError> {
        self.validate()?;
        let mut players = Seat::ALL.map(|seat| Player::new(seat, String::new(), Color::Red));
        for (player, entry) in players.iter_mut().zip(&self.players) {
            player.name = entry.name.trim().to_string();
            player.color = entry.color;
        }
        Ok(GameState::new(players, self.rules))
    }
}
