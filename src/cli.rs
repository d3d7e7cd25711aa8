//! CLI command implementations for Clip 'Em.

pub(crate) mod check_config;
pub(crate) mod play;
pub(crate) mod replay;
pub(crate) mod run;
pub(crate) mod tournament;

mod output;

use std::error::Error;
use std::fmt;
use std::path::Path;

use clap::ValueEnum;
use clipem::GameConfig;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable summary.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// Turn-by-turn narrative followed by the final board.
    Log,
}

/// Output format for the `tournament` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TournamentFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<clipem::ConfigError> for CliError {
    fn from(e: clipem::ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<clipem::EngineError> for CliError {
    fn from(e: clipem::EngineError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<clipem::tournament::TournamentError> for CliError {
    fn from(e: clipem::tournament::TournamentError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<clipem::replay::ReplayError> for CliError {
    fn from(e: clipem::replay::ReplayError) -> Self {
        Self::new(e.to_string())
    }
}

/// Load a config file, or the default table when none is given.
fn load_config(path: Option<&Path>) -> Result<GameConfig, CliError> {
    match path {
        Some(path) => Ok(GameConfig::load(path)?),
        None => Ok(GameConfig::default()),
    }
}

/// Seed from the clock when none is given.
#[allow(clippy::cast_possible_truncation)]
fn seed_or_clock(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    })
}
