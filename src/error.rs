//! Error types for the rules engine.

use std::fmt;

use crate::game::{InvariantViolation, Seat, Slot};

/// Errors raised by the turn controller and the move applier.
///
/// [`EngineError::InvalidSelection`], [`EngineError::InvalidRoll`] and
/// [`EngineError::WrongPhase`] are rejected inputs: the engine state is left
/// untouched and the caller may retry. [`EngineError::Invariant`] means the
/// board is corrupt and the game must be abandoned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The chosen candidate is not part of the pending legal action set.
    InvalidSelection {
        /// Seat that made the selection.
        seat: Seat,
        /// Slot of the token that was selected.
        slot: Slot,
    },
    /// The die source produced a value outside `1..=6`.
    InvalidRoll(u8),
    /// An operation was issued while the controller was in a phase that
    /// does not accept it.
    WrongPhase {
        /// What the caller tried to do.
        operation: &'static str,
        /// Name of the phase the controller was in.
        phase: &'static str,
    },
    /// The board broke one of its structural invariants.
    Invariant(InvariantViolation),
}

impl EngineError {
    /// Whether the error is a rejected input that can be retried.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Invariant(_))
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSelection { seat, slot } => {
                write!(f, "{seat} selected token {slot}, which has no legal move")
            }
            Self::InvalidRoll(value) => write!(f, "die roll {value} is outside 1..=6"),
            Self::WrongPhase { operation, phase } => {
                write!(f, "cannot {operation} while {phase}")
            }
            Self::Invariant(violation) => write!(f, "{violation}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<InvariantViolation> for EngineError {
    fn from(violation: InvariantViolation) -> Self {
        Self::Invariant(violation)
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
