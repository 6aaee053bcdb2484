// Error types shared across the arena core.

use std::fmt;

/// Every failure the arena core surfaces to a caller.
///
/// All variants are recoverable; the caller decides whether to retry.
/// Multi-step operations validate before the first mutation, so an error
/// never leaves a partial write behind.
#[derive(Debug, Clone, PartialEq)]
pub enum ArenaError {
    /// Malformed or duplicate input: bad price, unknown difficulty, taken name
    Validation(String),
    /// Referenced id or name is absent or soft-deleted
    NotFound(String),
    /// Meal already occupies a roster slot
    Duplicate(String),
    /// Roster already holds two combatants
    RosterFull,
    /// Battle requested with fewer than two combatants staged
    InsufficientCombatants(usize),
    /// The persistence collaborator failed
    Storage(String),
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArenaError::Validation(msg) => write!(f, "validation failed: {}", msg),
            ArenaError::NotFound(what) => write!(f, "not found: {}", what),
            ArenaError::Duplicate(what) => write!(f, "already staged: {}", what),
            ArenaError::RosterFull => write!(f, "combatant roster is full"),
            ArenaError::InsufficientCombatants(staged) => {
                write!(f, "a battle requires two combatants, {} staged", staged)
            }
            ArenaError::Storage(msg) => write!(f, "storage error: {}", msg),
        }
    }
}

impl std::error::Error for ArenaError {}

impl From<rusqlite::Error> for ArenaError {
    fn from(err: rusqlite::Error) -> Self {
        ArenaError::Storage(err.to_string())
    }
}

pub type Result<T, E = ArenaError> = std::result::Result<T, E>;
