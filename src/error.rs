//! Error types for the arena.
//!
//! Gameplay-domain failures (bad map, no save, no level) are recovered by the
//! caller and shown as status text; none of them terminate the process.

use thiserror::Error;

use crate::sim::MapProblem;

/// Result type alias using [`ArenaError`].
pub type Result<T> = std::result::Result<T, ArenaError>;

#[derive(Debug, Error)]
pub enum ArenaError {
    /// Storage file could not be read or written.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Stored document is not valid JSON for the expected type.
    #[error("malformed stored data: {0}")]
    Json(#[from] serde_json::Error),

    /// No persisted map exists for a level ordinal inside `1..=total`.
    #[error("level {0} has no stored map")]
    MissingLevel(u32),

    /// Load requested but nothing was ever saved.
    #[error("no data to load!")]
    MissingSave,

    /// Authored map failed validation.
    #[error("{0}")]
    InvalidMap(#[from] MapProblem),

    /// Level map does not match the arena grid.
    #[error("map is {found:?} cells, the arena grid is {expected:?}")]
    GridMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// ASCII level text could not be parsed.
    #[error("bad level text at line {line}, column {column}: {reason}")]
    LevelText {
        line: usize,
        column: usize,
        reason: String,
    },

    /// Simulation parameters are inconsistent.
    #[error("invalid simulation parameters: {0}")]
    InvalidParams(String),

    /// Operation requires an active run.
    #[error("no game in progress")]
    NotPlaying,

    /// Editor action needs an open draft.
    #[error("no level is being edited")]
    NotEditing,

    /// Replay is only accepted after the player was destroyed.
    #[error("replay is only available after game over")]
    NotGameOver,
}
