//! Error types for the ghost chase core.

use thiserror::Error;

use crate::actors::GhostName;

/// Main error type for the crate.
///
/// Nothing in the simulation itself fails: out-of-bounds reads return the
/// `TileState::OutOfBounds` sentinel and blocked moves simply produce no child.
/// These variants cover building a snapshot from outside data and the
/// "boxed in" case of move selection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid tile code {code} at ({x}, {y})")]
    InvalidTileCode { code: i8, x: i32, y: i32 },

    #[error("unrecognized character '{character}' in row {row} col {col}")]
    UnrecognizedCharacter { character: char, row: usize, col: usize },

    #[error("row {row} has {found} characters (expected {expected})")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("maze has no tiles")]
    EmptyMaze,

    #[error("no player marker found")]
    MissingPlayer,

    #[error("more than one player marker found")]
    DuplicatePlayer,

    #[error("no snapshot for ghost {0}")]
    MissingGhost(GhostName),

    #[error("ghost {0} appears more than once")]
    DuplicateGhost(GhostName),

    #[error("no legal move: every direction is blocked")]
    NoLegalMove,
}

pub type Result<T> = std::result::Result<T, Error>;
