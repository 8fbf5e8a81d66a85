use thiserror::Error;

use crate::{CellCount, Coord2};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Coordinates {0:?} are outside the grid")]
    OutOfBounds(Coord2),
    #[error("Cannot place {requested} mines, only {available} cells lie outside the safety zone")]
    InsufficientSpace {
        requested: CellCount,
        available: CellCount,
    },
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Cell {0:?} is flagged, unflag it before revealing")]
    FlaggedCell(Coord2),
    #[error("Grid width and height must both be at least 1")]
    InvalidDimensions,
    #[error("Kernel must be non-empty, without duplicates, and must not contain (0, 0)")]
    InvalidKernel,
    #[error("Mines have already been placed on this grid")]
    AlreadyPopulated,
    #[error("Mine source stalled after placing {placed} of {requested} mines")]
    PlacementStalled {
        placed: CellCount,
        requested: CellCount,
    },
}

impl GameError {
    /// Whether the error rejects a move that the current session or cell state does not allow.
    pub const fn is_invalid_transition(self) -> bool {
        matches!(self, Self::AlreadyEnded | Self::FlaggedCell(_))
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
