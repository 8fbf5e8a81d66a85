use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Mines not placed yet, waiting for the first reveal.
    #[default]
    Pending,
    Active,
    Won,
    Lost,
}

impl SessionState {
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Derives the outcome from cell state alone: lost once any mine is revealed, won once every other cell is.
pub fn evaluate(grid: &Grid) -> SessionState {
    let mut all_safe_revealed = true;
    for (_, cell) in grid.iter_cells() {
        match (cell.is_mine(), cell.is_revealed()) {
            (true, true) => return SessionState::Lost,
            (false, false) => all_safe_revealed = false,
            _ => {}
        }
    }
    if all_safe_revealed {
        SessionState::Won
    } else {
        SessionState::Active
    }
}
