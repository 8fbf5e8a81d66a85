use serde::{Deserialize, Serialize};

/// What the player can currently see of a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Hidden,
    Revealed,
    Flagged,
}

/// Single grid cell. Its coordinates are implied by its position in the [`Grid`](crate::Grid).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    mine: bool,
    visibility: Visibility,
    adjacent_mines: u8,
}

impl Cell {
    pub const fn new(mine: bool, visibility: Visibility, adjacent_mines: u8) -> Self {
        Self {
            mine,
            visibility,
            adjacent_mines,
        }
    }

    pub const fn is_mine(self) -> bool {
        self.mine
    }

    pub const fn visibility(self) -> Visibility {
        self.visibility
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self.visibility, Visibility::Revealed)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self.visibility, Visibility::Flagged)
    }

    pub const fn is_hidden(self) -> bool {
        matches!(self.visibility, Visibility::Hidden)
    }

    pub const fn is_unrevealed(self) -> bool {
        matches!(self.visibility, Visibility::Hidden | Visibility::Flagged)
    }

    /// Number of mines among the kernel neighbors, always 0 for mines themselves.
    pub const fn adjacent_mine_count(self) -> u8 {
        self.adjacent_mines
    }

    pub(crate) fn set_mine(&mut self, mine: bool) {
        self.mine = mine;
    }

    pub(crate) fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    pub(crate) fn set_adjacent_mine_count(&mut self, count: u8) {
        self.adjacent_mines = count;
    }
}
