#![no_std]

extern crate alloc;

use core::ops::BitOr;
use serde::{Deserialize, Serialize};

pub use adjacency::*;
pub use cell::*;
pub use error::*;
pub use flag::*;
pub use generator::*;
pub use grid::*;
pub use outcome::*;
pub use reveal::*;
pub use session::*;
pub use types::*;

mod adjacency;
mod cell;
mod error;
mod flag;
mod generator;
mod grid;
mod outcome;
mod reveal;
mod session;
mod types;

/// Which reveal rule [`Session::reveal`] applies.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealStrategy {
    /// Open one cell, flood-fill through zero counts.
    #[default]
    Cascade,
    /// Open the kernel around the cell, no flood fill.
    Neighborhood,
}

/// When mines go onto the grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// On the first reveal, keeping the revealed cell's surroundings clear.
    #[default]
    Deferred,
    /// When the session is created, keeping the surroundings of `safe_point` (usually a spawn point) clear.
    Immediate { safe_point: Coord2 },
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinCondition {
    #[default]
    AllSafeRevealed,
    /// Won when a move targets this cell and it opens safely, or when every safe cell is revealed. Opening it
    /// as a side effect of a cascade or fog clearing does not count.
    ReachCell(Coord2),
}

/// Everything needed to start a [`Session`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub height: Coord,
    pub width: Coord,
    pub mines: CellCount,
    pub kernel: KernelShape,
    /// Chebyshev radius kept free of mines around the safe point.
    pub safety_radius: Coord,
    pub strategy: RevealStrategy,
    pub placement: Placement,
    pub win: WinCondition,
    /// Ticks allowed before the session is lost, unlimited if unset.
    pub tick_limit: Option<u32>,
    pub seed: Option<u64>,
}

impl SessionConfig {
    /// Click-to-reveal puzzle: mines placed on the first click, which is guaranteed a zero.
    pub fn classic(height: Coord, width: Coord, mines: CellCount) -> Self {
        Self {
            height,
            width,
            mines,
            kernel: KernelShape::Moore,
            safety_radius: 1,
            strategy: RevealStrategy::Cascade,
            placement: Placement::Deferred,
            win: WinCondition::AllSafeRevealed,
            tick_limit: None,
            seed: None,
        }
    }

    /// Snake variant: fog clears around the head as it moves, starting from a mine-free spawn area.
    pub fn crawler(height: Coord, width: Coord, mines: CellCount, spawn: Coord2) -> Self {
        Self {
            safety_radius: 2,
            strategy: RevealStrategy::Neighborhood,
            placement: Placement::Immediate { safe_point: spawn },
            ..Self::classic(height, width, mines)
        }
    }

    /// Platformer variant: wide tiles, fog clears where the player lands, reaching `goal` wins.
    pub fn platformer(
        height: Coord,
        width: Coord,
        mines: CellCount,
        spawn: Coord2,
        goal: Coord2,
    ) -> Self {
        Self {
            kernel: KernelShape::Wide,
            win: WinCondition::ReachCell(goal),
            ..Self::crawler(height, width, mines, spawn)
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_tick_limit(mut self, ticks: u32) -> Self {
        self.tick_limit = Some(ticks);
        self
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.height, self.width)
    }

    /// Checks the configuration can always be played, returning the kernel it describes.
    ///
    /// For deferred placement the safe point is unknown, so the mine count is checked against the largest safety zone
    /// the grid can hold.
    pub fn validate(&self) -> Result<Kernel> {
        if self.height == 0 || self.width == 0 {
            return Err(GameError::InvalidDimensions);
        }
        let kernel = self.kernel.build()?;
        let size = (self.height, self.width);
        let contains = |(row, col): Coord2| row < size.0 && col < size.1;

        let zone_cells = match self.placement {
            Placement::Immediate { safe_point } => {
                if !contains(safe_point) {
                    return Err(GameError::OutOfBounds(safe_point));
                }
                chebyshev_zone(safe_point, self.safety_radius, size).count() as CellCount
            }
            Placement::Deferred => {
                let span = self.safety_radius.saturating_mul(2).saturating_add(1);
                mult(span.min(self.height), span.min(self.width))
            }
        };

        if let WinCondition::ReachCell(goal) = self.win {
            if !contains(goal) {
                return Err(GameError::OutOfBounds(goal));
            }
        }

        let available = self.total_cells() - zone_cells;
        if self.mines > available {
            return Err(GameError::InsufficientSpace {
                requested: self.mines,
                available,
            });
        }

        Ok(kernel)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::classic(9, 9, 10)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    Unchanged,
    Safe,
    HitMine,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            Unchanged => false,
            Safe => true,
            HitMine => true,
        }
    }
}

/// Used to merge outcomes when several cells are revealed at once.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Safe, _) => Safe,
            (_, Safe) => Safe,
            (Unchanged, Unchanged) => Unchanged,
        }
    }
}
