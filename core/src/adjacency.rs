use alloc::vec::Vec;

use crate::*;

/// Stores, for every non-mine cell, how many kernel neighbors are mines. Mines keep a count of 0.
pub fn compute_adjacency(grid: &mut Grid) {
    let counts: Vec<(Coord2, u8)> = grid
        .iter_cells()
        .map(|(coords, cell)| {
            let count = if cell.is_mine() {
                0
            } else {
                count_adjacent_mines(grid, coords)
            };
            (coords, count)
        })
        .collect();

    for (coords, count) in counts {
        grid.set_adjacent_mine_count(coords, count);
    }
}

pub(crate) fn count_adjacent_mines(grid: &Grid, coords: Coord2) -> u8 {
    // kernels never exceed u8::MAX offsets
    grid.iter_neighbors(coords)
        .filter(|&pos| grid[pos].is_mine())
        .count() as u8
}
