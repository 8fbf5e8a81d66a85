use crate::*;
pub use random::*;

mod random;

/// Upper bound on draws from a [`MineSource`], per grid cell, before placement gives up.
const DRAWS_PER_CELL: CellCount = 64;

/// Where mine coordinates come from. Tests swap in a [`ScriptedSource`] to get exact layouts.
pub trait MineSource {
    /// Next candidate coordinate inside a grid of `size`, or `None` when the source has nothing left to give.
    fn sample(&mut self, size: Coord2) -> Option<Coord2>;
}

impl<S: MineSource + ?Sized> MineSource for &mut S {
    fn sample(&mut self, size: Coord2) -> Option<Coord2> {
        (**self).sample(size)
    }
}

/// Number of in-bounds cells within `radius` of `safe_point`.
pub fn safety_zone_size(grid: &Grid, safe_point: Coord2, radius: Coord) -> CellCount {
    chebyshev_zone(safe_point, radius, grid.size()).count() as CellCount
}

fn in_safety_zone(coords: Coord2, safe_point: Coord2, radius: Coord) -> bool {
    coords.0.abs_diff(safe_point.0) <= radius && coords.1.abs_diff(safe_point.1) <= radius
}

/// Places exactly `mine_count` mines, none of them within `safety_radius` (Chebyshev distance) of `safe_point`.
///
/// Draws candidates from `source` and rejects those that are out of bounds, in the safety zone, already revealed or
/// already mined. The
/// number of draws is bounded; if the source stalls, the grid is left without mines and
/// [`GameError::PlacementStalled`] is returned. Adjacency is not computed here, see [`compute_adjacency`].
pub fn place_mines(
    grid: &mut Grid,
    mine_count: CellCount,
    safe_point: Coord2,
    safety_radius: Coord,
    mut source: impl MineSource,
) -> Result<()> {
    let safe_point = grid.validate_coords(safe_point)?;
    if grid.is_populated() {
        return Err(GameError::AlreadyPopulated);
    }

    let available = grid.total_cells() - safety_zone_size(grid, safe_point, safety_radius);
    if mine_count > available {
        return Err(GameError::InsufficientSpace {
            requested: mine_count,
            available,
        });
    }

    let size = grid.size();
    let max_draws = grid.total_cells().saturating_mul(DRAWS_PER_CELL);
    let mut placed = 0;
    let mut draws = 0;

    while placed < mine_count {
        let candidate = if draws < max_draws {
            draws += 1;
            source.sample(size)
        } else {
            None
        };
        let Some(coords) = candidate else {
            log::warn!(
                "Mine source stalled after {} draws, placed {} of {} mines",
                draws,
                placed,
                mine_count
            );
            grid.clear_mines();
            return Err(GameError::PlacementStalled {
                placed,
                requested: mine_count,
            });
        };

        if !grid.contains(coords)
            || in_safety_zone(coords, safe_point, safety_radius)
            || grid[coords].is_revealed()
            || grid[coords].is_mine()
        {
            continue;
        }

        grid.place_mine(coords);
        placed += 1;
    }

    grid.mark_populated();
    log::debug!(
        "Placed {} mines in {} draws, safe point {:?} radius {}",
        placed,
        draws,
        safe_point,
        safety_radius
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::tests::assert_counters_consistent;
    use alloc::vec;

    #[test]
    fn places_exact_count_outside_safety_zone() {
        for seed in 0..50 {
            let mut grid = Grid::new(10, 10, Kernel::moore()).unwrap();
            place_mines(&mut grid, 40, (5, 5), 2, RandomSource::seeded(seed)).unwrap();

            assert_eq!(grid.mine_count(), 40);
            for coords in chebyshev_zone((5, 5), 2, grid.size()) {
                assert!(!grid[coords].is_mine(), "seed {seed} mined {coords:?}");
            }
        }
    }

    #[test]
    fn scripted_source_gives_exact_layout() {
        let mut grid = Grid::new(4, 4, Kernel::moore()).unwrap();
        // (0, 0) falls in the safety zone and (3, 3) repeats, both get skipped
        let source = ScriptedSource::new(vec![(0, 0), (3, 3), (3, 3), (0, 3), (3, 0)]);

        place_mines(&mut grid, 3, (0, 0), 1, source).unwrap();

        let mines: alloc::vec::Vec<_> = grid
            .iter_cells()
            .filter(|(_, cell)| cell.is_mine())
            .map(|(coords, _)| coords)
            .collect();
        assert_eq!(mines, [(0, 3), (3, 0), (3, 3)]);
    }

    #[test]
    fn revealed_cells_are_never_mined() {
        let mut grid = Grid::new(4, 4, Kernel::moore()).unwrap();
        grid.set_cell((2, 2), Cell::new(false, Visibility::Revealed, 0))
            .unwrap();
        let source = ScriptedSource::new(vec![(2, 2), (3, 3)]);

        place_mines(&mut grid, 1, (0, 0), 0, source).unwrap();

        assert!(!grid[(2, 2)].is_mine());
        assert!(grid[(3, 3)].is_mine());
        assert_eq!(grid.outcome(), SessionState::Active);
        assert_counters_consistent(&grid);
    }

    #[test]
    fn too_many_mines_is_rejected_up_front() {
        let mut grid = Grid::new(5, 5, Kernel::moore()).unwrap();

        let err = place_mines(&mut grid, 17, (2, 2), 1, RandomSource::seeded(1)).unwrap_err();

        assert_eq!(
            err,
            GameError::InsufficientSpace {
                requested: 17,
                available: 16
            }
        );
        assert_eq!(grid.mine_count(), 0);
    }

    #[test]
    fn board_can_be_filled_right_up_to_the_safety_zone() {
        let mut grid = Grid::new(5, 5, Kernel::moore()).unwrap();

        place_mines(&mut grid, 21, (0, 0), 1, RandomSource::seeded(7)).unwrap();

        assert_eq!(grid.mine_count(), 21);
        assert_eq!(grid.safe_cell_count(), 4);
    }

    #[test]
    fn exhausted_source_fails_without_leaving_mines() {
        let mut grid = Grid::new(4, 4, Kernel::moore()).unwrap();
        let source = ScriptedSource::new(vec![(3, 3), (3, 2)]);

        let err = place_mines(&mut grid, 3, (0, 0), 1, source).unwrap_err();

        assert_eq!(
            err,
            GameError::PlacementStalled {
                placed: 2,
                requested: 3
            }
        );
        assert_eq!(grid.mine_count(), 0);
        assert!(!grid.is_populated());
        assert_counters_consistent(&grid);
    }

    #[test]
    fn source_stuck_on_the_safe_point_does_not_hang() {
        struct Stuck;
        impl MineSource for Stuck {
            fn sample(&mut self, _size: Coord2) -> Option<Coord2> {
                Some((1, 1))
            }
        }

        let mut grid = Grid::new(3, 3, Kernel::moore()).unwrap();
        let err = place_mines(&mut grid, 1, (1, 1), 0, Stuck).unwrap_err();

        assert!(matches!(err, GameError::PlacementStalled { placed: 0, .. }));
    }

    #[test]
    fn second_placement_is_rejected() {
        let mut grid = Grid::new(4, 4, Kernel::moore()).unwrap();
        place_mines(&mut grid, 2, (0, 0), 1, RandomSource::seeded(3)).unwrap();

        assert_eq!(
            place_mines(&mut grid, 2, (0, 0), 1, RandomSource::seeded(3)),
            Err(GameError::AlreadyPopulated)
        );
        assert_eq!(
            place_mines(&mut grid, 2, (4, 0), 1, RandomSource::seeded(3)),
            Err(GameError::OutOfBounds((4, 0)))
        );
    }
}
