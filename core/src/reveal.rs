use alloc::collections::{BTreeSet, VecDeque};

use crate::*;

/// Classic minesweeper reveal: opens `coords` and, when it has no adjacent mines, flood-fills outwards through every
/// connected zero-count cell plus the numbered cells bordering them.
///
/// Flagged cells are locked and reject the reveal with [`GameError::FlaggedCell`]; they also stop the flood fill.
pub fn reveal_cascade(grid: &mut Grid, coords: Coord2) -> Result<RevealOutcome> {
    use RevealOutcome::*;

    let coords = grid.validate_coords(coords)?;
    let cell = grid[coords];

    match cell.visibility() {
        Visibility::Flagged => Err(GameError::FlaggedCell(coords)),
        Visibility::Revealed => Ok(Unchanged),
        Visibility::Hidden if cell.is_mine() => {
            grid.open(coords);
            log::debug!("Revealed mine at {:?}", coords);
            Ok(HitMine)
        }
        Visibility::Hidden => {
            let opened = flood_open(grid, coords);
            log::debug!("Revealed {:?}, {} cells opened", coords, opened);
            Ok(Safe)
        }
    }
}

/// Fog clearing for units moving over the grid: opens the occupied cell and every in-bounds kernel neighbor, without
/// cascading.
///
/// The occupied cell is always opened, even when flagged, and hitting a mine there is reported as
/// [`RevealOutcome::HitMine`]. Surrounding cells that are flagged or hold a mine stay closed.
pub fn reveal_neighborhood(grid: &mut Grid, coords: Coord2) -> Result<RevealOutcome> {
    use RevealOutcome::*;

    let coords = grid.validate_coords(coords)?;
    let center = grid[coords];

    let mut outcome = match (center.is_revealed(), center.is_mine()) {
        (true, _) => Unchanged,
        (false, true) => {
            grid.open(coords);
            log::debug!("Unit stepped on mine at {:?}", coords);
            HitMine
        }
        (false, false) => {
            grid.open(coords);
            Safe
        }
    };

    for pos in grid.iter_neighbors(coords) {
        let cell = grid[pos];
        if cell.is_hidden() && !cell.is_mine() {
            grid.open(pos);
            outcome = outcome | Safe;
        }
    }

    log::trace!("Neighborhood reveal at {:?}: {:?}", coords, outcome);
    Ok(outcome)
}

/// On a revealed number whose flagged neighbors account for all of its mines, reveals every other neighbor. On a
/// closed cell this is the same as [`reveal_cascade`].
pub fn chord_reveal(grid: &mut Grid, coords: Coord2) -> Result<RevealOutcome> {
    let coords = grid.validate_coords(coords)?;
    let cell = grid[coords];

    if !cell.is_revealed() {
        return reveal_cascade(grid, coords);
    }

    let count = cell.adjacent_mine_count();
    if cell.is_mine() || count == 0 || count != count_flagged_neighbors(grid, coords) {
        return Ok(RevealOutcome::Unchanged);
    }

    let mut outcome = RevealOutcome::Unchanged;
    for pos in grid.iter_neighbors(coords) {
        if grid[pos].is_hidden() {
            outcome = outcome | reveal_cascade(grid, pos)?;
        }
    }
    Ok(outcome)
}

pub fn count_flagged_neighbors(grid: &Grid, coords: Coord2) -> u8 {
    grid.iter_neighbors(coords)
        .filter(|&pos| grid[pos].is_flagged())
        .count() as u8
}

/// Opens a hidden safe cell and, if its count is zero, the whole connected zero region around it.
///
/// Breadth-first over an explicit queue, so the order cells open in follows kernel order and deep regions cannot
/// exhaust the stack. Returns the number of cells opened.
fn flood_open(grid: &mut Grid, coords: Coord2) -> CellCount {
    grid.open(coords);
    let mut opened = 1;

    if grid[coords].adjacent_mine_count() != 0 {
        return opened;
    }

    let mut visited = BTreeSet::from([coords]);
    let mut to_visit: VecDeque<_> = grid
        .iter_neighbors(coords)
        .filter(|&pos| grid[pos].is_hidden())
        .collect();
    log::trace!(
        "Starting flood-fill from {:?}, initial neighbors: {:?}",
        coords,
        to_visit
    );

    while let Some(visit_coords) = to_visit.pop_front() {
        if !visited.insert(visit_coords) {
            continue;
        }

        // flags stop the fill, mines never border a zero
        let cell = grid[visit_coords];
        if !cell.is_hidden() || cell.is_mine() {
            continue;
        }

        grid.open(visit_coords);
        opened += 1;

        if cell.adjacent_mine_count() == 0 {
            to_visit.extend(
                grid.iter_neighbors(visit_coords)
                    .filter(|&pos| grid[pos].is_hidden())
                    .filter(|pos| !visited.contains(pos)),
            );
        }
    }

    opened
}
