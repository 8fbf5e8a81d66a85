use crate::*;

/// Flags a hidden cell or unflags a flagged one, returning the new total flag count. Revealed cells are left alone.
pub fn toggle_flag(grid: &mut Grid, coords: Coord2) -> Result<CellCount> {
    let coords = grid.validate_coords(coords)?;

    match grid[coords].visibility() {
        Visibility::Hidden => {
            grid.set_flagged(coords, true);
        }
        Visibility::Flagged => {
            grid.set_flagged(coords, false);
        }
        Visibility::Revealed => {}
    }

    Ok(grid.flag_count())
}

/// How many mines have not been flagged yet, negative when there are more flags than mines.
pub fn mines_left(grid: &Grid) -> i64 {
    i64::from(grid.mine_count()) - i64::from(grid.flag_count())
}
