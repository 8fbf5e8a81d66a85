use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Fixed-size board of [`Cell`]s plus the kernel that defines adjacency on it.
///
/// Running counters are kept for revealed cells, flags and mines. Every cell mutation goes through the methods below,
/// which is what keeps those counters in step with the cells; [`evaluate`] recomputes everything from the cells alone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridRepr")]
pub struct Grid {
    cells: Array2<Cell>,
    kernel: Kernel,
    populated: bool,
    mine_count: CellCount,
    flag_count: CellCount,
    revealed_safe: CellCount,
    revealed_mines: CellCount,
}

/// Deserialized form of a [`Grid`]. Counters and adjacency are rebuilt from the cells instead of being trusted.
#[derive(Deserialize)]
struct GridRepr {
    cells: Array2<Cell>,
    kernel: Kernel,
    #[serde(default)]
    populated: bool,
}

impl TryFrom<GridRepr> for Grid {
    type Error = GameError;

    fn try_from(repr: GridRepr) -> Result<Self> {
        let (rows, cols) = repr.cells.dim();
        let height = Coord::try_from(rows).map_err(|_| GameError::InvalidDimensions)?;
        let width = Coord::try_from(cols).map_err(|_| GameError::InvalidDimensions)?;

        let mut grid = Self::new(height, width, repr.kernel)?;
        for ((row, col), &cell) in repr.cells.indexed_iter() {
            grid.replace((row as Coord, col as Coord), cell);
        }
        grid.populated = repr.populated || grid.mine_count > 0;
        compute_adjacency(&mut grid);
        Ok(grid)
    }
}

impl Grid {
    pub fn new(height: Coord, width: Coord, kernel: Kernel) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(GameError::InvalidDimensions);
        }
        Ok(Self {
            cells: Array2::default((height, width).to_nd_index()),
            kernel,
            populated: false,
            mine_count: 0,
            flag_count: 0,
            revealed_safe: 0,
            revealed_mines: 0,
        })
    }

    /// Builds a populated grid with mines at exactly `mine_coords`, adjacency already computed.
    pub fn from_mine_coords(
        height: Coord,
        width: Coord,
        kernel: Kernel,
        mine_coords: &[Coord2],
    ) -> Result<Self> {
        let mut grid = Self::new(height, width, kernel)?;
        for &coords in mine_coords {
            grid.validate_coords(coords)?;
        }
        for &coords in mine_coords {
            grid.place_mine(coords);
        }
        grid.populated = true;
        compute_adjacency(&mut grid);
        Ok(grid)
    }

    /// `(height, width)`
    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        // Grid::new only accepts Coord dimensions, so these cannot truncate.
        (rows as Coord, cols as Coord)
    }

    pub fn height(&self) -> Coord {
        self.size().0
    }

    pub fn width(&self) -> Coord {
        self.size().1
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    /// Revealed cells, mines included.
    pub fn revealed_count(&self) -> CellCount {
        self.revealed_safe + self.revealed_mines
    }

    /// Whether mines have been placed on this grid.
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    pub fn contains(&self, (row, col): Coord2) -> bool {
        let (rows, cols) = self.size();
        row < rows && col < cols
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds(coords))
        }
    }

    pub fn cell(&self, coords: Coord2) -> Result<&Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(&self.cells[coords.to_nd_index()])
    }

    /// Overwrites a cell, keeping the grid counters consistent. Adjacency counts of the surrounding cells are not
    /// touched; run [`compute_adjacency`] after changing mines this way.
    pub fn set_cell(&mut self, coords: Coord2, cell: Cell) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        if cell.is_mine() {
            self.populated = true;
        }
        self.replace(coords, cell);
        Ok(())
    }

    /// In-bounds kernel neighbors of `coords`, in kernel order.
    pub fn neighbors_of(&self, coords: Coord2) -> Result<NeighborIter> {
        let coords = self.validate_coords(coords)?;
        Ok(self.iter_neighbors(coords))
    }

    /// Every cell with its coordinates, row-major.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, &Cell)> {
        self.cells
            .indexed_iter()
            .map(|((row, col), cell)| ((row as Coord, col as Coord), cell))
    }

    /// Outcome derived from the running counters, equivalent to [`evaluate`].
    pub fn outcome(&self) -> SessionState {
        if self.revealed_mines > 0 {
            SessionState::Lost
        } else if self.revealed_safe == self.safe_cell_count() {
            SessionState::Won
        } else {
            SessionState::Active
        }
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.kernel.iter_neighbors(coords, self.size())
    }

    pub(crate) fn mark_populated(&mut self) {
        self.populated = true;
    }

    pub(crate) fn place_mine(&mut self, coords: Coord2) {
        let mut cell = self[coords];
        if !cell.is_mine() {
            cell.set_mine(true);
            cell.set_adjacent_mine_count(0);
            self.replace(coords, cell);
        }
    }

    pub(crate) fn clear_mines(&mut self) {
        let mined: Vec<Coord2> = self
            .iter_cells()
            .filter(|(_, cell)| cell.is_mine())
            .map(|(coords, _)| coords)
            .collect();
        for coords in mined {
            let mut cell = self[coords];
            cell.set_mine(false);
            self.replace(coords, cell);
        }
    }

    pub(crate) fn set_adjacent_mine_count(&mut self, coords: Coord2, count: u8) {
        self.cells[coords.to_nd_index()].set_adjacent_mine_count(count);
    }

    /// Marks a cell revealed, clearing a flag if there was one. Returns whether anything changed.
    pub(crate) fn open(&mut self, coords: Coord2) -> bool {
        let cell = self.cells[coords.to_nd_index()];
        if cell.is_revealed() {
            return false;
        }
        let mut opened = cell;
        opened.set_visibility(Visibility::Revealed);
        self.replace(coords, opened);
        true
    }

    /// Switches a non-revealed cell between hidden and flagged. Returns whether anything changed.
    pub(crate) fn set_flagged(&mut self, coords: Coord2, flagged: bool) -> bool {
        let cell = self.cells[coords.to_nd_index()];
        let visibility = if flagged {
            Visibility::Flagged
        } else {
            Visibility::Hidden
        };
        if cell.is_revealed() || cell.visibility() == visibility {
            return false;
        }
        let mut marked = cell;
        marked.set_visibility(visibility);
        self.replace(coords, marked);
        true
    }

    /// The only place cells are written; counters follow every write.
    fn replace(&mut self, coords: Coord2, cell: Cell) {
        let old = self.cells[coords.to_nd_index()];
        self.uncount(old);
        self.count(cell);
        self.cells[coords.to_nd_index()] = cell;
    }

    fn count(&mut self, cell: Cell) {
        if cell.is_mine() {
            self.mine_count += 1;
        }
        match (cell.visibility(), cell.is_mine()) {
            (Visibility::Revealed, true) => self.revealed_mines += 1,
            (Visibility::Revealed, false) => self.revealed_safe += 1,
            (Visibility::Flagged, _) => self.flag_count += 1,
            (Visibility::Hidden, _) => {}
        }
    }

    fn uncount(&mut self, cell: Cell) {
        if cell.is_mine() {
            self.mine_count -= 1;
        }
        match (cell.visibility(), cell.is_mine()) {
            (Visibility::Revealed, true) => self.revealed_mines -= 1,
            (Visibility::Revealed, false) => self.revealed_safe -= 1,
            (Visibility::Flagged, _) => self.flag_count -= 1,
            (Visibility::Hidden, _) => {}
        }
    }
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Recounts everything the grid tracks incrementally and compares.
    pub(crate) fn assert_counters_consistent(grid: &Grid) {
        let mut mines = 0;
        let mut flags = 0;
        let mut revealed = 0;
        for (_, cell) in grid.iter_cells() {
            mines += CellCount::from(cell.is_mine());
            flags += CellCount::from(cell.is_flagged());
            revealed += CellCount::from(cell.is_revealed());
        }
        assert_eq!(grid.mine_count(), mines);
        assert_eq!(grid.flag_count(), flags);
        assert_eq!(grid.revealed_count(), revealed);
        assert_eq!(grid.outcome(), evaluate(grid));
    }

    #[test]
    fn new_grid_is_blank() {
        let grid = Grid::new(3, 4, Kernel::moore()).unwrap();

        assert_eq!(grid.size(), (3, 4));
        assert_eq!(grid.total_cells(), 12);
        assert!(!grid.is_populated());
        assert!(grid.iter_cells().all(|(_, cell)| *cell == Cell::default()));
        assert_counters_consistent(&grid);
    }

    #[test]
    fn zero_sized_grid_is_rejected() {
        assert_eq!(
            Grid::new(0, 4, Kernel::moore()),
            Err(GameError::InvalidDimensions)
        );
        assert_eq!(
            Grid::new(4, 0, Kernel::moore()),
            Err(GameError::InvalidDimensions)
        );
    }

    #[test]
    fn out_of_bounds_access_fails_loudly() {
        let mut grid = Grid::new(2, 3, Kernel::moore()).unwrap();

        assert_eq!(grid.cell((2, 0)), Err(GameError::OutOfBounds((2, 0))));
        assert_eq!(grid.cell((0, 3)), Err(GameError::OutOfBounds((0, 3))));
        assert_eq!(
            grid.set_cell((5, 5), Cell::default()),
            Err(GameError::OutOfBounds((5, 5)))
        );
        assert!(grid.neighbors_of((2, 3)).is_err());
    }

    #[test]
    fn set_cell_keeps_counters_in_step() {
        let mut grid = Grid::new(3, 3, Kernel::moore()).unwrap();

        grid.set_cell((0, 0), Cell::new(true, Visibility::Hidden, 0))
            .unwrap();
        grid.set_cell((1, 1), Cell::new(false, Visibility::Revealed, 1))
            .unwrap();
        grid.set_cell((2, 2), Cell::new(false, Visibility::Flagged, 0))
            .unwrap();
        assert_counters_consistent(&grid);
        assert!(grid.is_populated());

        grid.set_cell((0, 0), Cell::default()).unwrap();
        assert_eq!(grid.mine_count(), 0);
        assert_counters_consistent(&grid);
    }

    #[test]
    fn mines_under_revealed_cells_keep_counters_in_step() {
        let mut grid = Grid::new(3, 3, Kernel::moore()).unwrap();
        grid.set_cell((2, 2), Cell::new(false, Visibility::Revealed, 0))
            .unwrap();

        grid.place_mine((2, 2));
        assert_eq!(grid.outcome(), SessionState::Lost);
        assert_counters_consistent(&grid);

        grid.clear_mines();
        assert_eq!(grid.mine_count(), 0);
        assert_counters_consistent(&grid);
    }

    #[test]
    fn deserializing_rebuilds_counters_from_cells() {
        let mut grid = Grid::from_mine_coords(2, 2, Kernel::moore(), &[(1, 1)]).unwrap();
        grid.open((0, 0));

        let mut value = serde_json::to_value(&grid).unwrap();
        value["revealed_safe"] = 3.into();
        value["cells"]["data"][1]["adjacent_mines"] = 7.into();
        let loaded: Grid = serde_json::from_value(value).unwrap();

        assert_eq!(loaded, grid);
        assert_eq!(loaded.outcome(), SessionState::Active);
        assert_counters_consistent(&loaded);
    }

    #[test]
    fn deserializing_rejects_bad_kernel() {
        let mut value = serde_json::to_value(Grid::new(2, 2, Kernel::moore()).unwrap()).unwrap();
        value["kernel"]["offsets"] = serde_json::to_value([(0, 0), (0, 1)]).unwrap();

        assert!(serde_json::from_value::<Grid>(value).is_err());
    }

    #[test]
    fn from_mine_coords_validates_every_coordinate() {
        assert_eq!(
            Grid::from_mine_coords(2, 2, Kernel::moore(), &[(0, 0), (2, 0)]),
            Err(GameError::OutOfBounds((2, 0)))
        );

        let grid = Grid::from_mine_coords(2, 2, Kernel::moore(), &[(0, 0), (0, 0)]).unwrap();
        assert_eq!(grid.mine_count(), 1);
        assert_eq!(grid[(1, 1)].adjacent_mine_count(), 1);
    }

    #[test]
    fn neighbors_follow_kernel_order() {
        let grid = Grid::new(4, 4, Kernel::moore()).unwrap();
        let neighbors: alloc::vec::Vec<_> = grid.neighbors_of((1, 1)).unwrap().collect();

        assert_eq!(
            neighbors,
            [
                (0, 0),
                (0, 1),
                (0, 2),
                (1, 0),
                (1, 2),
                (2, 0),
                (2, 1),
                (2, 2)
            ]
        );
    }
}
