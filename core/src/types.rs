use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Single coordinate axis used for grid height, width, and positions.
pub type Coord = u16;

/// Count type used for mine counts, flag counts and total-cell counts.
pub type CellCount = u32;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Relative `(Δrow, Δcol)` displacement inside a [`Kernel`].
pub type Offset = (i8, i8);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

const MOORE: [Offset; 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const WIDE: [Offset; 14] = [
    (-1, -2),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (-1, 2),
    (0, -2),
    (0, -1),
    (0, 1),
    (0, 2),
    (1, -2),
    (1, -1),
    (1, 0),
    (1, 1),
    (1, 2),
];

/// Set of offsets that defines which cells are adjacent, both for counting mines and for propagating reveals.
///
/// Offsets keep the order they were given in, so neighbor iteration (and therefore flood-fill order) is
/// deterministic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "KernelRepr")]
pub struct Kernel {
    offsets: SmallVec<[Offset; 16]>,
}

#[derive(Deserialize)]
struct KernelRepr {
    offsets: Vec<Offset>,
}

impl TryFrom<KernelRepr> for Kernel {
    type Error = GameError;

    fn try_from(repr: KernelRepr) -> Result<Self> {
        Self::from_offsets(repr.offsets)
    }
}

impl Kernel {
    /// Eight-connected 3x3 neighborhood.
    pub fn moore() -> Self {
        Self {
            offsets: SmallVec::from_slice(&MOORE),
        }
    }

    /// 3 rows by 5 columns, for tiles that are twice as wide on screen as they are tall.
    pub fn wide() -> Self {
        Self {
            offsets: SmallVec::from_slice(&WIDE),
        }
    }

    pub fn from_offsets(offsets: impl IntoIterator<Item = Offset>) -> Result<Self> {
        let mut collected: SmallVec<[Offset; 16]> = SmallVec::new();
        for offset in offsets {
            if offset == (0, 0) || collected.contains(&offset) {
                return Err(GameError::InvalidKernel);
            }
            collected.push(offset);
        }
        if collected.is_empty() || collected.len() > usize::from(u8::MAX) {
            return Err(GameError::InvalidKernel);
        }
        Ok(Self { offsets: collected })
    }

    pub fn offsets(&self) -> &[Offset] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// In-bounds neighbors of `center` on a grid of `bounds`, in offset order.
    pub fn iter_neighbors(&self, center: Coord2, bounds: Coord2) -> NeighborIter {
        NeighborIter::new(self.offsets.clone(), center, bounds)
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::moore()
    }
}

/// Serializable description of a kernel, used in session configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelShape {
    #[default]
    Moore,
    Wide,
    Custom(Vec<Offset>),
}

impl KernelShape {
    pub fn build(&self) -> Result<Kernel> {
        match self {
            Self::Moore => Ok(Kernel::moore()),
            Self::Wide => Ok(Kernel::wide()),
            Self::Custom(offsets) => Kernel::from_offsets(offsets.iter().copied()),
        }
    }
}

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: Offset, bounds: Coord2) -> Option<Coord2> {
    let (row, col) = coords;
    let (d_row, d_col) = delta;
    let (rows, cols) = bounds;

    let next_row = row.checked_add_signed(d_row.into())?;
    if next_row >= rows {
        return None;
    }

    let next_col = col.checked_add_signed(d_col.into())?;
    if next_col >= cols {
        return None;
    }

    Some((next_row, next_col))
}

#[derive(Debug)]
pub struct NeighborIter {
    offsets: SmallVec<[Offset; 16]>,
    center: Coord2,
    bounds: Coord2,
    index: usize,
}

impl NeighborIter {
    fn new(offsets: SmallVec<[Offset; 16]>, center: Coord2, bounds: Coord2) -> Self {
        Self {
            offsets,
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&delta) = self.offsets.get(self.index) {
            self.index += 1;
            if let Some(next_item) = apply_delta(self.center, delta, self.bounds) {
                return Some(next_item);
            }
        }
        None
    }
}

/// Every in-bounds coordinate within Chebyshev distance `radius` of `center`, row-major.
pub fn chebyshev_zone(
    center: Coord2,
    radius: Coord,
    bounds: Coord2,
) -> impl Iterator<Item = Coord2> {
    let (rows, cols) = bounds;
    let row_start = center.0.saturating_sub(radius);
    let row_end = center.0.saturating_add(radius).min(rows.saturating_sub(1));
    let col_start = center.1.saturating_sub(radius);
    let col_end = center.1.saturating_add(radius).min(cols.saturating_sub(1));
    (row_start..=row_end).flat_map(move |row| (col_start..=col_end).map(move |col| (row, col)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moore_neighbors_at_corner_are_clipped() {
        let kernel = Kernel::moore();
        let neighbors: Vec<_> = kernel.iter_neighbors((0, 0), (3, 3)).collect();
        assert_eq!(neighbors, [(0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn wide_kernel_reaches_two_columns() {
        let kernel = Kernel::wide();
        assert_eq!(kernel.len(), 14);
        let neighbors: Vec<_> = kernel.iter_neighbors((1, 2), (3, 5)).collect();
        assert_eq!(neighbors.len(), 14);
        assert!(neighbors.contains(&(0, 0)));
        assert!(neighbors.contains(&(2, 4)));
    }

    #[test]
    fn custom_kernel_rejects_center_and_duplicates() {
        assert_eq!(Kernel::from_offsets([(0, 0)]), Err(GameError::InvalidKernel));
        assert_eq!(
            Kernel::from_offsets([(0, 1), (0, 1)]),
            Err(GameError::InvalidKernel)
        );
        assert_eq!(Kernel::from_offsets(core::iter::empty()), Err(GameError::InvalidKernel));

        let cross = Kernel::from_offsets([(-1, 0), (0, -1), (0, 1), (1, 0)]).unwrap();
        let neighbors: Vec<_> = cross.iter_neighbors((1, 1), (3, 3)).collect();
        assert_eq!(neighbors, [(0, 1), (1, 0), (1, 2), (2, 1)]);
    }

    #[test]
    fn deserialized_kernel_is_validated() {
        let json = serde_json::to_string(&Kernel::wide()).unwrap();
        let wide: Kernel = serde_json::from_str(&json).unwrap();
        assert_eq!(wide, Kernel::wide());

        assert!(serde_json::from_str::<Kernel>(r#"{"offsets": [[0, 1], [0, 0]]}"#).is_err());
        assert!(serde_json::from_str::<Kernel>(r#"{"offsets": [[1, 1], [1, 1]]}"#).is_err());
        assert!(serde_json::from_str::<Kernel>(r#"{"offsets": []}"#).is_err());
    }

    #[test]
    fn chebyshev_zone_is_clipped_to_bounds() {
        let zone: Vec<_> = chebyshev_zone((0, 1), 1, (4, 4)).collect();
        assert_eq!(zone, [(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);

        assert_eq!(chebyshev_zone((5, 5), 2, (10, 10)).count(), 25);
        assert_eq!(chebyshev_zone((9, 9), 0, (10, 10)).count(), 1);
    }
}
