//! The [`Cell`] type, one square of the navigation grid.

use std::hash::{Hash, Hasher};

use crate::geom::{Point, WorldPos};

/// A single grid cell.
///
/// Cells are created once by [`NavGrid`](crate::NavGrid) and never change
/// afterwards. Two cells are equal when they sit at the same grid
/// coordinates.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    /// World-space centre of the cell.
    pub position: WorldPos,
    /// Row-major index into the grid's cell array.
    pub index: usize,
    /// Integer grid coordinates.
    pub pos: Point,
    pub walkable: bool,
}

impl Cell {
    #[inline]
    pub fn x(&self) -> i32 {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.pos.y
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pos.hash(state);
    }
}
