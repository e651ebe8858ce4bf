//! Grid construction settings.

use crate::geom::WorldPos;

/// Kind of navigation graph to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GraphKind {
    /// Flat grid on the x/z plane.
    #[default]
    Grid2D,
    /// Multi-level world graph. Not implemented; building one fails with
    /// [`GridError::Unsupported`](crate::GridError::Unsupported).
    Grid3D,
}

/// Dimensions and placement of a [`NavGrid`](crate::NavGrid).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    /// Number of cells along x.
    pub width: i32,
    /// Number of cells along z.
    pub height: i32,
    /// Half the side length of a cell, in world units.
    pub cell_size: f32,
    /// World position of the grid's lower-left corner.
    pub origin: WorldPos,
    pub kind: GraphKind,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            cell_size: 0.5,
            origin: WorldPos::ZERO,
            kind: GraphKind::Grid2D,
        }
    }
}

impl GridConfig {
    /// A config of the given size with default placement.
    pub fn with_size(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Side length of one cell in world units.
    #[inline]
    pub fn cell_diameter(&self) -> f32 {
        self.cell_size * 2.0
    }
}
