use crate::config::GraphKind;
use crate::geom::Point;

/// Errors raised while building a [`NavGrid`](crate::NavGrid).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// Width or height is not strictly positive, or the cell size is not a
    /// positive finite number.
    #[error("invalid grid dimensions {width}x{height} (cell size {cell_size})")]
    InvalidDimensions {
        width: i32,
        height: i32,
        cell_size: f32,
    },
    /// A row of an ASCII layout has a different width than the first row.
    #[error("row {row} has width {found}, expected {expected}")]
    InconsistentRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// An ASCII layout contains something other than `#` or `.`.
    #[error("invalid character {ch:?} at {pos}")]
    InvalidChar { ch: char, pos: Point },
    /// The requested graph kind has no implementation.
    #[error("{0:?} navigation graphs are not supported")]
    Unsupported(GraphKind),
}
