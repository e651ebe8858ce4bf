use navgrid_core::{Cell, Point};

/// Cost of a horizontal or vertical step.
pub const CARDINAL_COST: i32 = 10;

/// Cost of a diagonal step (10·√2, rounded).
pub const DIAGONAL_COST: i32 = 14;

/// Octile distance between two points, in integer step costs.
///
/// Exact for 8-directional movement on an open grid, and never larger than
/// the true cost on a grid with obstacles.
#[inline]
pub fn octile(a: Point, b: Point) -> i32 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    let (lo, hi) = if dx < dy { (dx, dy) } else { (dy, dx) };
    DIAGONAL_COST * lo + CARDINAL_COST * (hi - lo)
}

/// Sum of the octile costs between consecutive cells of `path`.
pub fn path_cost(path: &[Cell]) -> i32 {
    path.windows(2).map(|w| octile(w[0].pos, w[1].pos)).sum()
}
