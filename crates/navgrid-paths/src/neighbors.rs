use navgrid_core::{NavGrid, Point};

/// Whether a single move from `from` to the adjacent cell `to` is allowed.
///
/// The target must be inside the grid and walkable. A diagonal move is
/// only allowed when both orthogonal cells it passes between are walkable,
/// so paths never squeeze through the corner of an obstacle.
#[inline]
pub fn can_step(grid: &NavGrid, from: Point, to: Point) -> bool {
    if !grid.is_walkable(to) {
        return false;
    }
    let d = to - from;
    if d.x != 0 && d.y != 0 {
        return grid.is_walkable(Point::new(to.x, from.y)) && grid.is_walkable(Point::new(from.x, to.y));
    }
    true
}

/// Reusable buffer for enumerating the moves out of a cell.
#[derive(Debug, Clone)]
pub struct Neighbors {
    buf: Vec<usize>,
}

impl Default for Neighbors {
    fn default() -> Self {
        Self::new()
    }
}

impl Neighbors {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(8),
        }
    }

    /// Indices of the cells reachable in one step from cell `index`,
    /// honouring grid bounds, walkability and the corner rule of
    /// [`can_step`]. The centre cell is never included.
    pub fn walkable(&mut self, grid: &NavGrid, index: usize) -> &[usize] {
        self.buf.clear();
        let Some(cell) = grid.cell(index) else {
            return &self.buf;
        };
        let p = cell.pos;
        for n in p.neighbors_8() {
            if !can_step(grid, p, n) {
                continue;
            }
            if let Some(ni) = grid.index_of(n) {
                self.buf.push(ni);
            }
        }
        &self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_grid_has_eight_moves() {
        let g = NavGrid::parse("...\n...\n...").unwrap();
        let mut nb = Neighbors::new();
        let centre = g.index_of(Point::new(1, 1)).unwrap();
        let mut got = nb.walkable(&g, centre).to_vec();
        got.sort();
        assert_eq!(got, vec![0, 1, 2, 3, 5, 6, 7, 8]);
    }

    #[test]
    fn borders_are_bounds_checked() {
        let g = NavGrid::parse("...\n...\n...").unwrap();
        let mut nb = Neighbors::new();
        assert_eq!(nb.walkable(&g, 0).len(), 3);
        assert_eq!(nb.walkable(&g, 2).len(), 3);
        assert_eq!(nb.walkable(&g, 4).len(), 8);
        assert!(nb.walkable(&g, 99).is_empty());
    }

    #[test]
    fn no_corner_cutting() {
        let g = NavGrid::parse(
            "
            ...
            .#.
            ...
            ",
        )
        .unwrap();
        // (1,0) → (2,1) passes the blocked centre.
        assert!(!can_step(&g, Point::new(1, 0), Point::new(2, 1)));
        assert!(can_step(&g, Point::new(1, 0), Point::new(2, 0)));
        assert!(!can_step(&g, Point::new(0, 0), Point::new(1, 1)));

        let mut nb = Neighbors::new();
        let from = g.index_of(Point::new(1, 0)).unwrap();
        let mut got = nb.walkable(&g, from).to_vec();
        got.sort();
        // Only the two cardinal moves along the top row survive.
        assert_eq!(got, vec![0, 2]);
    }
}
