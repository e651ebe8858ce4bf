//! The [`NavGrid`] type: a flat, read-only array of walkability cells.
//!
//! Cells are stored row-major: the cell at `(x, y)` lives at index
//! `y * width + x`. A grid never changes after construction, so it can be
//! shared between concurrent searches behind an `Arc` without locking.

use std::collections::VecDeque;

use rand::{Rng, RngExt};

use crate::cell::Cell;
use crate::config::{GraphKind, GridConfig};
use crate::error::GridError;
use crate::geom::{Point, Range, WorldPos};

/// Read access to a navigation grid, as needed by pathfinding callers.
pub trait GridModel {
    /// All cells, row-major.
    fn grid(&self) -> &[Cell];

    /// Number of cells along x.
    fn grid_width(&self) -> i32;

    /// Total number of cells.
    fn grid_cell_count(&self) -> usize;

    /// The cell containing `pos`, clamped into the grid.
    fn cell_at_world_position(&self, pos: WorldPos) -> Cell;

    /// A uniformly chosen cell (walkable or not).
    fn random_cell(&self, rng: &mut impl Rng) -> Cell;
}

/// A 2D walkability grid laid over the world's x/z plane.
#[derive(Debug, Clone)]
pub struct NavGrid {
    cells: Vec<Cell>,
    bounds: Range,
    config: GridConfig,
}

impl NavGrid {
    /// Create a grid where every cell is walkable.
    pub fn new(config: GridConfig) -> Result<Self, GridError> {
        Self::from_fn(config, |_| true)
    }

    /// Create a grid, asking `walkable` about every cell.
    pub fn from_fn(config: GridConfig, walkable: impl Fn(Point) -> bool) -> Result<Self, GridError> {
        if config.kind == GraphKind::Grid3D {
            return Err(GridError::Unsupported(config.kind));
        }
        if config.width <= 0
            || config.height <= 0
            || !(config.cell_size.is_finite() && config.cell_size > 0.0)
        {
            return Err(GridError::InvalidDimensions {
                width: config.width,
                height: config.height,
                cell_size: config.cell_size,
            });
        }

        let bounds = Range::new(0, 0, config.width, config.height);
        let cells = bounds
            .iter()
            .enumerate()
            .map(|(index, pos)| Cell {
                position: cell_center(&config, pos),
                index,
                pos,
                walkable: walkable(pos),
            })
            .collect();

        Ok(Self {
            cells,
            bounds,
            config,
        })
    }

    /// Build a grid from an ASCII layout: `#` is blocked, `.` is walkable.
    ///
    /// The first line is row `y = 0`. Surrounding whitespace of the whole
    /// string and of each line is ignored; blank lines are skipped. Every
    /// row must have the same width.
    pub fn parse(layout: &str) -> Result<Self, GridError> {
        Self::parse_with(GridConfig::default(), layout)
    }

    /// Like [`parse`](Self::parse) but with explicit placement; the
    /// config's width and height are replaced by the layout's.
    pub fn parse_with(config: GridConfig, layout: &str) -> Result<Self, GridError> {
        let rows: Vec<&str> = layout
            .trim()
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut walkable = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(GridError::InconsistentRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                match ch {
                    '.' => walkable.push(true),
                    '#' => walkable.push(false),
                    _ => {
                        return Err(GridError::InvalidChar {
                            ch,
                            pos: Point::new(x as i32, y as i32),
                        });
                    }
                }
            }
        }

        let config = GridConfig {
            width: width as i32,
            height: rows.len() as i32,
            ..config
        };
        Self::from_fn(config, |p| walkable[p.y as usize * width + p.x as usize])
    }

    // -----------------------------------------------------------------------
    // Shape
    // -----------------------------------------------------------------------

    /// All cells, row-major.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// The grid rectangle in cell coordinates.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    #[inline]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Number of walkable cells.
    pub fn walkable_count(&self) -> usize {
        self.cells.iter().filter(|c| c.walkable).count()
    }

    // -----------------------------------------------------------------------
    // Cell lookup
    // -----------------------------------------------------------------------

    /// The cell with the given flat index.
    #[inline]
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// Flat index of `p`, or `None` if it lies outside the grid.
    #[inline]
    pub fn index_of(&self, p: Point) -> Option<usize> {
        if !self.bounds.contains(p) {
            return None;
        }
        Some(p.y as usize * self.width() as usize + p.x as usize)
    }

    /// The cell at grid coordinates `p`.
    #[inline]
    pub fn cell_at(&self, p: Point) -> Option<&Cell> {
        self.index_of(p).map(|i| &self.cells[i])
    }

    /// Whether `p` is inside the grid and walkable.
    #[inline]
    pub fn is_walkable(&self, p: Point) -> bool {
        self.cell_at(p).is_some_and(|c| c.walkable)
    }

    // -----------------------------------------------------------------------
    // World mapping
    // -----------------------------------------------------------------------

    /// World-space centre of the cell at `p`. `p` may lie outside the grid.
    #[inline]
    pub fn cell_world_position(&self, p: Point) -> WorldPos {
        cell_center(&self.config, p)
    }

    /// Grid coordinates of the cell containing `pos`, without clamping.
    pub fn world_to_point(&self, pos: WorldPos) -> Point {
        let d = self.config.cell_diameter();
        let local = pos - self.config.origin;
        Point::new((local.x / d).floor() as i32, (local.z / d).floor() as i32)
    }

    /// The cell containing `pos`. Positions outside the grid map to the
    /// closest border cell.
    pub fn cell_at_world(&self, pos: WorldPos) -> &Cell {
        let p = self.bounds.clamp(self.world_to_point(pos));
        &self.cells[p.y as usize * self.width() as usize + p.x as usize]
    }

    /// Whether `pos` lies over a walkable cell of the grid.
    pub fn is_walkable_world(&self, pos: WorldPos) -> bool {
        self.is_walkable(self.world_to_point(pos))
    }

    /// The walkable cell closest to `pos`, searching breadth-first over
    /// cardinal neighbours from the (clamped) cell under `pos`.
    ///
    /// Returns `None` when the grid has no walkable cell.
    pub fn nearest_walkable(&self, pos: WorldPos) -> Option<&Cell> {
        let start = self.cell_at_world(pos);
        if start.walkable {
            return Some(start);
        }

        let mut seen = vec![false; self.cells.len()];
        let mut queue = VecDeque::new();
        seen[start.index] = true;
        queue.push_back(start.pos);

        while let Some(p) = queue.pop_front() {
            for n in p.neighbors_4() {
                let Some(i) = self.index_of(n) else {
                    continue;
                };
                if seen[i] {
                    continue;
                }
                if self.cells[i].walkable {
                    return Some(&self.cells[i]);
                }
                seen[i] = true;
                queue.push_back(n);
            }
        }
        None
    }

    /// A uniformly chosen cell (walkable or not).
    pub fn random_cell(&self, rng: &mut impl Rng) -> &Cell {
        &self.cells[rng.random_range(0..self.cells.len())]
    }

    /// A uniformly chosen walkable cell, or `None` if there is none.
    pub fn random_walkable_cell(&self, rng: &mut impl Rng) -> Option<&Cell> {
        let n = self.walkable_count();
        if n == 0 {
            return None;
        }
        self.cells
            .iter()
            .filter(|c| c.walkable)
            .nth(rng.random_range(0..n))
    }
}

impl GridModel for NavGrid {
    fn grid(&self) -> &[Cell] {
        self.cells()
    }

    fn grid_width(&self) -> i32 {
        self.width()
    }

    fn grid_cell_count(&self) -> usize {
        self.cell_count()
    }

    fn cell_at_world_position(&self, pos: WorldPos) -> Cell {
        *self.cell_at_world(pos)
    }

    fn random_cell(&self, rng: &mut impl Rng) -> Cell {
        *NavGrid::random_cell(self, rng)
    }
}

fn cell_center(config: &GridConfig, p: Point) -> WorldPos {
    let d = config.cell_diameter();
    config.origin
        + WorldPos::new(
            p.x as f32 * d + config.cell_size,
            0.0,
            p.y as f32 * d + config.cell_size,
        )
}
