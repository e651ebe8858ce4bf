use std::cmp::Ordering;

use crate::heap::HeapItem;

/// Predecessor marker for the start node.
pub const NO_PARENT: usize = usize::MAX;

/// Working record for one cell during an A* search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchNode {
    /// Index of the cell this node describes.
    pub cell: usize,
    /// Index of the predecessor cell, or [`NO_PARENT`] for the start.
    pub came_from: usize,
    /// Cost of the best known route from the start.
    pub g: i32,
    /// Heuristic estimate of the remaining cost to the end.
    pub h: i32,
}

impl SearchNode {
    /// Node for the start cell.
    pub fn root(cell: usize, h: i32) -> Self {
        Self {
            cell,
            came_from: NO_PARENT,
            g: 0,
            h,
        }
    }

    #[inline]
    pub fn f(&self) -> i32 {
        self.g + self.h
    }

    /// Predecessor cell, `None` for the start.
    #[inline]
    pub fn parent(&self) -> Option<usize> {
        (self.came_from != NO_PARENT).then_some(self.came_from)
    }
}

// Lowest f first; on equal f the node closer to the goal (lower h) wins.
// The indices only make the order total.
impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f()
            .cmp(&other.f())
            .then(self.h.cmp(&other.h))
            .then(self.cell.cmp(&other.cell))
            .then(self.came_from.cmp(&other.came_from))
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl HeapItem for SearchNode {
    #[inline]
    fn heap_id(&self) -> usize {
        self.cell
    }
}
