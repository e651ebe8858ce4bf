use navgrid_core::NavGrid;

use crate::distance::octile;
use crate::error::PathError;
use crate::node::SearchNode;
use crate::scratch::SearchScratch;

/// How a search over the grid ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchOutcome {
    /// The end cell was reached; its chain of predecessors is in
    /// [`SearchScratch::visited`].
    Found,
    /// The open list ran dry before the end cell was reached.
    Unreachable,
}

/// Run A* from cell `start` to cell `end` on `grid`, using `scratch` as
/// working memory.
///
/// Moves go to the eight surrounding cells at octile cost, never into
/// unwalkable cells and never across the corner of one. The open list is
/// keyed by `f` then `h`; a cell that is still queued when a cheaper route
/// to it turns up is repositioned rather than queued twice.
///
/// `scratch` must be clear. On return its visited map holds every settled
/// predecessor link, ready for [`post_process`](crate::post_process).
pub fn astar(
    grid: &NavGrid,
    start: usize,
    end: usize,
    scratch: &mut SearchScratch,
) -> Result<SearchOutcome, PathError> {
    let cells = grid.cells();
    let len = cells.len();
    for index in [start, end] {
        if index >= len {
            return Err(PathError::CellOutOfRange { index, len });
        }
    }
    let goal = cells[end].pos;

    let SearchScratch {
        open,
        visited,
        closed,
        neighbors,
        ..
    } = scratch;

    let root = SearchNode::root(start, octile(cells[start].pos, goal));
    visited.insert(start, root);
    open.enqueue(root)?;

    let found = 'search: loop {
        if open.is_empty() {
            break 'search false;
        }
        let current = open.dequeue()?;
        if current.cell == end {
            break 'search true;
        }
        closed.insert(current.cell);

        let from = cells[current.cell].pos;
        for &ni in neighbors.walkable(grid, current.cell) {
            if closed.contains(&ni) {
                continue;
            }
            let to = cells[ni].pos;
            let g = current.g + octile(from, to);
            if let Some(seen) = visited.get(&ni) {
                if g >= seen.g {
                    continue;
                }
            }

            let node = SearchNode {
                cell: ni,
                came_from: current.cell,
                g,
                h: octile(to, goal),
            };
            visited.insert(ni, node);
            if open.contains(ni) {
                open.update(node)?;
            } else {
                open.enqueue(node)?;
            }
        }
    };

    log::trace!(
        "astar {start} -> {end}: found={found}, expanded={}, visited={}",
        closed.len(),
        visited.len()
    );

    Ok(if found {
        SearchOutcome::Found
    } else {
        SearchOutcome::Unreachable
    })
}
