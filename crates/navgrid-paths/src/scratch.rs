//! Per-request working memory.

use std::collections::{HashMap, HashSet};

use navgrid_core::Cell;

use crate::config::PoolConfig;
use crate::heap::BinaryMinHeap;
use crate::neighbors::Neighbors;
use crate::node::SearchNode;
use crate::pool::Pool;

const INITIAL_SET_CAPACITY: usize = 64;
const INITIAL_PATH_CAPACITY: usize = 32;

/// Every buffer one path request needs: the open queue, the visited map,
/// the closed set, and the raw and final path buffers.
///
/// A scratch is owned by exactly one in-flight request at a time; it moves
/// into the request's task and comes back through the task's handle.
#[derive(Debug, Clone)]
pub struct SearchScratch {
    /// Open list, ordered by `f` then `h`.
    pub open: BinaryMinHeap<SearchNode>,
    /// Best known node per cell index, open or closed.
    pub visited: HashMap<usize, SearchNode>,
    /// Cells already expanded.
    pub closed: HashSet<usize>,
    /// Reconstructed path, end to start.
    pub raw: Vec<Cell>,
    /// Final path, start to end.
    pub path: Vec<Cell>,
    pub(crate) neighbors: Neighbors,
}

impl SearchScratch {
    /// Scratch sized for a grid of `cell_count` cells. The open queue can
    /// hold one entry per cell, which the search never exceeds.
    pub fn new(cell_count: usize) -> Self {
        Self {
            open: BinaryMinHeap::with_capacity(cell_count),
            visited: HashMap::with_capacity(INITIAL_SET_CAPACITY),
            closed: HashSet::with_capacity(INITIAL_SET_CAPACITY),
            raw: Vec::with_capacity(INITIAL_PATH_CAPACITY),
            path: Vec::with_capacity(INITIAL_PATH_CAPACITY),
            neighbors: Neighbors::new(),
        }
    }

    /// Empty every buffer, keeping the allocations.
    pub fn clear(&mut self) {
        self.open.clear();
        self.visited.clear();
        self.closed.clear();
        self.raw.clear();
        self.path.clear();
    }

    /// Whether every buffer is empty.
    pub fn is_clear(&self) -> bool {
        self.open.is_empty()
            && self.visited.is_empty()
            && self.closed.is_empty()
            && self.raw.is_empty()
            && self.path.is_empty()
    }
}

/// A pool of scratch records for a grid of `cell_count` cells.
pub fn scratch_pool(cell_count: usize, config: &PoolConfig) -> Pool<SearchScratch> {
    let mut pool = Pool::new(
        config.initial_capacity,
        config.max_size,
        move || SearchScratch::new(cell_count),
        SearchScratch::clear,
        |scratch: SearchScratch| {
            log::trace!("dropping scratch (open capacity {})", scratch.open.capacity());
        },
    );
    pool.prewarm(config.prewarm);
    pool
}
