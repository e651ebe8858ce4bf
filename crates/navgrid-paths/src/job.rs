use std::sync::Arc;

use navgrid_core::{Cell, NavGrid};

use crate::error::PathError;
use crate::postprocess::{PathSmoothing, post_process};
use crate::scratch::SearchScratch;
use crate::search::{SearchOutcome, astar};

/// How a path request ended, as seen by the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathOutcome {
    /// A path was found; it is never empty.
    Found,
    /// No walkable route connects start and end.
    Unreachable,
    /// The request failed part way: its task panicked or the search hit
    /// an internal error.
    Aborted,
}

/// What an agent receives when its request completes.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    pub outcome: PathOutcome,
    /// Waypoints from start to end; empty unless `outcome` is `Found`.
    pub path: Vec<Cell>,
}

impl PathResult {
    pub fn aborted() -> Self {
        Self {
            outcome: PathOutcome::Aborted,
            path: Vec::new(),
        }
    }

    #[inline]
    pub fn is_found(&self) -> bool {
        self.outcome == PathOutcome::Found
    }
}

/// Everything a finished path job hands back: the scratch it borrowed and
/// how the search went.
#[derive(Debug)]
pub(crate) struct JobOutput {
    pub(crate) scratch: SearchScratch,
    pub(crate) outcome: Result<SearchOutcome, PathError>,
}

impl JobOutput {
    /// Copy the finished path out of the scratch.
    pub(crate) fn result(&self) -> PathResult {
        match self.outcome {
            Ok(SearchOutcome::Found) => PathResult {
                outcome: PathOutcome::Found,
                path: self.scratch.path.clone(),
            },
            Ok(SearchOutcome::Unreachable) => PathResult {
                outcome: PathOutcome::Unreachable,
                path: Vec::new(),
            },
            Err(_) => PathResult::aborted(),
        }
    }
}

/// One request's full pipeline: search, then post-process. Runs on a worker.
pub(crate) fn run_path_job(
    grid: Arc<NavGrid>,
    start: usize,
    end: usize,
    smoothing: PathSmoothing,
    mut scratch: SearchScratch,
) -> JobOutput {
    let outcome = astar(&grid, start, end, &mut scratch);
    if let Ok(SearchOutcome::Found) = outcome {
        post_process(&grid, &mut scratch, end, smoothing);
    }
    JobOutput { scratch, outcome }
}
