use std::sync::Arc;

use navgrid_core::{Cell, NavGrid};

use super::{Dispatcher, PathRequester};
use crate::agent::PathAgent;
use crate::error::PathError;
use crate::job::PathResult;
use crate::postprocess::PathSmoothing;
use crate::scratch::SearchScratch;
use crate::task::TaskRuntime;

/// Computes each path inside [`request_path`](PathRequester::request_path)
/// and delivers it before returning.
///
/// Owns a single scratch record, reused by every request. Failures are
/// delivered as aborted results and reported by the next
/// [`drain_completions`](PathRequester::drain_completions).
pub struct BlockingRequester {
    dispatcher: Dispatcher,
    scratch: Option<SearchScratch>,
    failure: Option<PathError>,
}

impl BlockingRequester {
    pub fn new(grid: Arc<NavGrid>, runtime: Arc<dyn TaskRuntime>, smoothing: PathSmoothing) -> Self {
        let scratch = SearchScratch::new(grid.cell_count());
        Self {
            dispatcher: Dispatcher::new(grid, runtime, smoothing),
            scratch: Some(scratch),
            failure: None,
        }
    }

    fn take_scratch(&mut self) -> SearchScratch {
        match self.scratch.take() {
            Some(mut scratch) => {
                scratch.clear();
                scratch
            }
            // Lost to a panicking job.
            None => SearchScratch::new(self.dispatcher.grid().cell_count()),
        }
    }
}

impl<A: PathAgent> PathRequester<A> for BlockingRequester {
    fn request_path(&mut self, agent: A, start: &Cell, end: &Cell) -> bool {
        if !self.dispatcher.accepts(start, end) {
            return false;
        }
        let scratch = self.take_scratch();
        match self.dispatcher.dispatch(start, end, scratch).join() {
            Ok(output) => {
                let result = output.result();
                self.scratch = Some(output.scratch);
                agent.set_path(result);
                if let Err(e) = output.outcome {
                    log::error!("path search failed: {e}");
                    self.failure.get_or_insert(e);
                }
            }
            Err(_) => {
                log::error!("path task panicked");
                agent.set_path(PathResult::aborted());
                self.failure.get_or_insert(PathError::JobPanicked);
            }
        }
        true
    }

    fn drain_completions(&mut self) -> Result<usize, PathError> {
        match self.failure.take() {
            Some(e) => Err(e),
            None => Ok(0),
        }
    }

    fn in_flight(&self) -> usize {
        0
    }

    fn dispose(&mut self) {
        self.scratch = None;
        self.failure = None;
    }
}
