use std::sync::Arc;

use navgrid_core::{Cell, NavGrid};

use super::{Dispatcher, InFlight, PathRequester, deliver, discard_all};
use crate::agent::PathAgent;
use crate::config::PoolConfig;
use crate::error::PathError;
use crate::pool::Pool;
use crate::postprocess::PathSmoothing;
use crate::scratch::{SearchScratch, scratch_pool};
use crate::task::TaskRuntime;

/// Schedules every request right away; each drain delivers only the jobs
/// that have already finished and never blocks on the rest.
///
/// Deliveries within one drain come in no particular order.
pub struct PollingRequester<A: PathAgent> {
    dispatcher: Dispatcher,
    pool: Pool<SearchScratch>,
    pending: Vec<InFlight<A>>,
}

impl<A: PathAgent> PollingRequester<A> {
    pub fn new(
        grid: Arc<NavGrid>,
        runtime: Arc<dyn TaskRuntime>,
        smoothing: PathSmoothing,
        pool: &PoolConfig,
    ) -> Self {
        let pool = scratch_pool(grid.cell_count(), pool);
        Self {
            dispatcher: Dispatcher::new(grid, runtime, smoothing),
            pool,
            pending: Vec::new(),
        }
    }

    /// Scratch records currently lent to jobs.
    pub fn outstanding_scratch(&self) -> usize {
        self.pool.outstanding()
    }
}

impl<A: PathAgent> PathRequester<A> for PollingRequester<A> {
    fn request_path(&mut self, agent: A, start: &Cell, end: &Cell) -> bool {
        if !self.dispatcher.accepts(start, end) {
            return false;
        }
        let scratch = self.pool.acquire();
        let handle = self.dispatcher.dispatch(start, end, scratch);
        self.pending.push(InFlight { agent, handle });
        true
    }

    fn drain_completions(&mut self) -> Result<usize, PathError> {
        let mut delivered = 0;
        let mut first_err = None;
        // Walk backwards so swap_remove only moves already-inspected entries.
        for i in (0..self.pending.len()).rev() {
            if !self.pending[i].handle.is_completed() {
                continue;
            }
            let InFlight { agent, handle } = self.pending.swap_remove(i);
            delivered += 1;
            if let Err(e) = deliver(&agent, handle.join(), &mut self.pool) {
                first_err.get_or_insert(e);
            }
        }
        if delivered > 0 {
            log::debug!("delivered {delivered} paths, {} still in flight", self.pending.len());
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(delivered),
        }
    }

    fn in_flight(&self) -> usize {
        self.pending.len()
    }

    fn dispose(&mut self) {
        discard_all(&mut self.pending, &mut self.pool);
        self.pool.clear();
    }
}

impl<A: PathAgent> Drop for PollingRequester<A> {
    fn drop(&mut self) {
        self.dispose();
    }
}
