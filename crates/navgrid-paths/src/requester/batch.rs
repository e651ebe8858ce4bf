use std::sync::Arc;

use navgrid_core::{Cell, NavGrid};

use super::{Dispatcher, InFlight, PathRequester, deliver, discard_all};
use crate::agent::PathAgent;
use crate::config::PoolConfig;
use crate::error::PathError;
use crate::pool::Pool;
use crate::postprocess::PathSmoothing;
use crate::scratch::{SearchScratch, scratch_pool};
use crate::task::{TaskRuntime, join_all};

/// Schedules every request right away and, on each drain, waits for the
/// whole batch before delivering it.
pub struct BatchRequester<A: PathAgent> {
    dispatcher: Dispatcher,
    pool: Pool<SearchScratch>,
    pending: Vec<InFlight<A>>,
}

impl<A: PathAgent> BatchRequester<A> {
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

impl<A: PathAgent> PathRequester<A> for BatchRequester<A> {
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
        if self.pending.is_empty() {
            return Ok(0);
        }
        let (agents, handles): (Vec<A>, Vec<_>) = self
            .pending
            .drain(..)
            .map(|InFlight { agent, handle }| (agent, handle))
            .unzip();
        let count = agents.len();

        let mut first_err = None;
        for (agent, joined) in agents.iter().zip(join_all(handles)) {
            if let Err(e) = deliver(agent, joined, &mut self.pool) {
                first_err.get_or_insert(e);
            }
        }
        log::debug!("batch delivered {count} paths");
        match first_err {
            Some(e) => Err(e),
            None => Ok(count),
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

impl<A: PathAgent> Drop for BatchRequester<A> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::requester::tests::{Recorder, at, grid};
    use crate::task::RayonRuntime;

    #[test]
    fn scratch_returns_to_pool_after_drain() {
        let g = grid(
            "
            ......
            .##...
            ......
            ",
        );
        let mut r = BatchRequester::new(
            Arc::clone(&g),
            Arc::new(RayonRuntime::new(2).unwrap()),
            PathSmoothing::LineOfSight,
            &PoolConfig::default(),
        );
        let agents: Vec<_> = (0..10).map(|_| Rc::new(Recorder::default())).collect();
        for (i, agent) in agents.iter().enumerate() {
            let end = at(&g, (i % 6) as i32, 2);
            assert!(r.request_path(Rc::clone(agent), &at(&g, 0, 0), &end));
        }
        assert_eq!(r.in_flight(), 10);
        assert_eq!(r.outstanding_scratch(), 10);

        assert_eq!(r.drain_completions().unwrap(), 10);
        assert_eq!(r.in_flight(), 0);
        assert_eq!(r.outstanding_scratch(), 0);
        assert!(agents.iter().all(|a| a.got.borrow().len() == 1));
    }

    #[test]
    fn rejected_request_acquires_nothing() {
        let g = grid("..#");
        let mut r = BatchRequester::new(
            Arc::clone(&g),
            Arc::new(crate::task::InlineRuntime),
            PathSmoothing::Collinear,
            &PoolConfig::default(),
        );
        let agent = Rc::new(Recorder::default());
        assert!(!r.request_path(Rc::clone(&agent), &at(&g, 0, 0), &at(&g, 2, 0)));
        assert_eq!(r.in_flight(), 0);
        assert_eq!(r.outstanding_scratch(), 0);
        assert_eq!(r.pool.stats().created, 0);
        assert_eq!(r.drain_completions().unwrap(), 0);
        assert!(agent.got.borrow().is_empty());
    }
}
