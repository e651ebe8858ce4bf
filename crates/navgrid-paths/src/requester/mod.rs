//! Request strategies: how path jobs are scheduled and how their results
//! get back to agents.
//!
//! | Strategy | Request call | `drain_completions` |
//! |---|---|---|
//! | [`BlockingRequester`] | computes and delivers | reports errors only |
//! | [`BatchRequester`] | schedules | waits for every job, delivers all |
//! | [`PollingRequester`] | schedules | delivers jobs that have finished |

mod batch;
mod blocking;
mod polling;

use std::sync::Arc;
use std::thread;

use navgrid_core::{Cell, NavGrid};

pub use batch::BatchRequester;
pub use blocking::BlockingRequester;
pub use polling::PollingRequester;

use crate::agent::PathAgent;
use crate::error::PathError;
use crate::job::{JobOutput, PathResult, run_path_job};
use crate::pool::Pool;
use crate::postprocess::PathSmoothing;
use crate::scratch::SearchScratch;
use crate::task::{JobHandle, TaskRuntime, schedule};

/// A way of turning path requests into delivered paths.
///
/// Every accepted request is delivered exactly once through
/// [`PathAgent::set_path`], unless the requester is disposed first.
pub trait PathRequester<A> {
    /// Queue a path from `start` to `end` for `agent`.
    ///
    /// Returns `false`, scheduling nothing, when `end` is not a walkable
    /// cell of the grid.
    fn request_path(&mut self, agent: A, start: &Cell, end: &Cell) -> bool;

    /// Deliver finished requests and return how many were delivered.
    ///
    /// A request that failed internally is still delivered (as
    /// [`PathOutcome::Aborted`](crate::PathOutcome::Aborted)); the first
    /// such failure is returned once every delivery of the call is done.
    fn drain_completions(&mut self) -> Result<usize, PathError>;

    /// Requests accepted but not yet delivered.
    fn in_flight(&self) -> usize;

    /// Wait for outstanding jobs, discard their results without delivering
    /// them, and free all pooled memory.
    fn dispose(&mut self);
}

/// The parts every strategy shares: the grid, the runtime and the smoothing
/// applied to each path.
#[derive(Clone)]
pub(crate) struct Dispatcher {
    grid: Arc<NavGrid>,
    runtime: Arc<dyn TaskRuntime>,
    smoothing: PathSmoothing,
}

impl Dispatcher {
    pub(crate) fn new(grid: Arc<NavGrid>, runtime: Arc<dyn TaskRuntime>, smoothing: PathSmoothing) -> Self {
        Self {
            grid,
            runtime,
            smoothing,
        }
    }

    pub(crate) fn grid(&self) -> &NavGrid {
        &self.grid
    }

    /// Whether a request ending at `end` may be scheduled.
    pub(crate) fn accepts(&self, start: &Cell, end: &Cell) -> bool {
        let ok = self.grid.cell(end.index).is_some_and(|c| c.walkable);
        if ok {
            log::trace!("accepted path request {} -> {}", start.pos, end.pos);
        } else {
            log::debug!("rejected path request {} -> {}: target not walkable", start.pos, end.pos);
        }
        ok
    }

    /// Schedule the full pipeline for one request. `scratch` must be clear.
    pub(crate) fn dispatch(&self, start: &Cell, end: &Cell, scratch: SearchScratch) -> JobHandle<JobOutput> {
        let grid = Arc::clone(&self.grid);
        let (from, to, smoothing) = (start.index, end.index, self.smoothing);
        schedule(self.runtime.as_ref(), move || {
            run_path_job(grid, from, to, smoothing, scratch)
        })
    }
}

/// An accepted request whose job has not been delivered yet.
struct InFlight<A> {
    agent: A,
    handle: JobHandle<JobOutput>,
}

/// Hand a joined job's result to its agent and its scratch back to `pool`.
fn deliver<A: PathAgent>(
    agent: &A,
    joined: thread::Result<JobOutput>,
    pool: &mut Pool<SearchScratch>,
) -> Result<(), PathError> {
    match joined {
        Ok(output) => {
            let result = output.result();
            log::trace!("delivering {:?} ({} waypoints)", result.outcome, result.path.len());
            let JobOutput { scratch, outcome } = output;
            pool.release(scratch);
            agent.set_path(result);
            outcome.map(drop).inspect_err(|e| log::error!("path search failed: {e}"))
        }
        Err(_) => {
            log::error!("path task panicked");
            pool.abandon();
            agent.set_path(PathResult::aborted());
            Err(PathError::JobPanicked)
        }
    }
}

/// Join every job in `pending` and recycle its scratch, without delivering.
fn discard_all<A>(pending: &mut Vec<InFlight<A>>, pool: &mut Pool<SearchScratch>) {
    if !pending.is_empty() {
        log::warn!("discarding {} undelivered path requests", pending.len());
    }
    for InFlight { handle, .. } in pending.drain(..) {
        match handle.join() {
            Ok(output) => pool.release(output.scratch),
            Err(_) => pool.abandon(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use navgrid_core::Point;

    use super::*;
    use crate::config::PoolConfig;
    use crate::job::PathOutcome;
    use crate::task::{InlineRuntime, RayonRuntime};

    /// Agent that records every delivery.
    #[derive(Default)]
    pub(super) struct Recorder {
        pub(super) got: RefCell<Vec<PathResult>>,
    }

    impl PathAgent for Recorder {
        fn set_path(&self, result: PathResult) {
            self.got.borrow_mut().push(result);
        }
    }

    pub(super) fn grid(layout: &str) -> Arc<NavGrid> {
        Arc::new(NavGrid::parse(layout).unwrap())
    }

    pub(super) fn at(grid: &NavGrid, x: i32, y: i32) -> Cell {
        *grid.cell_at(Point::new(x, y)).unwrap()
    }

    fn requesters(
        grid: &Arc<NavGrid>,
        runtime: Arc<dyn TaskRuntime>,
    ) -> Vec<Box<dyn PathRequester<Rc<Recorder>>>> {
        let pool = PoolConfig::default();
        vec![
            Box::new(BlockingRequester::new(Arc::clone(grid), Arc::clone(&runtime), PathSmoothing::Collinear)),
            Box::new(BatchRequester::new(
                Arc::clone(grid),
                Arc::clone(&runtime),
                PathSmoothing::Collinear,
                &pool,
            )),
            Box::new(PollingRequester::new(Arc::clone(grid), runtime, PathSmoothing::Collinear, &pool)),
        ]
    }

    fn drain_until_idle(r: &mut dyn PathRequester<Rc<Recorder>>) -> usize {
        let mut delivered = 0;
        loop {
            delivered += r.drain_completions().unwrap();
            if r.in_flight() == 0 {
                return delivered;
            }
            std::thread::yield_now();
        }
    }

    #[test]
    fn every_strategy_delivers_each_accepted_request_once() {
        let g = grid(
            "
            ........
            .######.
            ........
            ...#....
            ",
        );
        let rt: Arc<dyn TaskRuntime> = Arc::new(RayonRuntime::new(2).unwrap());
        for mut r in requesters(&g, rt) {
            let agents: Vec<_> = (0..6).map(|_| Rc::new(Recorder::default())).collect();
            let goals = [(7, 3), (0, 2), (4, 0), (3, 3), (6, 1), (7, 0)];
            let mut accepted = 0;
            for (agent, &(x, y)) in agents.iter().zip(&goals) {
                if r.request_path(Rc::clone(agent), &at(&g, 0, 0), &at(&g, x, y)) {
                    accepted += 1;
                }
            }
            // (3,3) and (6,1) are walls.
            assert_eq!(accepted, 4);
            drain_until_idle(r.as_mut());

            for (agent, &(x, y)) in agents.iter().zip(&goals) {
                let got = agent.got.borrow();
                if g.is_walkable(Point::new(x, y)) {
                    assert_eq!(got.len(), 1);
                    assert_eq!(got[0].outcome, PathOutcome::Found);
                    assert_eq!(got[0].path.last().map(|c| c.pos), Some(Point::new(x, y)));
                    assert_eq!(got[0].path.first().map(|c| c.pos), Some(Point::ZERO));
                } else {
                    assert!(got.is_empty());
                }
            }
            assert_eq!(r.in_flight(), 0);
            assert_eq!(r.drain_completions().unwrap(), 0);
        }
    }

    #[test]
    fn unreachable_end_delivers_empty_path() {
        let g = grid(".#.\n.#.");
        for mut r in requesters(&g, Arc::new(InlineRuntime)) {
            let agent = Rc::new(Recorder::default());
            assert!(r.request_path(Rc::clone(&agent), &at(&g, 0, 0), &at(&g, 2, 1)));
            drain_until_idle(r.as_mut());
            let got = agent.got.borrow();
            assert_eq!(got.len(), 1);
            assert_eq!(got[0].outcome, PathOutcome::Unreachable);
            assert!(got[0].path.is_empty());
        }
    }

    #[test]
    fn bad_start_index_is_aborted_and_reported() {
        let g = grid("...");
        let bogus = Cell {
            index: 42,
            ..at(&g, 0, 0)
        };
        for mut r in requesters(&g, Arc::new(InlineRuntime)) {
            let agent = Rc::new(Recorder::default());
            assert!(r.request_path(Rc::clone(&agent), &bogus, &at(&g, 2, 0)));
            assert_eq!(
                r.drain_completions(),
                Err(PathError::CellOutOfRange { index: 42, len: 3 })
            );
            assert_eq!(*agent.got.borrow(), vec![PathResult::aborted()]);
            assert_eq!(r.in_flight(), 0);
        }
    }

    #[test]
    fn dispose_discards_without_delivering() {
        let g = grid("....\n....");
        for mut r in requesters(&g, Arc::new(InlineRuntime)) {
            let agent = Rc::new(Recorder::default());
            r.request_path(Rc::clone(&agent), &at(&g, 0, 0), &at(&g, 3, 1));
            let delivered_early = agent.got.borrow().len();
            r.dispose();
            assert_eq!(r.in_flight(), 0);
            assert_eq!(agent.got.borrow().len(), delivered_early);
            assert_eq!(r.drain_completions().unwrap(), 0);
        }
    }

    #[test]
    fn dispatcher_rejects_walls_and_foreign_cells() {
        let g = grid(".#");
        let d = Dispatcher::new(Arc::clone(&g), Arc::new(InlineRuntime), PathSmoothing::None);
        let start = at(&g, 0, 0);
        assert!(d.accepts(&start, &start));
        assert!(!d.accepts(&start, &at(&g, 1, 0)));
        let foreign = Cell {
            index: 7,
            walkable: true,
            ..start
        };
        assert!(!d.accepts(&start, &foreign));
    }
}
