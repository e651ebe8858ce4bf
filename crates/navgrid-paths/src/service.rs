use std::sync::Arc;

use navgrid_core::{Cell, NavGrid, WorldPos};

use crate::agent::PathAgent;
use crate::config::{PathfindingConfig, RequestStrategy};
use crate::error::{ConfigError, PathError};
use crate::requester::{BatchRequester, BlockingRequester, PathRequester, PollingRequester};
use crate::task::{RayonRuntime, TaskRuntime};

/// Entry point for agents: owns the grid handle and the requester chosen
/// by the configured [`RequestStrategy`].
pub struct PathfindingService<A> {
    grid: Arc<NavGrid>,
    strategy: RequestStrategy,
    requester: Box<dyn PathRequester<A>>,
}

impl<A: PathAgent + 'static> PathfindingService<A> {
    /// A service running searches on its own rayon pool of
    /// `config.worker_threads` workers.
    pub fn new(grid: Arc<NavGrid>, config: &PathfindingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let runtime = Arc::new(RayonRuntime::new(config.worker_threads)?);
        Ok(Self::build(grid, config, runtime))
    }

    /// A service running searches on `runtime`.
    pub fn with_runtime(
        grid: Arc<NavGrid>,
        config: &PathfindingConfig,
        runtime: Arc<dyn TaskRuntime>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(grid, config, runtime))
    }

    fn build(grid: Arc<NavGrid>, config: &PathfindingConfig, runtime: Arc<dyn TaskRuntime>) -> Self {
        let g = Arc::clone(&grid);
        let requester: Box<dyn PathRequester<A>> = match config.strategy {
            RequestStrategy::Blocking => Box::new(BlockingRequester::new(g, runtime, config.smoothing)),
            RequestStrategy::Batch => Box::new(BatchRequester::new(g, runtime, config.smoothing, &config.pool)),
            RequestStrategy::Polling => {
                Box::new(PollingRequester::new(g, runtime, config.smoothing, &config.pool))
            }
        };
        log::debug!(
            "pathfinding service on {}x{} grid: {:?} requests, {:?} smoothing",
            grid.width(),
            grid.height(),
            config.strategy,
            config.smoothing
        );
        Self {
            grid,
            strategy: config.strategy,
            requester,
        }
    }
}

impl<A> PathfindingService<A> {
    /// Request a path between two cells. See [`PathRequester::request_path`].
    pub fn request_path(&mut self, agent: A, start: &Cell, end: &Cell) -> bool {
        self.requester.request_path(agent, start, end)
    }

    /// Request a path between the cells under two world positions.
    /// Positions off the grid use the nearest border cell.
    pub fn request_path_world(&mut self, agent: A, start: WorldPos, end: WorldPos) -> bool {
        let start = *self.grid.cell_at_world(start);
        let end = *self.grid.cell_at_world(end);
        self.requester.request_path(agent, &start, &end)
    }

    /// Deliver finished requests. Call once per tick.
    pub fn drain_completions(&mut self) -> Result<usize, PathError> {
        self.requester.drain_completions()
    }

    pub fn in_flight(&self) -> usize {
        self.requester.in_flight()
    }

    pub fn strategy(&self) -> RequestStrategy {
        self.strategy
    }

    pub fn grid(&self) -> &Arc<NavGrid> {
        &self.grid
    }

    /// Drop all outstanding work without delivering it.
    pub fn dispose(&mut self) {
        self.requester.dispose();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use navgrid_core::{GridConfig, Point};

    use super::*;
    use crate::job::{PathOutcome, PathResult};
    use crate::postprocess::PathSmoothing;
    use crate::task::InlineRuntime;

    #[derive(Default)]
    struct Probe(RefCell<Option<PathResult>>);

    impl PathAgent for Probe {
        fn set_path(&self, result: PathResult) {
            *self.0.borrow_mut() = Some(result);
        }
    }

    fn open_grid(w: i32, h: i32) -> Arc<NavGrid> {
        Arc::new(NavGrid::new(GridConfig::with_size(w, h)).unwrap())
    }

    #[test]
    fn picks_requester_from_strategy() {
        for strategy in [RequestStrategy::Blocking, RequestStrategy::Batch, RequestStrategy::Polling] {
            let config = PathfindingConfig {
                strategy,
                worker_threads: 1,
                ..PathfindingConfig::default()
            };
            let mut svc: PathfindingService<Rc<Probe>> = PathfindingService::new(open_grid(5, 5), &config).unwrap();
            assert_eq!(svc.strategy(), strategy);

            let probe = Rc::new(Probe::default());
            let g = Arc::clone(svc.grid());
            assert!(svc.request_path(Rc::clone(&probe), &g.cells()[0], &g.cells()[24]));
            while svc.in_flight() > 0 {
                svc.drain_completions().unwrap();
                std::thread::yield_now();
            }
            let result = probe.0.borrow_mut().take().unwrap();
            assert_eq!(result.outcome, PathOutcome::Found);
            let points: Vec<_> = result.path.iter().map(|c| c.pos).collect();
            assert_eq!(points, vec![Point::new(0, 0), Point::new(4, 4)]);
        }
    }

    #[test]
    fn world_positions_map_to_cells() {
        let config = PathfindingConfig {
            strategy: RequestStrategy::Blocking,
            smoothing: PathSmoothing::None,
            ..PathfindingConfig::default()
        };
        let grid = open_grid(4, 1);
        let mut svc = PathfindingService::with_runtime(Arc::clone(&grid), &config, Arc::new(InlineRuntime)).unwrap();
        let probe = Rc::new(Probe::default());
        // Far outside the grid: clamps to the border cells.
        assert!(svc.request_path_world(Rc::clone(&probe), WorldPos::new(-10.0, 0.0, 0.2), WorldPos::new(99.0, 0.0, 0.4)));
        let result = probe.0.borrow_mut().take().unwrap();
        assert_eq!(result.path.len(), 4);
        assert_eq!(result.path[3].pos, Point::new(3, 0));
    }

    #[test]
    fn invalid_config_is_refused() {
        let config = PathfindingConfig {
            pool: crate::config::PoolConfig {
                max_size: 0,
                ..Default::default()
            },
            ..PathfindingConfig::default()
        };
        let built = PathfindingService::<Rc<Probe>>::with_runtime(open_grid(2, 2), &config, Arc::new(InlineRuntime));
        assert!(matches!(built, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn invalid_config_is_refused_before_spawning_workers() {
        let config = PathfindingConfig {
            pool: crate::config::PoolConfig {
                max_size: 4,
                prewarm: 5,
                ..Default::default()
            },
            ..PathfindingConfig::default()
        };
        let built = PathfindingService::<Rc<Probe>>::new(open_grid(2, 2), &config);
        assert!(matches!(built, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn dispose_drops_pending_work() {
        let config = PathfindingConfig {
            strategy: RequestStrategy::Batch,
            ..PathfindingConfig::default()
        };
        let grid = open_grid(3, 3);
        let mut svc = PathfindingService::with_runtime(Arc::clone(&grid), &config, Arc::new(InlineRuntime)).unwrap();
        let probe = Rc::new(Probe::default());
        assert!(svc.request_path(Rc::clone(&probe), &grid.cells()[0], &grid.cells()[8]));
        assert_eq!(svc.in_flight(), 1);
        svc.dispose();
        assert_eq!(svc.in_flight(), 0);
        assert!(probe.0.borrow().is_none());
    }
}
