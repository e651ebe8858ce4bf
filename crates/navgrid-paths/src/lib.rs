//! Pathfinding for many agents on a [`NavGrid`](navgrid_core::NavGrid).
//!
//! This crate provides:
//!
//! - **A\*** over 8-directional moves with octile costs ([`astar`]), backed
//!   by an indexed [`BinaryMinHeap`] that supports decrease-key
//! - **Path smoothing** ([`post_process`]): collinear simplification or
//!   greedy line-of-sight shortcuts ([`PathSmoothing`])
//! - **Request strategies** ([`PathRequester`]): blocking, batch-then-join,
//!   and non-blocking polling, all running jobs on a [`TaskRuntime`]
//! - **Pooled scratch memory** ([`Pool`], [`SearchScratch`]) so searches
//!   stop allocating after warm-up
//! - a [`PathfindingService`] facade and an [`AgentNavigation`] status
//!   tracker for callers that just want paths delivered to agents
//!
//! # Delivery
//!
//! Requests return `false` when the target cell is not walkable. Every
//! accepted request is delivered to its agent exactly once through
//! [`PathAgent::set_path`], from the thread that calls
//! [`drain_completions`](PathfindingService::drain_completions) (or, for
//! [`RequestStrategy::Blocking`], inside the request call itself).
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use std::sync::Arc;
//!
//! use navgrid_core::{NavGrid, Point};
//! use navgrid_paths::{InlineRuntime, PathAgent, PathResult, PathfindingConfig, PathfindingService};
//!
//! #[derive(Default)]
//! struct Walker(RefCell<Vec<Point>>);
//!
//! impl PathAgent for Walker {
//!     fn set_path(&self, result: PathResult) {
//!         *self.0.borrow_mut() = result.path.iter().map(|c| c.pos).collect();
//!     }
//! }
//!
//! let grid = Arc::new(NavGrid::parse("...\n.#.\n...").unwrap());
//! let mut service =
//!     PathfindingService::with_runtime(Arc::clone(&grid), &PathfindingConfig::default(), Arc::new(InlineRuntime))
//!         .unwrap();
//!
//! let walker = Rc::new(Walker::default());
//! let (start, end) = (grid.cells()[0], grid.cells()[8]);
//! assert!(service.request_path(Rc::clone(&walker), &start, &end));
//! service.drain_completions().unwrap();
//!
//! let path = walker.0.borrow();
//! assert_eq!(path.first(), Some(&Point::new(0, 0)));
//! assert_eq!(path.last(), Some(&Point::new(2, 2)));
//! ```

mod agent;
mod config;
mod distance;
mod error;
mod heap;
mod job;
mod neighbors;
mod node;
mod pool;
mod postprocess;
mod requester;
mod scratch;
mod search;
mod service;
mod task;

pub use agent::{AgentNavigation, PathAgent, PathStatus};
pub use config::{PathfindingConfig, PoolConfig, RequestStrategy};
pub use distance::{CARDINAL_COST, DIAGONAL_COST, octile, path_cost};
pub use error::{ConfigError, HeapError, PathError};
pub use heap::{BinaryMinHeap, HeapItem, NOT_QUEUED};
pub use job::{PathOutcome, PathResult};
pub use neighbors::{Neighbors, can_step};
pub use node::{NO_PARENT, SearchNode};
pub use pool::{Pool, PoolStats};
pub use postprocess::{
    PathSmoothing, has_line_of_sight, post_process, reconstruct, simplify_collinear, simplify_line_of_sight,
};
pub use requester::{BatchRequester, BlockingRequester, PathRequester, PollingRequester};
pub use scratch::{SearchScratch, scratch_pool};
pub use search::{SearchOutcome, astar};
pub use service::PathfindingService;
pub use task::{InlineRuntime, Job, JobHandle, RayonRuntime, TaskRuntime, complete_all, join_all, schedule};
