use std::cell::{Cell as StatusCell, Ref, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use navgrid_core::{Cell, WorldPos};

use crate::job::PathResult;
use crate::service::PathfindingService;

/// Receiver of finished path requests.
///
/// Requesters hold on to the agent handle they were given and call
/// [`set_path`](PathAgent::set_path) exactly once per accepted request, on
/// the thread that drains completions.
pub trait PathAgent {
    fn set_path(&self, result: PathResult);
}

impl<T: PathAgent + ?Sized> PathAgent for &T {
    fn set_path(&self, result: PathResult) {
        (**self).set_path(result);
    }
}

impl<T: PathAgent + ?Sized> PathAgent for Rc<T> {
    fn set_path(&self, result: PathResult) {
        (**self).set_path(result);
    }
}

impl<T: PathAgent + ?Sized> PathAgent for Arc<T> {
    fn set_path(&self, result: PathResult) {
        (**self).set_path(result);
    }
}

/// Where an agent's latest request stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PathStatus {
    #[default]
    Idle,
    Requested,
    Succeeded,
    Failed,
}

/// Per-agent navigation state: the status of its latest request and the
/// waypoints it delivered.
#[derive(Debug, Default)]
pub struct AgentNavigation {
    status: StatusCell<PathStatus>,
    waypoints: RefCell<Vec<Cell>>,
}

impl AgentNavigation {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    #[inline]
    pub fn status(&self) -> PathStatus {
        self.status.get()
    }

    /// Waypoints of the last successful request, start to end.
    pub fn waypoints(&self) -> Ref<'_, [Cell]> {
        Ref::map(self.waypoints.borrow(), Vec::as_slice)
    }

    pub fn has_path(&self) -> bool {
        !self.waypoints.borrow().is_empty()
    }

    /// Forget the current path and go back to [`PathStatus::Idle`]. Has no
    /// effect while a request is in flight.
    pub fn clear_path(&self) {
        if self.status() != PathStatus::Requested {
            self.waypoints.borrow_mut().clear();
            self.status.set(PathStatus::Idle);
        }
    }

    /// Ask `service` for a path between two world positions.
    ///
    /// Returns `false` without contacting the service while an earlier
    /// request is still in flight. A request the service rejects leaves the
    /// agent [`Failed`](PathStatus::Failed).
    pub fn request_path(
        self: &Rc<Self>,
        service: &mut PathfindingService<Rc<Self>>,
        start: WorldPos,
        end: WorldPos,
    ) -> bool {
        if self.status() == PathStatus::Requested {
            log::debug!("path request ignored: one is already in flight");
            return false;
        }
        self.waypoints.borrow_mut().clear();
        // Set before calling: a blocking service delivers inside the call.
        self.status.set(PathStatus::Requested);
        let accepted = service.request_path_world(Rc::clone(self), start, end);
        if !accepted {
            self.status.set(PathStatus::Failed);
        }
        accepted
    }
}

impl PathAgent for AgentNavigation {
    fn set_path(&self, result: PathResult) {
        let mut waypoints = self.waypoints.borrow_mut();
        if result.is_found() && !result.path.is_empty() {
            *waypoints = result.path;
            self.status.set(PathStatus::Succeeded);
        } else {
            waypoints.clear();
            self.status.set(PathStatus::Failed);
        }
    }
}
