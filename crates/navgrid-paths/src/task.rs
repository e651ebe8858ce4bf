//! Scheduling work onto a task runtime and waiting for it.
//!
//! A [`TaskRuntime`] only knows how to run a boxed closure somewhere.
//! [`schedule`] wraps a closure so its result (or panic) lands in a shared
//! slot, and hands back a [`JobHandle`] that can be polled with
//! [`is_completed`](JobHandle::is_completed) or waited on with
//! [`join`](JobHandle::join).

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use parking_lot::{Condvar, Mutex};

/// A unit of work handed to a [`TaskRuntime`].
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Something that can run jobs, on this thread or another.
pub trait TaskRuntime: Send + Sync {
    /// Run `job` eventually. Must not drop it unrun.
    fn spawn(&self, job: Job);
}

/// Runs every job immediately on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineRuntime;

impl TaskRuntime for InlineRuntime {
    fn spawn(&self, job: Job) {
        job();
    }
}

/// Runs jobs on a dedicated rayon thread pool.
#[derive(Debug)]
pub struct RayonRuntime {
    pool: rayon::ThreadPool,
}

impl RayonRuntime {
    /// A pool of `threads` workers; `0` lets rayon pick from the number of
    /// available cores.
    pub fn new(threads: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("navgrid-worker-{i}"))
            .build()?;
        log::debug!("started {} path workers", pool.current_num_threads());
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl TaskRuntime for RayonRuntime {
    fn spawn(&self, job: Job) {
        self.pool.spawn(job);
    }
}

struct Slot<T> {
    result: Mutex<Option<thread::Result<T>>>,
    done: Condvar,
    completed: AtomicBool,
}

impl<T> Slot<T> {
    fn fill(&self, result: thread::Result<T>) {
        let mut guard = self.result.lock();
        *guard = Some(result);
        self.completed.store(true, Ordering::Release);
        self.done.notify_all();
    }
}

/// The pending result of a scheduled job.
pub struct JobHandle<T> {
    slot: Arc<Slot<T>>,
}

impl<T> std::fmt::Debug for JobHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobHandle")
            .field("completed", &self.is_completed())
            .finish()
    }
}

impl<T> JobHandle<T> {
    /// Whether the job has finished, successfully or not. Never blocks.
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.slot.completed.load(Ordering::Acquire)
    }

    /// Block until the job finishes. A panic inside the job comes back as
    /// `Err` with the panic payload.
    pub fn join(self) -> thread::Result<T> {
        let mut guard = self.slot.result.lock();
        loop {
            if let Some(result) = guard.take() {
                return result;
            }
            self.slot.done.wait(&mut guard);
        }
    }

    /// Block until the job finishes and return its value, resuming the
    /// job's panic on this thread if it had one.
    pub fn complete(self) -> T {
        match self.join() {
            Ok(value) => value,
            Err(payload) => panic::resume_unwind(payload),
        }
    }
}

/// Run `f` on `runtime`, returning a handle to its result.
pub fn schedule<T, F>(runtime: &dyn TaskRuntime, f: F) -> JobHandle<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let slot = Arc::new(Slot {
        result: Mutex::new(None),
        done: Condvar::new(),
        completed: AtomicBool::new(false),
    });
    let job_slot = Arc::clone(&slot);
    runtime.spawn(Box::new(move || {
        job_slot.fill(panic::catch_unwind(AssertUnwindSafe(f)));
    }));
    JobHandle { slot }
}

/// Wait for every handle, in order.
pub fn join_all<T>(handles: impl IntoIterator<Item = JobHandle<T>>) -> Vec<thread::Result<T>> {
    handles.into_iter().map(JobHandle::join).collect()
}

/// Wait for every handle, in order, resuming the first panic met.
pub fn complete_all<T>(handles: impl IntoIterator<Item = JobHandle<T>>) -> Vec<T> {
    handles.into_iter().map(JobHandle::complete).collect()
}
