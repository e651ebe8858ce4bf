/// Errors raised by [`BinaryMinHeap`](crate::BinaryMinHeap).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HeapError {
    /// The fixed-size backing store is full.
    #[error("priority queue capacity {capacity} exceeded")]
    CapacityExceeded { capacity: usize },
    /// `dequeue` or `peek` on an empty queue.
    #[error("priority queue is empty")]
    Empty,
    /// An item with the same id is already queued.
    #[error("item {id} is already queued")]
    AlreadyQueued { id: usize },
    /// `update` or `remove` of an id that is not queued.
    #[error("item {id} is not queued")]
    NotQueued { id: usize },
}

/// Errors raised while computing a path.
///
/// An unreachable target is not an error: it completes with an empty path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error(transparent)]
    Heap(#[from] HeapError),
    /// A start or end index that does not address a grid cell.
    #[error("cell index {index} out of range for a grid of {len} cells")]
    CellOutOfRange { index: usize, len: usize },
    /// The task computing the path panicked.
    #[error("path task panicked")]
    JobPanicked,
}

/// Errors raised while loading or validating a
/// [`PathfindingConfig`](crate::PathfindingConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[cfg(feature = "serde")]
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("cannot start path workers: {0}")]
    Runtime(#[from] rayon::ThreadPoolBuildError),
    #[error("invalid config: {0}")]
    Invalid(String),
}
