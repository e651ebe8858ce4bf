use std::fmt;

/// Counters describing a [`Pool`]'s lifetime activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    /// Items built by the create function.
    pub created: usize,
    /// Items handed to the finalize function.
    pub destroyed: usize,
    /// Items acquired and not yet released or abandoned.
    pub outstanding: usize,
    /// Items waiting in the free list.
    pub free: usize,
}

/// A free-list of reusable items.
///
/// Items come from a create function the first time and from the free list
/// afterwards; the reset function runs on every [`acquire`](Pool::acquire).
/// At most `max_size` released items are kept: releasing into a full free
/// list hands the item to the finalize function instead. Dropping the pool
/// finalizes everything still in the free list.
pub struct Pool<T> {
    free: Vec<T>,
    max_size: usize,
    create: Box<dyn Fn() -> T>,
    reset: Box<dyn Fn(&mut T)>,
    finalize: Box<dyn Fn(T)>,
    stats: PoolStats,
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("max_size", &self.max_size)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl<T> Pool<T> {
    /// An empty pool whose free list has room for `initial_capacity`
    /// items before growing and never holds more than `max_size`.
    pub fn new(
        initial_capacity: usize,
        max_size: usize,
        create: impl Fn() -> T + 'static,
        reset: impl Fn(&mut T) + 'static,
        finalize: impl Fn(T) + 'static,
    ) -> Self {
        Self {
            free: Vec::with_capacity(initial_capacity.min(max_size)),
            max_size,
            create: Box::new(create),
            reset: Box::new(reset),
            finalize: Box::new(finalize),
            stats: PoolStats::default(),
        }
    }

    /// Build items until the free list holds `count` of them, or
    /// `max_size` if that is smaller.
    pub fn prewarm(&mut self, count: usize) {
        let target = count.min(self.max_size);
        while self.free.len() < target {
            self.stats.created += 1;
            self.free.push((self.create)());
        }
    }

    /// Take a reset item from the free list, or build a new one.
    pub fn acquire(&mut self) -> T {
        let mut item = match self.free.pop() {
            Some(item) => item,
            None => {
                self.stats.created += 1;
                (self.create)()
            }
        };
        (self.reset)(&mut item);
        self.stats.outstanding += 1;
        item
    }

    /// Give back an item obtained from [`acquire`](Self::acquire).
    pub fn release(&mut self, item: T) {
        self.stats.outstanding = self.stats.outstanding.saturating_sub(1);
        if self.free.len() < self.max_size {
            self.free.push(item);
        } else {
            log::warn!("pool full ({} items), finalizing released item", self.max_size);
            self.destroy(item);
        }
    }

    /// Record that an acquired item will never come back, for instance
    /// because the task holding it panicked.
    pub fn abandon(&mut self) {
        self.stats.outstanding = self.stats.outstanding.saturating_sub(1);
    }

    /// Number of acquired items not yet released or abandoned.
    #[inline]
    pub fn outstanding(&self) -> usize {
        self.stats.outstanding
    }

    /// Number of items waiting in the free list.
    #[inline]
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            free: self.free.len(),
            ..self.stats
        }
    }

    /// Finalize every item in the free list.
    pub fn clear(&mut self) {
        while let Some(item) = self.free.pop() {
            self.destroy(item);
        }
    }

    fn destroy(&mut self, item: T) {
        self.stats.destroyed += 1;
        (self.finalize)(item);
    }
}

impl<T> Drop for Pool<T> {
    fn drop(&mut self) {
        self.clear();
    }
}
