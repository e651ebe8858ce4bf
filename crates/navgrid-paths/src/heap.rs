//! A fixed-capacity binary min-heap with O(1) position lookup.
//!
//! Items live in a `Vec` in heap order. A second array, indexed by each
//! item's [`HeapItem::heap_id`], records where that item currently sits, so
//! membership tests are O(1) and an arbitrary item can be repositioned or
//! removed in O(log n). Every swap keeps both arrays in sync.

use crate::error::HeapError;

/// Position marker for ids that are not in the heap.
pub const NOT_QUEUED: usize = usize::MAX;

/// An item that can be stored in a [`BinaryMinHeap`].
///
/// The id must be unique among the items queued at the same time and small
/// enough to index a dense array (cell indices are the intended ids).
pub trait HeapItem: Ord {
    fn heap_id(&self) -> usize;
}

/// Array-backed binary min-heap with a fixed capacity.
#[derive(Debug, Clone)]
pub struct BinaryMinHeap<T> {
    items: Vec<T>,
    positions: Vec<usize>,
    capacity: usize,
}

impl<T: HeapItem> BinaryMinHeap<T> {
    /// Create an empty heap that holds at most `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            positions: vec![NOT_QUEUED; capacity],
            capacity,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert `item`, O(log n).
    pub fn enqueue(&mut self, item: T) -> Result<(), HeapError> {
        if self.items.len() >= self.capacity {
            return Err(HeapError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        let id = item.heap_id();
        if self.contains(id) {
            return Err(HeapError::AlreadyQueued { id });
        }
        if id >= self.positions.len() {
            self.positions.resize(id + 1, NOT_QUEUED);
        }

        let idx = self.items.len();
        self.items.push(item);
        self.positions[id] = idx;
        self.sift_up(idx);
        Ok(())
    }

    /// Remove and return the smallest item, O(log n).
    pub fn dequeue(&mut self) -> Result<T, HeapError> {
        if self.items.is_empty() {
            return Err(HeapError::Empty);
        }
        Ok(self.take_at(0))
    }

    /// The smallest item, without removing it.
    pub fn peek(&self) -> Result<&T, HeapError> {
        self.items.first().ok_or(HeapError::Empty)
    }

    /// Whether an item with this id is queued, O(1).
    #[inline]
    pub fn contains(&self, id: usize) -> bool {
        self.position(id).is_some()
    }

    /// Current heap position of the item with this id.
    #[inline]
    pub fn position(&self, id: usize) -> Option<usize> {
        match self.positions.get(id) {
            Some(&pos) if pos != NOT_QUEUED => Some(pos),
            _ => None,
        }
    }

    /// The queued item with this id.
    #[inline]
    pub fn get(&self, id: usize) -> Option<&T> {
        self.position(id).map(|pos| &self.items[pos])
    }

    /// Replace the queued item that has the same id as `item` and restore
    /// heap order. Works for both decreased and increased keys.
    pub fn update(&mut self, item: T) -> Result<(), HeapError> {
        let id = item.heap_id();
        let pos = self.position(id).ok_or(HeapError::NotQueued { id })?;
        self.items[pos] = item;
        self.restore(pos);
        Ok(())
    }

    /// Remove the item with this id from anywhere in the heap, O(log n).
    pub fn remove(&mut self, id: usize) -> Result<T, HeapError> {
        let pos = self.position(id).ok_or(HeapError::NotQueued { id })?;
        Ok(self.take_at(pos))
    }

    /// Drop every item, keeping both allocations.
    pub fn clear(&mut self) {
        for item in &self.items {
            self.positions[item.heap_id()] = NOT_QUEUED;
        }
        self.items.clear();
    }

    /// Queued items in heap order (not sorted). Intended for diagnostics.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    // -----------------------------------------------------------------------
    // internals
    // -----------------------------------------------------------------------

    fn take_at(&mut self, pos: usize) -> T {
        let last = self.items.len() - 1;
        self.swap(pos, last);
        let Some(item) = self.items.pop() else {
            unreachable!("take_at on an empty heap");
        };
        self.positions[item.heap_id()] = NOT_QUEUED;
        if pos < self.items.len() {
            self.restore(pos);
        }
        item
    }

    fn restore(&mut self, pos: usize) {
        if pos > 0 && self.items[pos] < self.items[parent(pos)] {
            self.sift_up(pos);
        } else {
            self.sift_down(pos);
        }
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let p = parent(idx);
            if self.items[idx] >= self.items[p] {
                break;
            }
            self.swap(idx, p);
            idx = p;
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * idx + 1;
            let right = left + 1;
            let mut smallest = idx;
            if left < len && self.items[left] < self.items[smallest] {
                smallest = left;
            }
            if right < len && self.items[right] < self.items[smallest] {
                smallest = right;
            }
            if smallest == idx {
                break;
            }
            self.swap(idx, smallest);
            idx = smallest;
        }
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.items.swap(a, b);
        self.positions[self.items[a].heap_id()] = a;
        self.positions[self.items[b].heap_id()] = b;
    }

    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let ordered = (1..self.items.len()).all(|i| self.items[parent(i)] <= self.items[i]);
        let tracked = self
            .items
            .iter()
            .enumerate()
            .all(|(i, item)| self.positions[item.heap_id()] == i);
        let queued = self.positions.iter().filter(|&&p| p != NOT_QUEUED).count();
        ordered && tracked && queued == self.items.len()
    }
}

#[inline]
fn parent(i: usize) -> usize {
    (i - 1) / 2
}
