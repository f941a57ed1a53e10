//! Binary min-heap priority queue.
//!
//! [`MinHeap`] keeps its elements in a flat array laid out as an implicit
//! complete binary tree. For the element at index `i`:
//!
//! | relation | index |
//! |---|---|
//! | parent | `(i - 1) / 2` |
//! | left child | `2i + 1` |
//! | right child | `2i + 2` |
//!
//! Ordering comes from a caller-supplied three-way comparison, so the same
//! heap serves natural ordering ([`MinHeap::new`]), reversed ordering, or
//! ordering by some projected key ([`MinHeap::with_comparator`]).
//!
//! ```
//! use gridstar_heap::{HeapError, MinHeap};
//!
//! let mut heap: MinHeap<_> = [5, 1, 4].into_iter().collect();
//! heap.push(2);
//! assert_eq!(heap.pop(), Ok(1));
//! assert_eq!(heap.pop(), Ok(2));
//! assert_eq!(heap.len(), 2);
//! heap.clear();
//! assert_eq!(heap.pop(), Err(HeapError::Underflow));
//! ```

use std::cmp::Ordering;
use std::fmt;

use thiserror::Error;

/// Errors reported by [`MinHeap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// `pop` was called on an empty heap.
    #[error("heap underflow")]
    Underflow,
}

/// Comparator used by [`MinHeap::new`].
pub type NaturalOrder<T> = fn(&T, &T) -> Ordering;

/// A minimum-priority queue ordered by a comparison function.
///
/// The comparator is expected to be a total order. If it is not, pops come
/// out in an unspecified order but the heap never panics.
#[derive(Clone)]
pub struct MinHeap<T, C = NaturalOrder<T>> {
    data: Vec<T>,
    cmp: C,
}

impl<T: Ord> MinHeap<T> {
    /// Create an empty heap using `T`'s natural ordering.
    pub fn new() -> Self {
        Self::with_comparator(T::cmp)
    }

    /// Create an empty heap with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, T::cmp)
    }
}

impl<T: Ord> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> MinHeap<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Create an empty heap ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            data: Vec::new(),
            cmp,
        }
    }

    /// Create an empty heap ordered by `cmp` with room for `capacity`
    /// elements.
    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            cmp,
        }
    }

    /// Number of elements in the heap.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the heap holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The minimum element, if any.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.data.first()
    }

    /// Insert `element`.
    pub fn push(&mut self, element: T) {
        self.data.push(element);
        self.sift_up(self.data.len() - 1);
    }

    /// Remove and return the minimum element.
    ///
    /// Fails with [`HeapError::Underflow`] if the heap is empty.
    pub fn pop(&mut self) -> Result<T, HeapError> {
        if self.data.is_empty() {
            return Err(HeapError::Underflow);
        }
        // Moves the last element into the root.
        let top = self.data.swap_remove(0);
        if !self.data.is_empty() {
            self.sift_down(0);
        }
        Ok(top)
    }

    /// Drop every element, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// The backing array in heap order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consume the heap, returning the backing array in heap order.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Consume the heap, yielding elements from smallest to largest.
    pub fn into_sorted_iter(mut self) -> impl Iterator<Item = T> {
        std::iter::from_fn(move || self.pop().ok())
    }

    #[inline]
    fn less(&self, a: usize, b: usize) -> bool {
        (self.cmp)(&self.data[a], &self.data[b]) == Ordering::Less
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.less(i, parent) {
                break;
            }
            self.data.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.data.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut smallest = i;
            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.data.swap(i, smallest);
            i = smallest;
        }
    }
}

impl<T: Ord> FromIterator<T> for MinHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut heap = Self::new();
        heap.extend(iter);
        heap
    }
}

impl<T, C> Extend<T> for MinHeap<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.push(element);
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for MinHeap<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MinHeap").field("data", &self.data).finish()
    }
}
