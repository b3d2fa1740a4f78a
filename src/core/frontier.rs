//! Min-priority frontier with lazy decrease-key
//!
//! A vertex may sit in the frontier several times with different priorities.
//! Consumers re-validate popped entries against their live distance array.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::graph::VertexIdx;

/// Frontier entry ordered so that `BinaryHeap` pops the smallest distance first
#[derive(Debug, Clone, Copy)]
pub struct FrontierEntry {
    pub vertex: VertexIdx,
    pub distance: f64,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: reverse ordering
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

/// Pending vertices keyed by tentative distance
#[derive(Debug, Default, Clone)]
pub struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    /// Insert a candidate; duplicates are allowed
    #[inline]
    pub fn push(&mut self, vertex: VertexIdx, distance: f64) {
        self.heap.push(FrontierEntry { vertex, distance });
    }

    /// Remove the minimum-distance entry
    #[inline]
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.heap.pop()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_distance_order() {
        let mut frontier = Frontier::new();
        frontier.push(3, 7.5);
        frontier.push(1, 0.0);
        frontier.push(2, 2.0);
        let order: Vec<_> = std::iter::from_fn(|| frontier.pop()).map(|e| e.vertex).collect();
        assert_eq!(order, vec![1, 2, 3]);
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut frontier = Frontier::new();
        frontier.push(4, 9.0);
        frontier.push(4, 3.0);
        assert_eq!(frontier.len(), 2);

        let first = frontier.pop().unwrap();
        assert_eq!((first.vertex, first.distance), (4, 3.0));
        let stale = frontier.pop().unwrap();
        assert_eq!((stale.vertex, stale.distance), (4, 9.0));
    }

    #[test]
    fn test_pop_empty() {
        let mut frontier = Frontier::with_capacity(8);
        assert!(frontier.pop().is_none());
    }
}
