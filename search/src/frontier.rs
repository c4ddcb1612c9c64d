//! A* open list with lazy deletion.
//!
//! Improving the g-value of a node already on the list pushes a fresh entry;
//! the outdated one is skipped when it surfaces. An entry is current when the
//! node is still open and its g-value equals the one recorded at push time.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::node::{FrontierKey, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct OpenEntry {
    key: FrontierKey,
    node: NodeId,
    g: i64,
}

/// Min-priority open list keyed by [`FrontierKey`].
#[derive(Debug, Default)]
pub struct OpenList {
    heap: BinaryHeap<Reverse<OpenEntry>>,
    next_insertion: u64,
    high_water: usize,
}

impl OpenList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `node` with priority `f`. Insertion order is assigned here.
    pub fn push(&mut self, node: NodeId, f: i64, g: i64) {
        let key = FrontierKey {
            f,
            insertion: self.next_insertion,
        };
        self.next_insertion += 1;
        self.heap.push(Reverse(OpenEntry { key, node, g }));
        self.high_water = self.high_water.max(self.heap.len());
    }

    /// Pop the best entry for which `is_current(node, g)` holds.
    pub fn pop(
        &mut self,
        mut is_current: impl FnMut(NodeId, i64) -> bool,
    ) -> Option<(NodeId, FrontierKey)> {
        while let Some(Reverse(entry)) = self.heap.pop() {
            if is_current(entry.node, entry.g) {
                return Some((entry.node, entry.key));
            }
        }
        None
    }

    /// Smallest `f` among current entries, discarding outdated ones on top.
    pub fn min_f(&mut self, mut is_current: impl FnMut(NodeId, i64) -> bool) -> Option<i64> {
        while let Some(Reverse(entry)) = self.heap.peek() {
            if is_current(entry.node, entry.g) {
                return Some(entry.key.f);
            }
            self.heap.pop();
        }
        None
    }

    /// Number of entries, outdated ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[must_use]
    pub fn high_water(&self) -> usize {
        self.high_water
    }
}
