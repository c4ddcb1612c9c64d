//! Persistent leftist heaps in an append-only arena.
//!
//! A heap is just a [`HeapRef`] to its root. Merging never mutates an existing
//! node: it copies the nodes along the right spine of the smaller root and
//! points the copies at the untouched subtrees. Every heap built so far stays
//! valid, and heaps that share history share storage. This is what lets each
//! search node own a full sidetrack heap at O(log n) extra space.

/// Index of a heap node in a [`LeftistArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeapRef(u32);

impl HeapRef {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct HeapNode<K, T> {
    key: K,
    item: T,
    rank: u32,
    left: Option<HeapRef>,
    right: Option<HeapRef>,
}

/// Arena of immutable leftist-heap nodes ordered by `K` (smallest on top).
#[derive(Debug, Clone)]
pub struct LeftistArena<K, T> {
    nodes: Vec<HeapNode<K, T>>,
}

impl<K, T> Default for LeftistArena<K, T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<K: Ord + Copy, T: Copy> LeftistArena<K, T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A one-element heap.
    pub fn singleton(&mut self, key: K, item: T) -> HeapRef {
        self.alloc(HeapNode {
            key,
            item,
            rank: 1,
            left: None,
            right: None,
        })
    }

    /// `heap` plus one element. `heap` itself is unchanged.
    pub fn insert(&mut self, heap: Option<HeapRef>, key: K, item: T) -> HeapRef {
        let single = self.singleton(key, item);
        // Merging a non-empty heap always yields a root.
        self.merge(heap, Some(single)).unwrap_or(single)
    }

    /// Union of two heaps. Both inputs remain valid.
    pub fn merge(&mut self, a: Option<HeapRef>, b: Option<HeapRef>) -> Option<HeapRef> {
        let (a, b) = match (a, b) {
            (None, x) | (x, None) => return x,
            (Some(a), Some(b)) => (a, b),
        };
        let (lo, hi) = if self.key(a) <= self.key(b) { (a, b) } else { (b, a) };
        let top = self.nodes[lo.index()].clone();
        let merged = self.merge(top.right, Some(hi));
        let (left, right) = if self.rank(top.left) >= self.rank(merged) {
            (top.left, merged)
        } else {
            (merged, top.left)
        };
        Some(self.alloc(HeapNode {
            key: top.key,
            item: top.item,
            rank: self.rank(right) + 1,
            left,
            right,
        }))
    }

    #[must_use]
    pub fn key(&self, r: HeapRef) -> K {
        self.nodes[r.index()].key
    }

    #[must_use]
    pub fn item(&self, r: HeapRef) -> T {
        self.nodes[r.index()].item
    }

    /// Heap children of `r`; both have keys `>=` the key of `r`.
    #[must_use]
    pub fn children(&self, r: HeapRef) -> [Option<HeapRef>; 2] {
        let n = &self.nodes[r.index()];
        [n.left, n.right]
    }

    /// Total nodes allocated across every heap in the arena.
    #[must_use]
    pub fn allocated(&self) -> usize {
        self.nodes.len()
    }

    /// All items of `heap` in ascending key order. Test and debug helper.
    #[must_use]
    pub fn drain_sorted(&self, heap: Option<HeapRef>) -> Vec<(K, T)> {
        let mut out = Vec::new();
        let mut frontier: Vec<HeapRef> = heap.into_iter().collect();
        while !frontier.is_empty() {
            let pos = (0..frontier.len()).min_by_key(|&i| self.key(frontier[i])).unwrap_or(0);
            let r = frontier.swap_remove(pos);
            out.push((self.key(r), self.item(r)));
            frontier.extend(self.children(r).into_iter().flatten());
        }
        out
    }

    fn rank(&self, r: Option<HeapRef>) -> u32 {
        r.map_or(0, |r| self.nodes[r.index()].rank)
    }

    fn alloc(&mut self, node: HeapNode<K, T>) -> HeapRef {
        let id = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX);
        debug_assert!(id < u32::MAX, "heap arena overflow");
        self.nodes.push(node);
        HeapRef(id)
    }
}
