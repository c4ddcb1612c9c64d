//! Eppstein's k-shortest-paths enumeration over one snapshot of the search graph.
//!
//! A root-to-sink path is identified by the sidetracks it takes. For each node
//! `v` the persistent heap `Htree(v)` holds the cheapest incoming sidetrack of
//! every node on the tree path from the root to `v`. A candidate is a node of
//! the implicit *path graph* whose vertices are positions in these heaps:
//!
//! - heap edges move to a heap child, or to the next entry of the same
//!   `Hin` list, and cost the difference of the two deltas;
//! - a cross edge jumps from a sidetrack `(u, w)` to the root of `Htree(u)`,
//!   and costs that root's delta.
//!
//! Popping path-graph nodes cheapest-first yields paths in non-decreasing cost.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::graph::{EdgeId, SearchGraph, ShortestPathTree};
use crate::heap::{HeapRef, LeftistArena};
use crate::node::NodeId;
use crate::sidetrack::{Sidetrack, SidetrackIndex, SidetrackKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathNodeId(u32);

#[derive(Debug, Clone, Copy)]
struct PathNode {
    heap: HeapRef,
    hin_pos: u32,
    parent: Option<PathNodeId>,
    by_cross: bool,
    path_value: i64,
}

/// One path, still in implicit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Total path cost.
    pub cost: i64,
    /// Cost above the optimal path.
    pub path_value: i64,
    node: Option<PathNodeId>,
}

impl Candidate {
    /// Whether this is the shortest path itself (no sidetracks).
    #[must_use]
    pub fn is_optimal_path(&self) -> bool {
        self.node.is_none()
    }
}

/// Lazy, finite-or-infinite sequence of root-to-sink paths, cheapest first.
///
/// Graphs with cycles have infinitely many paths; callers bound the pull.
/// Equal-cost candidates come out in the order they were pushed.
pub struct KShortestPaths<'g> {
    graph: &'g SearchGraph,
    tree: &'g ShortestPathTree,
    sidetracks: SidetrackIndex,
    heaps: LeftistArena<SidetrackKey, NodeId>,
    htree: Vec<Option<Option<HeapRef>>>,
    arena: Vec<PathNode>,
    queue: BinaryHeap<Reverse<(i64, u64, PathNodeId)>>,
    next_seq: u64,
    started: bool,
}

impl<'g> KShortestPaths<'g> {
    #[must_use]
    pub fn new(graph: &'g SearchGraph, tree: &'g ShortestPathTree) -> Self {
        let sidetracks = SidetrackIndex::build(graph, tree);
        Self {
            graph,
            tree,
            sidetracks,
            heaps: LeftistArena::new(),
            htree: vec![None; graph.num_nodes()],
            arena: Vec::new(),
            queue: BinaryHeap::new(),
            next_seq: 0,
            started: false,
        }
    }

    /// Cost of the candidate the next call to `next` will return.
    #[must_use]
    pub fn peek_cost(&self) -> Option<i64> {
        let optimal = self.tree.optimal_cost()?;
        if !self.started {
            return Some(optimal);
        }
        self.queue.peek().map(|Reverse((pv, _, _))| optimal + pv)
    }

    /// Number of sidetracks in this snapshot.
    #[must_use]
    pub fn num_sidetracks(&self) -> usize {
        self.sidetracks.len()
    }

    /// Heap nodes allocated so far, across every `Htree`.
    #[must_use]
    pub fn heap_nodes(&self) -> usize {
        self.heaps.allocated()
    }

    #[must_use]
    pub fn tree(&self) -> &ShortestPathTree {
        self.tree
    }

    /// The sidetracks a candidate takes, the one nearest the sink first.
    #[must_use]
    pub fn sidetracks_of(&self, candidate: &Candidate) -> Vec<Sidetrack> {
        let mut nearest_root_first = Vec::new();
        let mut cursor = candidate.node;
        let mut active = true;
        while let Some(id) = cursor {
            let pn = self.arena[id.0 as usize];
            if active {
                nearest_root_first.push(self.sidetrack_at(pn.heap, pn.hin_pos));
            }
            active = pn.by_cross;
            cursor = pn.parent;
        }
        nearest_root_first.reverse();
        nearest_root_first
    }

    /// Expand a candidate into its edges, root first.
    #[must_use]
    pub fn path_edges(&self, candidate: &Candidate) -> Vec<EdgeId> {
        let mut reversed = Vec::new();
        let mut v = self.tree.sink();
        for st in self.sidetracks_of(candidate) {
            self.climb(&mut v, st.to, &mut reversed);
            reversed.push(st.edge);
            v = st.from;
        }
        self.climb(&mut v, self.tree.root(), &mut reversed);
        reversed.reverse();
        reversed
    }

    /// Follow tree edges from `*v` up to `target`, an ancestor of `*v`.
    fn climb(&self, v: &mut NodeId, target: NodeId, out: &mut Vec<EdgeId>) {
        while *v != target {
            let Some(e) = self.tree.parent_edge(*v) else {
                debug_assert!(false, "{target:?} is not a tree ancestor");
                return;
            };
            out.push(e);
            *v = self.graph.edge(e).from;
        }
    }

    fn sidetrack_at(&self, heap: HeapRef, hin_pos: u32) -> Sidetrack {
        let owner = self.heaps.item(heap);
        self.sidetracks.incoming(owner)[hin_pos as usize]
    }

    /// `Htree(v)`, built on demand from the nearest memoized ancestor.
    fn htree(&mut self, v: NodeId) -> Option<HeapRef> {
        if let Some(h) = self.htree[v.index()] {
            return h;
        }
        let mut chain = Vec::new();
        let mut cur = v;
        loop {
            if self.htree[cur.index()].is_some() {
                break;
            }
            chain.push(cur);
            match self.tree.parent_edge(cur) {
                Some(e) => cur = self.graph.edge(e).from,
                None => break,
            }
        }
        let mut acc = self.htree[cur.index()].flatten();
        for &node in chain.iter().rev() {
            if let Some(first) = self.sidetracks.incoming(node).first() {
                acc = Some(self.heaps.insert(acc, first.key(), node));
            }
            self.htree[node.index()] = Some(acc);
        }
        acc
    }

    fn push(&mut self, node: PathNode) {
        let id = PathNodeId(u32::try_from(self.arena.len()).unwrap_or(u32::MAX));
        self.arena.push(node);
        self.queue.push(Reverse((node.path_value, self.next_seq, id)));
        self.next_seq += 1;
    }

    fn push_children(&mut self, id: PathNodeId) {
        let pn = self.arena[id.0 as usize];
        let here = self.sidetrack_at(pn.heap, pn.hin_pos);
        let base = pn.path_value - here.delta;

        if pn.hin_pos == 0 {
            for child in self.heaps.children(pn.heap).into_iter().flatten() {
                self.push(PathNode {
                    heap: child,
                    hin_pos: 0,
                    parent: Some(id),
                    by_cross: false,
                    path_value: base + self.heaps.key(child).delta,
                });
            }
        }

        let owner = self.heaps.item(pn.heap);
        if let Some(next) = self.sidetracks.incoming(owner).get(pn.hin_pos as usize + 1).copied() {
            self.push(PathNode {
                heap: pn.heap,
                hin_pos: pn.hin_pos + 1,
                parent: Some(id),
                by_cross: false,
                path_value: base + next.delta,
            });
        }

        if let Some(root) = self.htree(here.from) {
            self.push(PathNode {
                heap: root,
                hin_pos: 0,
                parent: Some(id),
                by_cross: true,
                path_value: pn.path_value + self.heaps.key(root).delta,
            });
        }
    }
}

impl Iterator for KShortestPaths<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        let optimal = self.tree.optimal_cost()?;
        if !self.started {
            self.started = true;
            if let Some(root) = self.htree(self.tree.sink()) {
                self.push(PathNode {
                    heap: root,
                    hin_pos: 0,
                    parent: None,
                    by_cross: true,
                    path_value: self.heaps.key(root).delta,
                });
            }
            return Some(Candidate {
                cost: optimal,
                path_value: 0,
                node: None,
            });
        }
        let Reverse((path_value, _, id)) = self.queue.pop()?;
        self.push_children(id);
        Some(Candidate {
            cost: optimal + path_value,
            path_value,
            node: Some(id),
        })
    }
}
