//! The search graph: an append-only arena of nodes and edges.
//!
//! Nodes and edges are addressed by dense integer ids and never removed, so
//! later stages (sidetrack heaps, the path graph) can refer to them by index
//! without borrowing into the arena.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use kplan_kernel::task::{OperatorId, StateId};

use crate::node::{NodeId, NodeStatus, SearchNode};

/// Dense index of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub u32);

impl EdgeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// What an edge stands for.
///
/// `Goal` edges connect goal states to the virtual sink; they carry no
/// action and cost nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EdgeLabel {
    Operator(OperatorId),
    Goal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub label: EdgeLabel,
    pub cost: i64,
}

#[derive(Debug, Default)]
pub struct SearchGraph {
    nodes: Vec<SearchNode>,
    edges: Vec<Edge>,
    outgoing: Vec<Vec<EdgeId>>,
}

impl SearchGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node in status [`NodeStatus::New`].
    ///
    /// # Panics
    ///
    /// Panics if the arena exceeds `u32::MAX` nodes.
    pub fn add_node(&mut self, state: Option<StateId>) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).expect("search graph node overflow"));
        self.nodes.push(SearchNode::new(state, u64::from(id.0)));
        self.outgoing.push(Vec::new());
        id
    }

    /// Record an examined edge.
    ///
    /// # Panics
    ///
    /// Panics if the arena exceeds `u32::MAX` edges.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, label: EdgeLabel, cost: i64) -> EdgeId {
        let id = EdgeId(u32::try_from(self.edges.len()).expect("search graph edge overflow"));
        self.edges.push(Edge { from, to, label, cost });
        self.outgoing[from.index()].push(id);
        id
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.index()]
    }

    #[must_use]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    #[must_use]
    pub fn outgoing(&self, id: NodeId) -> &[EdgeId] {
        &self.outgoing[id.index()]
    }

    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        (0u32..).zip(&self.edges).map(|(i, e)| (EdgeId(i), e))
    }

    #[must_use]
    pub fn num_closed(&self) -> usize {
        self.nodes.iter().filter(|n| n.status == NodeStatus::Closed).count()
    }

    /// Shortest-path tree from `root` over every recorded edge.
    ///
    /// Dijkstra with `(distance, node id)` ordering; of several equally short
    /// parents the first one relaxed is kept. Nodes unreachable through
    /// recorded edges get no distance.
    #[must_use]
    pub fn shortest_path_tree(&self, root: NodeId, sink: NodeId) -> ShortestPathTree {
        let n = self.nodes.len();
        let mut dist: Vec<Option<i64>> = vec![None; n];
        let mut parent: Vec<Option<EdgeId>> = vec![None; n];
        let mut settled = vec![false; n];
        let mut queue = BinaryHeap::new();

        dist[root.index()] = Some(0);
        queue.push(Reverse((0i64, root)));
        while let Some(Reverse((d, v))) = queue.pop() {
            if std::mem::replace(&mut settled[v.index()], true) {
                continue;
            }
            for &eid in &self.outgoing[v.index()] {
                let e = &self.edges[eid.index()];
                let nd = d.saturating_add(e.cost);
                let better = match dist[e.to.index()] {
                    None => true,
                    Some(old) => nd < old,
                };
                if better && !settled[e.to.index()] {
                    dist[e.to.index()] = Some(nd);
                    parent[e.to.index()] = Some(eid);
                    queue.push(Reverse((nd, e.to)));
                }
            }
        }

        ShortestPathTree {
            root,
            sink,
            dist,
            parent,
        }
    }
}

/// Distances and tree edges of one snapshot of the search graph.
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    root: NodeId,
    sink: NodeId,
    dist: Vec<Option<i64>>,
    parent: Vec<Option<EdgeId>>,
}

impl ShortestPathTree {
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn sink(&self) -> NodeId {
        self.sink
    }

    #[must_use]
    pub fn dist(&self, v: NodeId) -> Option<i64> {
        self.dist.get(v.index()).copied().flatten()
    }

    #[must_use]
    pub fn parent_edge(&self, v: NodeId) -> Option<EdgeId> {
        self.parent.get(v.index()).copied().flatten()
    }

    /// Cost of the cheapest root-to-sink path, if one is recorded.
    #[must_use]
    pub fn optimal_cost(&self) -> Option<i64> {
        self.dist(self.sink)
    }

    #[must_use]
    pub fn is_tree_edge(&self, id: EdgeId, edge: &Edge) -> bool {
        self.parent_edge(edge.to) == Some(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dist.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dist.is_empty()
    }
}
