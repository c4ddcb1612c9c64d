//! Sidetrack edges and the per-node incoming sidetrack lists.
//!
//! Against a [`ShortestPathTree`], every recorded edge that is not the tree
//! edge of its target is a sidetrack. Taking it instead of the tree path costs
//! `delta = d(from) + cost - d(to)`, which is never negative because `d` is a
//! shortest distance.

use crate::graph::{EdgeId, EdgeLabel, SearchGraph, ShortestPathTree};
use crate::node::NodeId;

/// A sidetrack and its detour cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sidetrack {
    pub edge: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub label: EdgeLabel,
    pub delta: i64,
    /// Tree distance of `from`; second ordering criterion.
    pub from_dist: i64,
}

/// Total order on sidetracks: `(delta, from_dist, from, edge)`.
///
/// The edge id is unique, so no two sidetracks compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SidetrackKey {
    pub delta: i64,
    pub from_dist: i64,
    pub from: NodeId,
    pub edge: EdgeId,
}

impl Sidetrack {
    #[must_use]
    pub fn key(&self) -> SidetrackKey {
        SidetrackKey {
            delta: self.delta,
            from_dist: self.from_dist,
            from: self.from,
            edge: self.edge,
        }
    }
}

/// `Hin(v)` for every node: incoming sidetracks sorted by [`SidetrackKey`].
#[derive(Debug, Clone)]
pub struct SidetrackIndex {
    incoming: Vec<Vec<Sidetrack>>,
    total: usize,
}

impl SidetrackIndex {
    /// Classify every recorded edge between tree-reachable nodes.
    #[must_use]
    pub fn build(graph: &SearchGraph, tree: &ShortestPathTree) -> Self {
        let mut incoming: Vec<Vec<Sidetrack>> = vec![Vec::new(); graph.num_nodes()];
        let mut total = 0;
        for (id, edge) in graph.edges() {
            let (Some(d_from), Some(d_to)) = (tree.dist(edge.from), tree.dist(edge.to)) else {
                continue;
            };
            if tree.is_tree_edge(id, edge) {
                continue;
            }
            let delta = d_from.saturating_add(edge.cost) - d_to;
            debug_assert!(delta >= 0, "negative sidetrack delta on edge {id:?}");
            incoming[edge.to.index()].push(Sidetrack {
                edge: id,
                from: edge.from,
                to: edge.to,
                label: edge.label,
                delta,
                from_dist: d_from,
            });
            total += 1;
        }
        for list in &mut incoming {
            list.sort_unstable_by_key(Sidetrack::key);
        }
        Self { incoming, total }
    }

    /// `Hin(v)`, cheapest first.
    #[must_use]
    pub fn incoming(&self, v: NodeId) -> &[Sidetrack] {
        self.incoming.get(v.index()).map_or(&[], Vec::as_slice)
    }

    /// Number of sidetracks across all nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
