//! Search nodes and the open-list ordering key.

use kplan_kernel::task::StateId;

use crate::graph::EdgeId;

/// Dense index of a node in [`crate::graph::SearchGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Lifecycle of a node during A*.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    /// Created, not yet evaluated.
    New,
    /// On the open list.
    Open,
    /// Popped and expanded (or, for the goal sink, popped).
    Closed,
    /// Heuristic reported no reachable goal. Never expanded.
    DeadEnd,
}

/// One vertex of the search graph.
///
/// `state` is `None` only for the virtual goal sink, which every goal state
/// reaches through a zero-cost edge.
#[derive(Debug, Clone)]
pub struct SearchNode {
    pub state: Option<StateId>,
    /// Cheapest cost from the initial state found so far.
    pub g: i64,
    pub h: i64,
    /// Edge through which `g` was achieved.
    pub parent: Option<EdgeId>,
    pub status: NodeStatus,
    /// Order in which the node was first generated.
    pub generation: u64,
    /// Whether the outgoing edges have been recorded.
    pub edges_recorded: bool,
}

impl SearchNode {
    #[must_use]
    pub fn new(state: Option<StateId>, generation: u64) -> Self {
        Self {
            state,
            g: 0,
            h: 0,
            parent: None,
            status: NodeStatus::New,
            generation,
            edges_recorded: false,
        }
    }

    #[must_use]
    pub fn f(&self) -> i64 {
        self.g.saturating_add(self.h)
    }
}

/// The open-list ordering key: `(f, insertion order)`.
///
/// Lower `f` first; equal `f` pops in FIFO insertion order. No other field
/// takes part, so the order never depends on hashing or memory layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrontierKey {
    pub f: i64,
    pub insertion: u64,
}
