//! Incremental A* over a grounded task.
//!
//! [`AStarSearch`] is a stepper: each [`AStarSearch::step`] pops one node and
//! expands it, recording every examined edge in the [`SearchGraph`]. The
//! controller drives it in batches and takes shortest-path snapshots of the
//! graph in between, so the search is never run to completion in one call.
//!
//! Goal states get a zero-cost edge to a single virtual sink node. The search
//! is solved when the sink is popped; its g is then the optimal plan cost.

use kplan_kernel::heuristic::{Estimate, Heuristic};
use kplan_kernel::task::{GroundTask, StateBuf, StateId, StateRegistry};
use tracing::trace;

use crate::error::SearchError;
use crate::frontier::OpenList;
use crate::graph::{EdgeId, EdgeLabel, SearchGraph};
use crate::node::{NodeId, NodeStatus};
use crate::request::EnginePolicyV1;
use crate::result::SearchStatistics;
use crate::symmetry::SymmetryGroup;

/// What one [`AStarSearch::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A state was expanded.
    Expanded { goal_generated: bool },
    /// The goal sink was popped with this g.
    Solved(i64),
    /// The open list is empty.
    Exhausted,
    /// The state ceiling has been reached; nothing was expanded.
    MemoryExceeded,
}

pub struct AStarSearch<'t> {
    task: &'t GroundTask,
    heuristic: &'t dyn Heuristic,
    symmetry: Option<&'t SymmetryGroup>,
    reopen_closed: bool,
    max_states: Option<usize>,
    registry: StateRegistry,
    node_of_state: Vec<NodeId>,
    graph: SearchGraph,
    open: OpenList,
    root: NodeId,
    sink: NodeId,
    stats: SearchStatistics,
}

impl<'t> AStarSearch<'t> {
    /// Set up the search and evaluate the initial state.
    ///
    /// With `symmetry`, every state (the initial one included) is replaced by
    /// its orbit representative before it is registered.
    ///
    /// # Errors
    ///
    /// [`SearchError::NegativeHeuristic`] if the initial estimate is negative.
    pub fn new(
        task: &'t GroundTask,
        heuristic: &'t dyn Heuristic,
        symmetry: Option<&'t SymmetryGroup>,
        policy: &EnginePolicyV1,
    ) -> Result<Self, SearchError> {
        let mut search = Self {
            task,
            heuristic,
            symmetry,
            reopen_closed: policy.reopen_closed,
            max_states: policy.max_states,
            registry: StateRegistry::new(),
            node_of_state: Vec::new(),
            graph: SearchGraph::new(),
            open: OpenList::new(),
            root: NodeId(0),
            sink: NodeId(0),
            stats: SearchStatistics::default(),
        };
        let initial = search.canonical(task.initial_state().clone());
        let (root, _) = search.intern(initial);
        search.root = root;
        search.sink = search.graph.add_node(None);
        search.open_node(root, 0, None)?;
        Ok(search)
    }

    /// Pop and expand one node.
    ///
    /// # Errors
    ///
    /// [`SearchError::NegativeHeuristic`] if a successor's estimate is
    /// negative.
    pub fn step(&mut self) -> Result<StepOutcome, SearchError> {
        if self.max_states.is_some_and(|max| self.registry.len() >= max) {
            return Ok(StepOutcome::MemoryExceeded);
        }
        let graph = &self.graph;
        let popped = self.open.pop(|n, g| {
            let node = graph.node(n);
            node.status == NodeStatus::Open && node.g == g
        });
        let Some((id, key)) = popped else {
            return Ok(StepOutcome::Exhausted);
        };
        self.graph.node_mut(id).status = NodeStatus::Closed;
        let g = self.graph.node(id).g;
        if id == self.sink {
            trace!(g, "goal sink popped");
            return Ok(StepOutcome::Solved(g));
        }
        self.stats.expanded += 1;
        trace!(node = id.0, g, f = key.f, "expand");
        let goal_generated = self.expand(id, g)?;
        Ok(StepOutcome::Expanded { goal_generated })
    }

    /// Smallest f on the open list, or `None` when it is empty.
    pub fn min_f(&mut self) -> Option<i64> {
        let graph = &self.graph;
        self.open.min_f(|n, g| {
            let node = graph.node(n);
            node.status == NodeStatus::Open && node.g == g
        })
    }

    /// Whether no node is waiting for expansion.
    pub fn open_is_empty(&mut self) -> bool {
        self.min_f().is_none()
    }

    #[must_use]
    pub fn graph(&self) -> &SearchGraph {
        &self.graph
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn sink(&self) -> NodeId {
        self.sink
    }

    #[must_use]
    pub fn task(&self) -> &'t GroundTask {
        self.task
    }

    #[must_use]
    pub fn registry(&self) -> &StateRegistry {
        &self.registry
    }

    /// The state of a node, `None` for the sink.
    #[must_use]
    pub fn state_of(&self, node: NodeId) -> Option<&StateBuf> {
        self.graph.node(node).state.map(|s| self.registry.get(s))
    }

    /// Counters so far, with `states` and `graph_edges` filled in.
    #[must_use]
    pub fn statistics(&self) -> SearchStatistics {
        SearchStatistics {
            states: self.registry.len() as u64,
            graph_edges: self.graph.num_edges() as u64,
            ..self.stats.clone()
        }
    }

    #[must_use]
    pub fn open_high_water(&self) -> usize {
        self.open.high_water()
    }

    fn canonical(&self, state: StateBuf) -> StateBuf {
        match self.symmetry {
            Some(group) => group.canonical_state(&state).0,
            None => state,
        }
    }

    /// Registry lookup; creates a node for a state seen for the first time.
    fn intern(&mut self, state: StateBuf) -> (NodeId, bool) {
        let (sid, is_new) = self.registry.insert(state);
        if is_new {
            let node = self.graph.add_node(Some(sid));
            self.node_of_state.push(node);
            debug_assert_eq!(self.node_of_state.len(), self.registry.len());
        }
        (self.node_of_state[sid.0 as usize], is_new)
    }

    fn expand(&mut self, id: NodeId, g: i64) -> Result<bool, SearchError> {
        let Some(sid) = self.graph.node(id).state else {
            return Ok(false);
        };
        if self.graph.node(id).edges_recorded {
            // Reopened: the edges are known, only g changed.
            let out: Vec<EdgeId> = self.graph.outgoing(id).to_vec();
            for e in out {
                let edge = *self.graph.edge(e);
                self.relax(edge.to, g.saturating_add(edge.cost), e)?;
            }
            return Ok(false);
        }
        self.graph.node_mut(id).edges_recorded = true;

        let task = self.task;
        let state = self.registry.get(sid).clone();
        let mut goal_generated = false;
        for op in task.applicable(&state) {
            self.stats.generated += 1;
            let successor = task.apply(&state, op);
            let (successor, moved) = match self.symmetry {
                Some(group) => {
                    let (rep, trace) = group.canonical_state(&successor);
                    (rep, !trace.is_empty())
                }
                None => (successor, false),
            };
            if moved {
                self.stats.pruned_by_symmetry += 1;
            }
            let (to, _) = self.intern(successor);
            let cost = task.operator(op).cost;
            let e = self.graph.add_edge(id, to, EdgeLabel::Operator(op), cost);
            goal_generated |= self.is_goal_node(to);
            self.relax(to, g.saturating_add(cost), e)?;
        }
        if task.is_goal(&state) {
            let e = self.graph.add_edge(id, self.sink, EdgeLabel::Goal, 0);
            goal_generated = true;
            self.relax(self.sink, g, e)?;
        }
        Ok(goal_generated)
    }

    fn is_goal_node(&self, node: NodeId) -> bool {
        self.state_of(node).is_some_and(|s| self.task.is_goal(s))
    }

    fn relax(&mut self, to: NodeId, g: i64, via: EdgeId) -> Result<(), SearchError> {
        let (status, old_g) = {
            let node = self.graph.node(to);
            (node.status, node.g)
        };
        match status {
            NodeStatus::New => self.open_node(to, g, Some(via)),
            NodeStatus::Open if g < old_g => {
                self.update(to, g, via);
                Ok(())
            }
            NodeStatus::Closed if g < old_g && self.reopen_closed && to != self.sink => {
                self.stats.reopened += 1;
                trace!(node = to.0, old_g, g, "reopen");
                self.update(to, g, via);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// First visit: evaluate and push, or mark as a dead end.
    fn open_node(&mut self, id: NodeId, g: i64, via: Option<EdgeId>) -> Result<(), SearchError> {
        let h = match self.graph.node(id).state {
            Some(sid) => match self.evaluate(sid)? {
                Some(h) => h,
                None => {
                    self.stats.dead_ends += 1;
                    self.graph.node_mut(id).status = NodeStatus::DeadEnd;
                    return Ok(());
                }
            },
            None => 0,
        };
        let node = self.graph.node_mut(id);
        node.g = g;
        node.h = h;
        node.parent = via;
        node.status = NodeStatus::Open;
        let f = node.f();
        self.open.push(id, f, g);
        Ok(())
    }

    fn update(&mut self, id: NodeId, g: i64, via: EdgeId) {
        let node = self.graph.node_mut(id);
        node.g = g;
        node.parent = Some(via);
        node.status = NodeStatus::Open;
        let f = node.f();
        self.open.push(id, f, g);
    }

    fn evaluate(&mut self, sid: StateId) -> Result<Option<i64>, SearchError> {
        self.stats.evaluated += 1;
        let state = self.registry.get(sid);
        match self.heuristic.estimate(self.task, state) {
            Estimate::DeadEnd => Ok(None),
            Estimate::Value(h) if h < 0 => Err(SearchError::NegativeHeuristic {
                heuristic: self.heuristic.name().to_owned(),
                value: h,
                state: self.task.describe_state(state),
            }),
            Estimate::Value(h) => Ok(Some(h)),
        }
    }
}
