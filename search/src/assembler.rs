//! Turning enumerated paths into plans.
//!
//! A path from the enumerator is a list of search-graph edges. With
//! search-time symmetry pruning the edges are between orbit representatives,
//! so their operators are *surrogates*: each applies to the representative,
//! not to the state the real plan is in. The assembler keeps the composed
//! permutation `T` with `representative = T(real state)` and maps every
//! surrogate back through `T⁻¹`.

use kplan_kernel::task::{GroundTask, OperatorId};

use crate::astar::AStarSearch;
use crate::graph::{EdgeId, EdgeLabel};
use crate::symmetry::SymmetryGroup;

/// A plan over real operators.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Plan {
    pub cost: i64,
    pub operators: Vec<OperatorId>,
}

impl Plan {
    /// Operator names, in order.
    #[must_use]
    pub fn action_names(&self, task: &GroundTask) -> Vec<String> {
        self.operators.iter().map(|&o| task.operator(o).name.clone()).collect()
    }
}

/// Decodes edge paths of one search into real plans.
pub struct PlanAssembler<'a> {
    task: &'a GroundTask,
    symmetry: Option<&'a SymmetryGroup>,
}

impl<'a> PlanAssembler<'a> {
    /// `symmetry` must be the group the search canonicalized states with.
    #[must_use]
    pub fn new(task: &'a GroundTask, symmetry: Option<&'a SymmetryGroup>) -> Self {
        Self { task, symmetry }
    }

    /// Build the plan for a root-to-sink edge path. The goal edge is dropped.
    #[must_use]
    pub fn assemble(&self, search: &AStarSearch<'_>, path: &[EdgeId]) -> Plan {
        let graph = search.graph();
        let mut operators = Vec::with_capacity(path.len());
        let mut cost = 0i64;
        let mut surrogates = Vec::with_capacity(path.len());
        for &e in path {
            let edge = graph.edge(e);
            cost = cost.saturating_add(edge.cost);
            if let EdgeLabel::Operator(op) = edge.label {
                surrogates.push((e, op));
            }
        }

        match self.symmetry {
            None => operators.extend(surrogates.iter().map(|&(_, op)| op)),
            Some(group) => {
                let (_, mut trace) = group.canonical_state(self.task.initial_state());
                for &(e, op) in &surrogates {
                    operators.push(group.unmap_operator(op, &trace));
                    let Some(from) = search.state_of(graph.edge(e).from) else {
                        debug_assert!(false, "operator edge leaves the goal sink");
                        continue;
                    };
                    let successor = self.task.apply(from, op);
                    trace.extend(group.canonical_state(&successor).1);
                }
            }
        }

        debug_assert_eq!(
            self.task.validate_plan(&operators),
            Some(cost),
            "assembled plan must be valid with the path cost"
        );
        Plan { cost, operators }
    }
}
