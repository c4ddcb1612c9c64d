//! Equal-cost reorderings of a plan.
//!
//! A reordering uses exactly the operators of the plan, each as often as the
//! plan does, in another order that is applicable from the initial state and
//! ends in a goal state. It costs what the plan costs, so every reordering of
//! an accepted plan is itself a plan of the same rank.

use std::collections::BTreeMap;

use kplan_kernel::task::{GroundTask, OperatorId, StateBuf};
use tracing::debug;

/// Depth-first enumeration of reorderings with a node budget.
#[derive(Debug, Clone, Copy)]
pub struct Reorderer<'t> {
    task: &'t GroundTask,
    max_nodes: u64,
}

struct Walk<'p> {
    plan: &'p [OperatorId],
    remaining: BTreeMap<OperatorId, usize>,
    prefix: Vec<OperatorId>,
    nodes: u64,
    limit: usize,
    found: Vec<Vec<OperatorId>>,
}

impl<'t> Reorderer<'t> {
    #[must_use]
    pub fn new(task: &'t GroundTask, max_nodes: u64) -> Self {
        Self { task, max_nodes }
    }

    /// Reorderings of `plan` other than `plan` itself, at most `limit` of
    /// them, in lexicographic order of their operator ids.
    ///
    /// The walk gives up after `max_nodes` visited prefixes; what was found
    /// by then is returned.
    #[must_use]
    pub fn reorderings(&self, plan: &[OperatorId], limit: usize) -> Vec<Vec<OperatorId>> {
        if limit == 0 || plan.len() < 2 {
            return Vec::new();
        }
        let mut remaining = BTreeMap::new();
        for &op in plan {
            *remaining.entry(op).or_insert(0) += 1;
        }
        let mut walk = Walk {
            plan,
            remaining,
            prefix: Vec::with_capacity(plan.len()),
            nodes: 0,
            limit,
            found: Vec::new(),
        };
        self.extend(&mut walk, self.task.initial_state());
        if walk.nodes >= self.max_nodes {
            debug!(
                nodes = walk.nodes,
                found = walk.found.len(),
                "reordering budget exhausted"
            );
        }
        walk.found
    }

    /// Returns `false` once the walk has to stop.
    fn extend(&self, walk: &mut Walk<'_>, state: &StateBuf) -> bool {
        if walk.nodes >= self.max_nodes {
            return false;
        }
        walk.nodes += 1;
        if walk.prefix.len() == walk.plan.len() {
            if self.task.is_goal(state) && walk.prefix != walk.plan {
                walk.found.push(walk.prefix.clone());
            }
            return walk.found.len() < walk.limit;
        }
        // One branch per distinct operator keeps the sequences distinct.
        let choices: Vec<OperatorId> = walk
            .remaining
            .iter()
            .filter(|&(_, &count)| count > 0)
            .map(|(&op, _)| op)
            .collect();
        for op in choices {
            let operator = self.task.operator(op);
            if !operator.is_applicable(state) {
                continue;
            }
            let next = operator.apply(state);
            if let Some(count) = walk.remaining.get_mut(&op) {
                *count -= 1;
            }
            walk.prefix.push(op);
            let go_on = self.extend(walk, &next);
            walk.prefix.pop();
            if let Some(count) = walk.remaining.get_mut(&op) {
                *count += 1;
            }
            if !go_on {
                return false;
            }
        }
        true
    }
}
