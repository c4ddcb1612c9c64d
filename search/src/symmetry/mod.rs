//! Structural symmetries of a grounded task.
//!
//! The group is computed once from the static task description (no state
//! enumeration) as permutations of variables, values and operators. It is used
//! two ways:
//!
//! - search-time pruning: successor states are replaced by an orbit
//!   representative, so a state symmetric to one already reached is a
//!   duplicate ([`SymmetryGroup::canonical_state`]);
//! - plan-time canonicalization: two plans that are images of each other under
//!   the group share a key ([`SymmetryGroup::canonical_plan_key`]), and a plan
//!   can be expanded to its symmetric images ([`SymmetryGroup::symmetric_plans`]).
//!
//! Generators always fix the goal. Plan-time use additionally requires that
//! they fix the initial state; [`SymmetryGroup::stabilizes_initial_state`]
//! says which kind a group is.

pub mod automorphism;
pub mod orbit;
pub mod pdg;
pub mod refine;

use std::collections::{HashSet, VecDeque};

use kplan_kernel::proof::canon::{canonical_json_bytes, CanonError};
use kplan_kernel::proof::hash::{canonical_hash, ContentHash};
use kplan_kernel::proof::hash_domain::HashDomain;
use kplan_kernel::task::{Fact, GroundTask, OperatorId, StateBuf};
use serde_json::json;
use tracing::info;

use crate::request::SymmetryPolicyV1;
use orbit::UnionFind;
use pdg::PdgLayout;

/// One group generator acting on states and operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generator {
    /// Variable `v` is sent to `var_perm[v]`.
    var_perm: Vec<u32>,
    /// Value `d` of `v` is sent to value `value_map[v][d]` of `var_perm[v]`.
    value_map: Vec<Vec<u32>>,
    op_perm: Vec<u32>,
    op_inverse: Vec<u32>,
    moves_state: bool,
    moves_ops: bool,
}

impl Generator {
    fn from_vertex_permutation(perm: &[u32], layout: &PdgLayout, task: &GroundTask) -> Self {
        let nv = layout.num_vars;
        let var_perm: Vec<u32> = (0..nv).map(|v| perm[layout.var_vertex(v) as usize]).collect();
        let value_map: Vec<Vec<u32>> = (0u32..)
            .zip(task.variables())
            .map(|(v, var)| {
                let target = var_perm[v as usize];
                (0..u32::try_from(var.domain_size()).unwrap_or(0))
                    .map(|d| {
                        perm[layout.value_vertex(v, d) as usize] - layout.value_vertex(target, 0)
                    })
                    .collect()
            })
            .collect();
        let op_base = layout.op_vertex(0);
        let op_perm: Vec<u32> = (0..layout.num_ops)
            .map(|o| perm[layout.op_vertex(o) as usize] - op_base)
            .collect();
        let mut op_inverse = vec![0u32; op_perm.len()];
        for (o, &image) in (0u32..).zip(&op_perm) {
            op_inverse[image as usize] = o;
        }
        let moves_state = (0u32..).zip(&var_perm).any(|(v, &t)| v != t)
            || value_map.iter().any(|m| (0u32..).zip(m).any(|(d, &e)| d != e));
        let moves_ops = (0u32..).zip(&op_perm).any(|(o, &t)| o != t);
        Self {
            var_perm,
            value_map,
            op_perm,
            op_inverse,
            moves_state,
            moves_ops,
        }
    }

    #[must_use]
    pub fn map_fact(&self, f: Fact) -> Fact {
        Fact::new(self.var_perm[f.var as usize], self.value_map[f.var as usize][f.value as usize])
    }

    #[must_use]
    pub fn apply_state(&self, state: &StateBuf) -> StateBuf {
        let mut out = vec![0u32; state.len()];
        for (v, &d) in state.values().iter().enumerate() {
            out[self.var_perm[v] as usize] = self.value_map[v][d as usize];
        }
        StateBuf::from_values(out)
    }

    #[must_use]
    pub fn map_operator(&self, op: OperatorId) -> OperatorId {
        OperatorId(self.op_perm[op.index()])
    }

    #[must_use]
    pub fn unmap_operator(&self, op: OperatorId) -> OperatorId {
        OperatorId(self.op_inverse[op.index()])
    }

    #[must_use]
    pub fn moves_state(&self) -> bool {
        self.moves_state
    }

    /// Whether this generator maps `task` onto itself: operators with their
    /// costs, the goal, and (if asked) the initial state.
    #[must_use]
    pub fn preserves(&self, task: &GroundTask, check_initial_state: bool) -> bool {
        let map_sorted = |facts: &[Fact]| {
            let mut v: Vec<Fact> = facts.iter().map(|&f| self.map_fact(f)).collect();
            v.sort_unstable();
            v
        };
        let ops_ok = (0u32..).zip(task.operators()).all(|(o, op)| {
            let image = task.operator(self.map_operator(OperatorId(o)));
            image.cost == op.cost
                && map_sorted(&op.preconditions) == image.preconditions
                && map_sorted(&op.effects) == image.effects
        });
        let goal_ok = map_sorted(task.goal()) == task.goal();
        let init_ok = !check_initial_state
            || self.apply_state(task.initial_state()) == *task.initial_state();
        ops_ok && goal_ok && init_ok
    }
}

/// Generators of (a subgroup of) the task's automorphism group.
#[derive(Debug, Clone)]
pub struct SymmetryGroup {
    generators: Vec<Generator>,
    stabilizes_initial_state: bool,
    complete: bool,
    max_orbit_size: usize,
    num_vars: usize,
    num_ops: usize,
}

impl SymmetryGroup {
    /// Compute generators from the task's description graph.
    #[must_use]
    pub fn compute(
        task: &GroundTask,
        policy: &SymmetryPolicyV1,
        stabilize_initial_state: bool,
    ) -> Self {
        let (graph, layout) = pdg::build(task, stabilize_initial_state);
        let search = automorphism::find_generators(&graph, policy.max_search_nodes);
        let generators: Vec<Generator> = search
            .generators
            .iter()
            .map(|perm| Generator::from_vertex_permutation(perm, &layout, task))
            .filter(|g| g.moves_state || g.moves_ops)
            .collect();
        debug_assert!(generators.iter().all(|g| g.preserves(task, stabilize_initial_state)));
        info!(
            generators = generators.len(),
            stabilize_initial_state,
            complete = search.complete,
            nodes = search.nodes_visited,
            "symmetry group computed"
        );
        Self {
            generators,
            stabilizes_initial_state: stabilize_initial_state,
            complete: search.complete,
            max_orbit_size: policy.max_orbit_size,
            num_vars: task.variables().len(),
            num_ops: task.operators().len(),
        }
    }

    #[must_use]
    pub fn generators(&self) -> &[Generator] {
        &self.generators
    }

    /// Domain-separated digest of the generator set, in discovery order.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if canonical serialization fails.
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        let generators: Vec<_> = self
            .generators
            .iter()
            .map(|g| {
                json!({
                    "op_perm": g.op_perm,
                    "value_map": g.value_map,
                    "var_perm": g.var_perm,
                })
            })
            .collect();
        let bytes = canonical_json_bytes(&json!({
            "complete": self.complete,
            "generators": generators,
            "stabilizes_initial_state": self.stabilizes_initial_state,
        }))?;
        Ok(canonical_hash(HashDomain::SymmetryGroup, &bytes))
    }

    #[must_use]
    pub fn num_generators(&self) -> usize {
        self.generators.len()
    }

    #[must_use]
    pub fn is_trivial(&self) -> bool {
        self.generators.is_empty()
    }

    #[must_use]
    pub fn stabilizes_initial_state(&self) -> bool {
        self.stabilizes_initial_state
    }

    /// `false` if the automorphism search ran out of budget.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Orbit representative of `state` and the generator indices applied to
    /// reach it, in order.
    ///
    /// Greedy descent: apply any generator that makes the state
    /// lexicographically smaller until none does. The result is a fixed
    /// function of `state`, though not necessarily the orbit minimum.
    #[must_use]
    pub fn canonical_state(&self, state: &StateBuf) -> (StateBuf, Vec<u32>) {
        let mut current = state.clone();
        let mut trace = Vec::new();
        loop {
            let mut improved = false;
            for (i, g) in (0u32..).zip(&self.generators) {
                if !g.moves_state {
                    continue;
                }
                let image = g.apply_state(&current);
                if image < current {
                    current = image;
                    trace.push(i);
                    improved = true;
                }
            }
            if !improved {
                return (current, trace);
            }
        }
    }

    /// Image of `state` under the composition of `trace` (applied in order).
    #[must_use]
    pub fn permute_state(&self, state: &StateBuf, trace: &[u32]) -> StateBuf {
        trace
            .iter()
            .fold(state.clone(), |s, &i| self.generators[i as usize].apply_state(&s))
    }

    /// Image of `op` under the composition of `trace` (applied in order).
    #[must_use]
    pub fn map_operator(&self, op: OperatorId, trace: &[u32]) -> OperatorId {
        trace.iter().fold(op, |o, &i| self.generators[i as usize].map_operator(o))
    }

    /// Pre-image of `op` under the composition of `trace`.
    #[must_use]
    pub fn unmap_operator(&self, op: OperatorId, trace: &[u32]) -> OperatorId {
        trace
            .iter()
            .rev()
            .fold(op, |o, &i| self.generators[i as usize].unmap_operator(o))
    }

    /// Smallest `encode(g(plan))` over the plan's orbit.
    ///
    /// The orbit is explored breadth-first through the generators; past
    /// `max_orbit_size` distinct encodings the smallest seen so far is used.
    #[must_use]
    pub fn canonical_plan_key(
        &self,
        plan: &[OperatorId],
        encode: impl Fn(&[OperatorId]) -> Vec<u32>,
    ) -> Vec<u32> {
        let mut best = encode(plan);
        self.explore_orbit(plan, &encode, |_, key| {
            if key < best.as_slice() {
                best = key.to_vec();
            }
        });
        best
    }

    /// Distinct symmetric images of `plan`, excluding `plan` itself, at most
    /// `limit` of them. Valid only for groups that fix the initial state.
    #[must_use]
    pub fn symmetric_plans(&self, plan: &[OperatorId], limit: usize) -> Vec<Vec<OperatorId>> {
        let mut out = Vec::new();
        if limit == 0 || !self.stabilizes_initial_state {
            return out;
        }
        let encode = |p: &[OperatorId]| p.iter().map(|o| o.0).collect::<Vec<u32>>();
        self.explore_orbit(plan, &encode, |image, _| {
            if out.len() < limit {
                out.push(image.to_vec());
            }
        });
        out
    }

    /// Classes of variables that some generator moves into each other.
    #[must_use]
    pub fn variable_orbits(&self) -> Vec<Vec<u32>> {
        let mut uf = UnionFind::new(self.num_vars);
        for g in &self.generators {
            for (v, &t) in (0u32..).zip(&g.var_perm) {
                uf.union(v, t);
            }
        }
        uf.nontrivial_classes()
    }

    /// Classes of operators that some generator moves into each other.
    #[must_use]
    pub fn operator_orbits(&self) -> Vec<Vec<u32>> {
        let mut uf = UnionFind::new(self.num_ops);
        for g in &self.generators {
            for (o, &t) in (0u32..).zip(&g.op_perm) {
                uf.union(o, t);
            }
        }
        uf.nontrivial_classes()
    }

    /// Breadth-first walk over the images of `plan`, calling `visit` once
    /// per newly seen encoding (the start plan is not visited).
    fn explore_orbit(
        &self,
        plan: &[OperatorId],
        encode: &impl Fn(&[OperatorId]) -> Vec<u32>,
        mut visit: impl FnMut(&[OperatorId], &[u32]),
    ) {
        let movers: Vec<&Generator> = self.generators.iter().filter(|g| g.moves_ops).collect();
        if movers.is_empty() {
            return;
        }
        let mut seen: HashSet<Vec<u32>> = HashSet::from([encode(plan)]);
        let mut queue: VecDeque<Vec<OperatorId>> = VecDeque::from([plan.to_vec()]);
        while let Some(current) = queue.pop_front() {
            for g in &movers {
                if seen.len() >= self.max_orbit_size {
                    return;
                }
                let image: Vec<OperatorId> = current.iter().map(|&o| g.map_operator(o)).collect();
                let key = encode(&image);
                if seen.insert(key.clone()) {
                    visit(&image, &key);
                    queue.push_back(image);
                }
            }
        }
    }
}
