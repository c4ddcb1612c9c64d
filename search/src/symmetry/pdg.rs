//! The problem description graph of a grounded task.
//!
//! Vertices: one per variable, one per (variable, value), one per operator.
//! Edges: variable to each of its values, operator to the values in its
//! preconditions, operator to the values in its effects. Each edge carries a
//! label for its kind. Vertex colours separate the three vertex kinds, goal
//! values, initial values (when the initial state is stabilized) and operator
//! costs. Colour-preserving automorphisms of this graph are exactly the
//! relabelings of the task that keep its transition system, goal and
//! (optionally) initial state intact.

use std::collections::BTreeMap;

use kplan_kernel::task::GroundTask;

pub const LABEL_VALUE_OF: u8 = 0;
pub const LABEL_PRECONDITION: u8 = 1;
pub const LABEL_EFFECT: u8 = 2;

/// Vertex numbering of a description graph.
#[derive(Debug, Clone)]
pub struct PdgLayout {
    pub num_vars: u32,
    /// `value_offsets[v]` is the index of value 0 of `v` among value vertices.
    pub value_offsets: Vec<u32>,
    pub num_values: u32,
    pub num_ops: u32,
}

impl PdgLayout {
    #[must_use]
    pub fn var_vertex(&self, var: u32) -> u32 {
        var
    }

    #[must_use]
    pub fn value_vertex(&self, var: u32, value: u32) -> u32 {
        self.num_vars + self.value_offsets[var as usize] + value
    }

    #[must_use]
    pub fn op_vertex(&self, op: u32) -> u32 {
        self.num_vars + self.num_values + op
    }

    #[must_use]
    pub fn num_vertices(&self) -> u32 {
        self.num_vars + self.num_values + self.num_ops
    }
}

/// A vertex-coloured graph with labelled, undirected edges.
#[derive(Debug, Clone)]
pub struct ColoredGraph {
    /// Dense initial colour per vertex.
    pub colors: Vec<u32>,
    /// Neighbours per vertex as `(vertex, label)`, sorted.
    pub adjacency: Vec<Vec<(u32, u8)>>,
}

impl ColoredGraph {
    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.colors.len()
    }

    #[must_use]
    pub fn has_edge(&self, a: u32, b: u32, label: u8) -> bool {
        self.adjacency[a as usize].binary_search(&(b, label)).is_ok()
    }

    /// Whether `perm` maps the graph onto itself, colours and labels included.
    #[must_use]
    pub fn is_automorphism(&self, perm: &[u32]) -> bool {
        if perm.len() != self.colors.len() {
            return false;
        }
        (0..self.colors.len()).all(|u| {
            let image = perm[u] as usize;
            self.colors[u] == self.colors[image]
                && self.adjacency[u]
                    .iter()
                    .all(|&(w, label)| self.has_edge(perm[u], perm[w as usize], label))
        })
    }
}

/// Build the description graph of `task`.
///
/// # Panics
///
/// Panics if the vertex count exceeds `u32::MAX`; a validated task never
/// gets close.
#[must_use]
pub fn build(task: &GroundTask, stabilize_initial_state: bool) -> (ColoredGraph, PdgLayout) {
    let num_vars = u32::try_from(task.variables().len()).expect("variable count fits u32");
    let mut value_offsets = Vec::with_capacity(task.variables().len());
    let mut acc = 0u32;
    for v in task.variables() {
        value_offsets.push(acc);
        acc += u32::try_from(v.domain_size()).expect("domain size fits u32");
    }
    let layout = PdgLayout {
        num_vars,
        value_offsets,
        num_values: acc,
        num_ops: u32::try_from(task.operators().len()).expect("operator count fits u32"),
    };
    let n = layout.num_vertices() as usize;

    // Colour classes as (kind, cost, goal, initial), densified below.
    let mut classes: Vec<(u8, i64, bool, bool)> = vec![(0, 0, false, false); n];
    let initial = task.initial_state();
    for (var, v) in (0u32..).zip(task.variables()) {
        for d in 0..u32::try_from(v.domain_size()).unwrap_or(0) {
            let is_init = stabilize_initial_state && initial.value(var) == d;
            classes[layout.value_vertex(var, d) as usize] = (1, 0, false, is_init);
        }
    }
    for g in task.goal() {
        classes[layout.value_vertex(g.var, g.value) as usize].2 = true;
    }
    for (o, op) in (0u32..).zip(task.operators()) {
        classes[layout.op_vertex(o) as usize] = (2, op.cost, false, false);
    }

    let mut adjacency: Vec<Vec<(u32, u8)>> = vec![Vec::new(); n];
    let mut link = |a: u32, b: u32, label: u8| {
        adjacency[a as usize].push((b, label));
        adjacency[b as usize].push((a, label));
    };
    for (var, v) in (0u32..).zip(task.variables()) {
        for d in 0..u32::try_from(v.domain_size()).unwrap_or(0) {
            link(layout.var_vertex(var), layout.value_vertex(var, d), LABEL_VALUE_OF);
        }
    }
    for (o, op) in (0u32..).zip(task.operators()) {
        for pre in &op.preconditions {
            link(layout.op_vertex(o), layout.value_vertex(pre.var, pre.value), LABEL_PRECONDITION);
        }
        for eff in &op.effects {
            link(layout.op_vertex(o), layout.value_vertex(eff.var, eff.value), LABEL_EFFECT);
        }
    }
    for list in &mut adjacency {
        list.sort_unstable();
        list.dedup();
    }

    let colors = densify(&classes);
    (ColoredGraph { colors, adjacency }, layout)
}

/// Replace each key by its rank among the distinct keys.
pub(crate) fn densify<K: Ord + Clone>(keys: &[K]) -> Vec<u32> {
    let ranks: BTreeMap<&K, u32> = {
        let mut distinct: Vec<&K> = keys.iter().collect();
        distinct.sort();
        distinct.dedup();
        (0u32..).zip(distinct).map(|(i, k)| (k, i)).collect()
    };
    keys.iter().map(|k| ranks[k]).collect()
}
