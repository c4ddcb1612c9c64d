//! Generators of the automorphism group of a coloured graph.
//!
//! Individualisation-refinement: the first path individualises the smallest
//! vertex of the first non-singleton cell at each level until the colouring is
//! discrete, giving a reference leaf. Then, deepest level first, every other
//! vertex of that level's cell is tried as the image of the base vertex; a
//! backtracking descent looks for a leaf whose colour-to-vertex map, composed
//! with the reference leaf, is an automorphism. Vertices already in the base
//! vertex's orbit under the generators found so far are skipped.
//!
//! Every returned permutation is checked against the graph, so an exhausted
//! node budget can only make the generated group smaller, never wrong.

use tracing::{debug, warn};

use super::orbit::UnionFind;
use super::pdg::ColoredGraph;
use super::refine::{cell_members, cell_sizes, individualize, refine, target_cell};

/// Result of a generator search.
#[derive(Debug, Clone)]
pub struct AutomorphismSearch {
    /// Vertex permutations, none of them the identity.
    pub generators: Vec<Vec<u32>>,
    /// Refinement calls spent.
    pub nodes_visited: u64,
    /// `false` if the budget ran out before every level was searched.
    pub complete: bool,
}

struct Level {
    colors: Vec<u32>,
    cell: u32,
    base: u32,
}

struct Searcher<'g> {
    graph: &'g ColoredGraph,
    levels: Vec<Level>,
    leaf: Vec<u32>,
    budget: u64,
    visited: u64,
    out_of_budget: bool,
}

/// Search for generators, spending at most `max_nodes` refinements.
#[must_use]
pub fn find_generators(graph: &ColoredGraph, max_nodes: u64) -> AutomorphismSearch {
    let n = graph.num_vertices();
    let mut colors = refine(graph, &graph.colors);
    let mut levels = Vec::new();
    while let Some(cell) = target_cell(&colors) {
        let base = cell_members(&colors, cell)[0];
        let next = refine(graph, &individualize(&colors, base));
        levels.push(Level { colors, cell, base });
        colors = next;
    }
    debug!(vertices = n, depth = levels.len(), "automorphism search first path");

    let mut searcher = Searcher {
        graph,
        levels,
        leaf: colors,
        budget: max_nodes,
        visited: 0,
        out_of_budget: false,
    };

    let mut generators = Vec::new();
    let mut orbits = UnionFind::new(n);
    'levels: for depth in (0..searcher.levels.len()).rev() {
        let base = searcher.levels[depth].base;
        let members = cell_members(&searcher.levels[depth].colors, searcher.levels[depth].cell);
        for w in members {
            if w == base || orbits.same(w, base) {
                continue;
            }
            let start = individualize(&searcher.levels[depth].colors, w);
            if let Some(perm) = searcher.descend(&start, depth + 1) {
                for (u, &image) in (0u32..).zip(&perm) {
                    orbits.union(u, image);
                }
                generators.push(perm);
            }
            if searcher.out_of_budget {
                warn!(
                    budget = searcher.budget,
                    found = generators.len(),
                    "automorphism search budget exhausted; symmetry group may be incomplete"
                );
                break 'levels;
            }
        }
    }

    AutomorphismSearch {
        generators,
        nodes_visited: searcher.visited,
        complete: !searcher.out_of_budget,
    }
}

impl Searcher<'_> {
    /// Refine `colors` (already individualised at `depth - 1`) and look for a
    /// leaf equivalent to the reference leaf.
    fn descend(&mut self, colors: &[u32], depth: usize) -> Option<Vec<u32>> {
        if self.visited >= self.budget {
            self.out_of_budget = true;
            return None;
        }
        self.visited += 1;
        let refined = refine(self.graph, colors);

        let reference = self.levels.get(depth).map_or(&self.leaf, |l| &l.colors);
        if cell_sizes(&refined) != cell_sizes(reference) {
            return None;
        }

        let Some(cell) = target_cell(&refined) else {
            return self.leaf_permutation(&refined);
        };
        for u in cell_members(&refined, cell) {
            let found = self.descend(&individualize(&refined, u), depth + 1);
            if found.is_some() || self.out_of_budget {
                return found;
            }
        }
        None
    }

    /// Map each vertex of the reference leaf to the vertex with the same
    /// colour in `leaf`; keep it if it is a non-trivial automorphism.
    fn leaf_permutation(&self, leaf: &[u32]) -> Option<Vec<u32>> {
        let mut vertex_of_color = vec![0u32; leaf.len()];
        for (v, &c) in (0u32..).zip(leaf) {
            vertex_of_color[c as usize] = v;
        }
        let perm: Vec<u32> = self.leaf.iter().map(|&c| vertex_of_color[c as usize]).collect();
        let identity = (0u32..).zip(&perm).all(|(u, &p)| u == p);
        (!identity && self.graph.is_automorphism(&perm)).then_some(perm)
    }
}
