//! Colour refinement and individualisation.
//!
//! Colourings are dense ranks computed only from isomorphism-invariant data,
//! so two vertices that an automorphism swaps always end up with the same
//! colour, and equal colourings can be compared across search branches.

use super::pdg::{densify, ColoredGraph};

/// Refine `colors` to the coarsest equitable colouring below it.
///
/// Each round recolours a vertex by its colour plus the sorted multiset of
/// `(label, neighbour colour)`; stops when no class splits.
#[must_use]
pub fn refine(graph: &ColoredGraph, colors: &[u32]) -> Vec<u32> {
    let mut current = densify(colors);
    let mut classes = num_classes(&current);
    loop {
        let signatures: Vec<(u32, Vec<(u8, u32)>)> = graph
            .adjacency
            .iter()
            .zip(&current)
            .map(|(adj, &own)| {
                let mut around: Vec<(u8, u32)> =
                    adj.iter().map(|&(w, label)| (label, current[w as usize])).collect();
                around.sort_unstable();
                (own, around)
            })
            .collect();
        let next = densify(&signatures);
        let next_classes = num_classes(&next);
        if next_classes == classes {
            return next;
        }
        current = next;
        classes = next_classes;
    }
}

/// Give `v` a colour of its own, just below the rest of its old cell.
#[must_use]
pub fn individualize(colors: &[u32], v: u32) -> Vec<u32> {
    let keys: Vec<(u32, bool)> = (0u32..).zip(colors).map(|(u, &c)| (c, u != v)).collect();
    densify(&keys)
}

/// The first cell with more than one vertex.
#[must_use]
pub fn target_cell(colors: &[u32]) -> Option<u32> {
    let sizes = cell_sizes(colors);
    (0u32..).zip(&sizes).find(|(_, &s)| s > 1).map(|(c, _)| c)
}

/// Number of vertices per colour.
#[must_use]
pub fn cell_sizes(colors: &[u32]) -> Vec<u32> {
    let mut sizes = vec![0u32; num_classes(colors)];
    for &c in colors {
        sizes[c as usize] += 1;
    }
    sizes
}

/// Vertices of colour `cell`, ascending.
#[must_use]
pub fn cell_members(colors: &[u32], cell: u32) -> Vec<u32> {
    (0u32..).zip(colors).filter(|(_, &c)| c == cell).map(|(u, _)| u).collect()
}

fn num_classes(colors: &[u32]) -> usize {
    colors.iter().max().map_or(0, |&m| m as usize + 1)
}
