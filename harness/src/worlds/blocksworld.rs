//! Blocks world with a single gripper hand.
//!
//! Towers are listed bottom to top. A goal tower pins the bottom block to the
//! table, every adjacent pair with `on`, and the top block as clear. All four
//! actions cost 1.

use std::collections::BTreeSet;

use kplan_kernel::task::{AtomId, GroundTask, StripsBuilder};

use crate::contract::{PlanningWorld, WorldError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blocksworld {
    id: String,
    init: Vec<Vec<String>>,
    goal: Vec<Vec<String>>,
}

impl Blocksworld {
    #[must_use]
    pub fn new(id: impl Into<String>, init: &[&[&str]], goal: &[&[&str]]) -> Self {
        let towers = |t: &[&[&str]]| -> Vec<Vec<String>> {
            t.iter().map(|tower| tower.iter().map(|b| (*b).to_string()).collect()).collect()
        };
        Self {
            id: id.into(),
            init: towers(init),
            goal: towers(goal),
        }
    }

    /// B sits on A; the goal is A on B. The cheapest plan has four actions.
    #[must_use]
    pub fn two_block_swap() -> Self {
        Self::new("blocksworld_swap", &[&["A", "B"]], &[&["B", "A"]])
    }

    /// One tower of `n` blocks that must be rebuilt upside down.
    #[must_use]
    pub fn reverse_tower(n: usize) -> Self {
        let names: Vec<String> = (1..=n).map(|i| format!("b{i}")).collect();
        let reversed: Vec<String> = names.iter().rev().cloned().collect();
        Self {
            id: format!("blocksworld_reverse_{n}"),
            init: vec![names],
            goal: vec![reversed],
        }
    }

    fn blocks(&self) -> Result<Vec<&str>, WorldError> {
        let mut seen = BTreeSet::new();
        let mut blocks = Vec::new();
        for block in self.init.iter().flatten() {
            if !seen.insert(block.as_str()) {
                return Err(
                    self.invalid(format!("block {block} appears twice in the initial towers"))
                );
            }
            blocks.push(block.as_str());
        }
        let mut in_goal = BTreeSet::new();
        for block in self.goal.iter().flatten() {
            if !seen.contains(block.as_str()) {
                return Err(
                    self.invalid(format!("goal block {block} is not in the initial towers"))
                );
            }
            if !in_goal.insert(block.as_str()) {
                return Err(self.invalid(format!("block {block} appears twice in the goal towers")));
            }
        }
        if blocks.is_empty() {
            return Err(self.invalid("no blocks".into()));
        }
        Ok(blocks)
    }

    fn invalid(&self, detail: String) -> WorldError {
        WorldError::InvalidParameters {
            world: self.id.clone(),
            detail,
        }
    }
}

/// Ground atoms of one tower list: `ontable`, `on` and `clear` facts.
fn tower_atoms(b: &mut StripsBuilder, towers: &[Vec<String>]) -> Vec<AtomId> {
    let mut atoms = Vec::new();
    for tower in towers.iter().filter(|t| !t.is_empty()) {
        atoms.push(b.atom(format!("ontable {}", tower[0])));
        for pair in tower.windows(2) {
            atoms.push(b.atom(format!("on {} {}", pair[1], pair[0])));
        }
        if let Some(top) = tower.last() {
            atoms.push(b.atom(format!("clear {top}")));
        }
    }
    atoms
}

impl PlanningWorld for Blocksworld {
    fn world_id(&self) -> &str {
        &self.id
    }

    fn build_task(&self) -> Result<GroundTask, WorldError> {
        let blocks = self.blocks()?;
        let mut b = StripsBuilder::new();
        let handempty = b.atom("handempty");

        for &x in &blocks {
            let clear_x = b.atom(format!("clear {x}"));
            let ontable_x = b.atom(format!("ontable {x}"));
            let holding_x = b.atom(format!("holding {x}"));
            b.action(
                format!("pick-up {x}"),
                1,
                &[clear_x, ontable_x, handempty],
                &[holding_x],
                &[ontable_x, clear_x, handempty],
            );
            b.action(
                format!("put-down {x}"),
                1,
                &[holding_x],
                &[clear_x, handempty, ontable_x],
                &[holding_x],
            );
            for &y in blocks.iter().filter(|&&y| y != x) {
                let clear_y = b.atom(format!("clear {y}"));
                let on_xy = b.atom(format!("on {x} {y}"));
                b.action(
                    format!("stack {x} {y}"),
                    1,
                    &[holding_x, clear_y],
                    &[clear_x, handempty, on_xy],
                    &[holding_x, clear_y],
                );
                b.action(
                    format!("unstack {x} {y}"),
                    1,
                    &[on_xy, clear_x, handempty],
                    &[holding_x, clear_y],
                    &[on_xy, clear_x, handempty],
                );
            }
        }

        let mut init = tower_atoms(&mut b, &self.init);
        init.push(handempty);
        let goal = tower_atoms(&mut b, &self.goal);
        b.init(&init).goal(&goal);
        Ok(b.build()?)
    }
}
