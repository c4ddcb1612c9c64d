//! A robot walking a rectangular grid from the bottom-left to the top-right
//! cell. Walls remove cells. Every move costs 1, so an open `w x h` grid has
//! `C(w + h - 2, w - 1)` cheapest plans.

use std::collections::BTreeSet;

use kplan_kernel::task::{GroundTask, StripsBuilder};

use crate::contract::{PlanningWorld, WorldError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    id: String,
    width: u32,
    height: u32,
    walls: BTreeSet<(u32, u32)>,
}

impl Grid {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            id: format!("grid_{width}x{height}"),
            width,
            height,
            walls: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_wall(mut self, x: u32, y: u32) -> Self {
        self.walls.insert((x, y));
        self.id = format!("{}_w{x}_{y}", self.id);
        self
    }

    fn open(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && !self.walls.contains(&(x, y))
    }

    fn neighbours(&self, x: u32, y: u32) -> impl Iterator<Item = (u32, u32)> + '_ {
        let candidates = [
            x.checked_add(1).map(|nx| (nx, y)),
            x.checked_sub(1).map(|nx| (nx, y)),
            y.checked_add(1).map(|ny| (x, ny)),
            y.checked_sub(1).map(|ny| (x, ny)),
        ];
        candidates.into_iter().flatten().filter(|&(nx, ny)| self.open(nx, ny))
    }
}

impl PlanningWorld for Grid {
    fn world_id(&self) -> &str {
        &self.id
    }

    fn build_task(&self) -> Result<GroundTask, WorldError> {
        if self.width == 0 || self.height == 0 {
            return Err(WorldError::InvalidParameters {
                world: self.id.clone(),
                detail: "grid has no cells".into(),
            });
        }
        let start = (0, 0);
        let target = (self.width - 1, self.height - 1);
        if !self.open(start.0, start.1) || !self.open(target.0, target.1) {
            return Err(WorldError::InvalidParameters {
                world: self.id.clone(),
                detail: "start or target cell is walled".into(),
            });
        }

        let at = |x: u32, y: u32| format!("at {x}_{y}");
        let mut b = StripsBuilder::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if !self.open(x, y) {
                    continue;
                }
                let here = b.atom(at(x, y));
                for (nx, ny) in self.neighbours(x, y) {
                    let there = b.atom(at(nx, ny));
                    b.action(format!("move {x}_{y} {nx}_{ny}"), 1, &[here], &[there], &[here]);
                }
            }
        }
        let init = b.atom(at(start.0, start.1));
        let goal = b.atom(at(target.0, target.1));
        b.init(&[init]).goal(&[goal]);
        Ok(b.build()?)
    }
}
