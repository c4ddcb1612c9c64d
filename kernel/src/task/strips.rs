//! STRIPS-style construction of a [`GroundTask`].
//!
//! Each atom becomes a binary variable (`0` = false, `1` = true). Delete
//! effects are applied before add effects, so an atom both deleted and added
//! by the same action ends up true.

use std::collections::BTreeSet;
use std::collections::HashMap;

use super::{Fact, GroundTask, Operator, TaskError, Variable};

/// Handle returned by [`StripsBuilder::atom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AtomId(pub u32);

#[derive(Debug, Default)]
pub struct StripsBuilder {
    atoms: Vec<String>,
    by_name: HashMap<String, AtomId>,
    operators: Vec<Operator>,
    init: BTreeSet<AtomId>,
    goal: BTreeSet<AtomId>,
}

impl StripsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or look up) an atom by name.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` atoms are declared.
    pub fn atom(&mut self, name: impl Into<String>) -> AtomId {
        let name = name.into();
        if let Some(&id) = self.by_name.get(&name) {
            return id;
        }
        let id = AtomId(u32::try_from(self.atoms.len()).expect("atom table overflow"));
        self.by_name.insert(name.clone(), id);
        self.atoms.push(name);
        id
    }

    #[must_use]
    pub fn atom_id(&self, name: &str) -> Option<AtomId> {
        self.by_name.get(name).copied()
    }

    /// Add a grounded action.
    pub fn action(
        &mut self,
        name: impl Into<String>,
        cost: i64,
        pre: &[AtomId],
        add: &[AtomId],
        del: &[AtomId],
    ) -> &mut Self {
        let preconditions = dedup(pre).into_iter().map(|a| Fact::new(a.0, 1)).collect();
        let add_set = dedup(add);
        let mut effects: Vec<Fact> = dedup(del)
            .into_iter()
            .filter(|a| !add_set.contains(a))
            .map(|a| Fact::new(a.0, 0))
            .collect();
        effects.extend(add_set.iter().map(|a| Fact::new(a.0, 1)));
        self.operators.push(Operator::new(name, cost, preconditions, effects));
        self
    }

    pub fn init(&mut self, atoms: &[AtomId]) -> &mut Self {
        self.init.extend(atoms.iter().copied());
        self
    }

    pub fn goal(&mut self, atoms: &[AtomId]) -> &mut Self {
        self.goal.extend(atoms.iter().copied());
        self
    }

    /// Finish the task.
    ///
    /// # Errors
    ///
    /// Propagates [`TaskError`] from [`GroundTask::new`] (e.g. no atoms).
    pub fn build(self) -> Result<GroundTask, TaskError> {
        let variables = self
            .atoms
            .iter()
            .map(|name| Variable::new(name.clone(), vec![format!("not {name}"), name.clone()]))
            .collect();
        let mut initial = vec![0; self.atoms.len()];
        for a in &self.init {
            if let Some(slot) = initial.get_mut(a.0 as usize) {
                *slot = 1;
            }
        }
        let goal = self.goal.iter().map(|a| Fact::new(a.0, 1)).collect();
        GroundTask::new(variables, self.operators, initial, goal)
    }
}

fn dedup(atoms: &[AtomId]) -> BTreeSet<AtomId> {
    atoms.iter().copied().collect()
}
