//! States and the state registry.
//!
//! A state is a complete assignment of the task's finite-domain variables.
//! The registry interns states in first-seen order, so the same sequence of
//! insertions always yields the same [`StateId`]s.

use std::collections::HashMap;

/// Dense index of an interned state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub u32);

impl StateId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Owned value vector of one state.
///
/// `Ord` is lexicographic over the value vector; the symmetry engine relies
/// on it to pick orbit representatives.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateBuf {
    values: Vec<u32>,
}

impl StateBuf {
    #[must_use]
    pub fn from_values(values: Vec<u32>) -> Self {
        Self { values }
    }

    #[must_use]
    pub fn value(&self, var: u32) -> u32 {
        self.values[var as usize]
    }

    pub fn set(&mut self, var: u32, value: u32) {
        self.values[var as usize] = value;
    }

    #[must_use]
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Append-only interning table of states.
#[derive(Debug, Default)]
pub struct StateRegistry {
    states: Vec<StateBuf>,
    index: HashMap<StateBuf, StateId>,
}

impl StateRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `state`. Returns its id and whether it was newly inserted.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` states are registered.
    pub fn insert(&mut self, state: StateBuf) -> (StateId, bool) {
        if let Some(&id) = self.index.get(&state) {
            return (id, false);
        }
        let id = StateId(u32::try_from(self.states.len()).expect("state registry overflow"));
        self.index.insert(state.clone(), id);
        self.states.push(state);
        (id, true)
    }

    #[must_use]
    pub fn lookup(&self, state: &StateBuf) -> Option<StateId> {
        self.index.get(state).copied()
    }

    #[must_use]
    pub fn get(&self, id: StateId) -> &StateBuf {
        &self.states[id.index()]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
