//! Grounded operators: named, costed precondition/effect lists.

use serde::{Deserialize, Serialize};

use super::state::StateBuf;

/// A single variable assignment `var = value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Fact {
    pub var: u32,
    pub value: u32,
}

impl Fact {
    #[must_use]
    pub const fn new(var: u32, value: u32) -> Self {
        Self { var, value }
    }

    /// Whether `state` satisfies this fact.
    #[must_use]
    pub fn holds_in(&self, state: &StateBuf) -> bool {
        state.value(self.var) == self.value
    }
}

/// Dense operator index into [`super::GroundTask::operators`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatorId(pub u32);

impl OperatorId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for OperatorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "op#{}", self.0)
    }
}

/// A grounded action.
///
/// Preconditions and effects are kept sorted by variable so two operators
/// with the same semantics compare equal regardless of how they were built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub name: String,
    pub cost: i64,
    pub preconditions: Vec<Fact>,
    pub effects: Vec<Fact>,
}

impl Operator {
    /// Build an operator, normalizing fact order.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        cost: i64,
        mut preconditions: Vec<Fact>,
        mut effects: Vec<Fact>,
    ) -> Self {
        preconditions.sort_unstable();
        effects.sort_unstable();
        Self {
            name: name.into(),
            cost,
            preconditions,
            effects,
        }
    }

    #[must_use]
    pub fn is_applicable(&self, state: &StateBuf) -> bool {
        self.preconditions.iter().all(|f| f.holds_in(state))
    }

    /// Successor state. Does not re-check preconditions.
    #[must_use]
    pub fn apply(&self, state: &StateBuf) -> StateBuf {
        let mut next = state.clone();
        for eff in &self.effects {
            next.set(eff.var, eff.value);
        }
        next
    }
}
