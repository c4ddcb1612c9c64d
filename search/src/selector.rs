//! Plan deduplication.
//!
//! Plans arrive cheapest first. The selector keeps the first plan of every
//! [`KeyMode`] class, so equal-key plans discovered later are dropped and the
//! kept list stays sorted by cost.

use std::collections::HashSet;

use kplan_kernel::task::{GroundTask, OperatorId};
use regex::Regex;

use crate::assembler::Plan;
use crate::reorder::Reorderer;
use crate::symmetry::SymmetryGroup;

/// Separates order-preserved operators from the sorted remainder.
const PRESERVED_SEPARATOR: u32 = u32::MAX;

/// How plans are compared for duplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyMode {
    /// Plans are the same only if their operator sequences are.
    Ordered,
    /// Plans are the same if they use the same operators, in any order.
    Unordered,
    /// Operators flagged in `preserved` must appear in the same order; the
    /// rest may appear in any order.
    Partial { preserved: Vec<bool> },
}

impl KeyMode {
    /// Key mode of a request. `preserve` selects the order-preserved
    /// operators by name and only applies to ordered requests.
    #[must_use]
    pub fn new(task: &GroundTask, unordered: bool, preserve: Option<&Regex>) -> Self {
        match (unordered, preserve) {
            (true, _) => Self::Unordered,
            (false, None) => Self::Ordered,
            (false, Some(re)) => Self::Partial {
                preserved: task.operators().iter().map(|op| re.is_match(&op.name)).collect(),
            },
        }
    }

    /// Key encoding of an operator sequence.
    #[must_use]
    pub fn encode(&self, plan: &[OperatorId]) -> Vec<u32> {
        match self {
            Self::Ordered => plan.iter().map(|o| o.0).collect(),
            Self::Unordered => {
                let mut key: Vec<u32> = plan.iter().map(|o| o.0).collect();
                key.sort_unstable();
                key
            }
            Self::Partial { preserved } => {
                let (mut key, mut rest): (Vec<u32>, Vec<u32>) =
                    plan.iter().map(|o| o.0).partition(|&o| preserved[o as usize]);
                rest.sort_unstable();
                key.push(PRESERVED_SEPARATOR);
                key.extend(rest);
                key
            }
        }
    }
}

/// Collects distinct plans up to an optional limit.
pub struct PlanSelector<'a> {
    mode: &'a KeyMode,
    canonicalize: Option<&'a SymmetryGroup>,
    extend: Option<&'a SymmetryGroup>,
    reorder: Option<Reorderer<'a>>,
    limit: Option<usize>,
    seen: HashSet<Vec<u32>>,
    plans: Vec<Plan>,
    duplicates: u64,
}

impl<'a> PlanSelector<'a> {
    /// `canonicalize` keys plans by their symmetry orbit; `extend` offers the
    /// symmetric images of each accepted plan. Both groups must fix the
    /// initial state.
    #[must_use]
    pub fn new(
        mode: &'a KeyMode,
        canonicalize: Option<&'a SymmetryGroup>,
        extend: Option<&'a SymmetryGroup>,
        limit: Option<usize>,
    ) -> Self {
        debug_assert!(canonicalize.iter().all(|g| g.stabilizes_initial_state()));
        debug_assert!(extend.iter().all(|g| g.stabilizes_initial_state()));
        Self {
            mode,
            canonicalize,
            extend,
            reorder: None,
            limit,
            seen: HashSet::new(),
            plans: Vec::new(),
            duplicates: 0,
        }
    }

    /// Also offer the reorderings of each accepted plan, ahead of its
    /// symmetric images.
    #[must_use]
    pub fn with_reordering(mut self, reorderer: Reorderer<'a>) -> Self {
        self.reorder = Some(reorderer);
        self
    }

    /// Offer a plan; returns whether it was kept.
    ///
    /// A kept plan is followed by its reorderings, then by the symmetric
    /// images of the plan and of each reordering, while room is left.
    pub fn offer(&mut self, plan: Plan) -> bool {
        let cost = plan.cost;
        let base = plan.operators.clone();
        if !self.insert(plan) {
            return false;
        }
        let reordered = match self.reorder {
            Some(reorderer) => reorderer.reorderings(&base, self.room()),
            None => Vec::new(),
        };
        for operators in &reordered {
            self.insert(Plan {
                cost,
                operators: operators.clone(),
            });
        }
        if let Some(group) = self.extend {
            for source in std::iter::once(&base).chain(&reordered) {
                for operators in group.symmetric_plans(source, self.room()) {
                    self.insert(Plan { cost, operators });
                }
            }
        }
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.limit.is_some_and(|k| self.plans.len() >= k)
    }

    #[must_use]
    pub fn duplicates(&self) -> u64 {
        self.duplicates
    }

    #[must_use]
    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    #[must_use]
    pub fn into_plans(self) -> Vec<Plan> {
        self.plans
    }

    fn room(&self) -> usize {
        self.limit.map_or(usize::MAX, |k| k.saturating_sub(self.plans.len()))
    }

    fn key(&self, plan: &[OperatorId]) -> Vec<u32> {
        match self.canonicalize {
            Some(group) => group.canonical_plan_key(plan, |p| self.mode.encode(p)),
            None => self.mode.encode(plan),
        }
    }

    fn insert(&mut self, plan: Plan) -> bool {
        if self.is_full() {
            return false;
        }
        let key = self.key(&plan.operators);
        if !self.seen.insert(key) {
            self.duplicates += 1;
            return false;
        }
        self.plans.push(plan);
        true
    }
}
