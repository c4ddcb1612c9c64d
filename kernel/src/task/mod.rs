//! Grounded task model: a finite-domain state-transition system.
//!
//! Grounding happens upstream; this module only holds and validates the
//! instantiated result. A [`GroundTask`] that exists has passed
//! [`GroundTask::new`], so the search layer never re-checks indices.

mod operator;
mod state;
mod strips;

pub use operator::{Fact, Operator, OperatorId};
pub use state::{StateBuf, StateId, StateRegistry};
pub use strips::{AtomId, StripsBuilder};

use serde::{Deserialize, Serialize};

/// A finite-domain variable with named values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub values: Vec<String>,
}

impl Variable {
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    #[must_use]
    pub fn domain_size(&self) -> usize {
        self.values.len()
    }
}

/// Malformed-task conditions. Fatal at the task boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("task has no variables")]
    NoVariables,
    #[error("variable {var} ({name}) has an empty domain")]
    EmptyDomain { var: u32, name: String },
    #[error("initial state has {got} values, task has {expected} variables")]
    InitialStateArity { expected: usize, got: usize },
    #[error("{context}: variable {var} out of range")]
    VariableOutOfRange { context: String, var: u32 },
    #[error("{context}: value {value} out of range for variable {var}")]
    ValueOutOfRange { context: String, var: u32, value: u32 },
    #[error("{context}: variable {var} appears more than once")]
    DuplicateVariable { context: String, var: u32 },
    #[error("operator {name} has negative cost {cost}")]
    NegativeCost { name: String, cost: i64 },
    #[error("too many {what}: {count}")]
    TooLarge { what: &'static str, count: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GroundTaskRepr {
    variables: Vec<Variable>,
    operators: Vec<Operator>,
    initial: Vec<u32>,
    goal: Vec<Fact>,
}

/// A validated grounded planning task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GroundTaskRepr", into = "GroundTaskRepr")]
pub struct GroundTask {
    variables: Vec<Variable>,
    operators: Vec<Operator>,
    initial: StateBuf,
    goal: Vec<Fact>,
}

impl GroundTask {
    /// Validate and assemble a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError`] on any out-of-range index, arity mismatch,
    /// duplicate variable within one fact list, or negative operator cost.
    pub fn new(
        variables: Vec<Variable>,
        mut operators: Vec<Operator>,
        initial: Vec<u32>,
        mut goal: Vec<Fact>,
    ) -> Result<Self, TaskError> {
        if variables.is_empty() {
            return Err(TaskError::NoVariables);
        }
        if u32::try_from(variables.len()).is_err() {
            return Err(TaskError::TooLarge {
                what: "variables",
                count: variables.len(),
            });
        }
        if u32::try_from(operators.len()).is_err() {
            return Err(TaskError::TooLarge {
                what: "operators",
                count: operators.len(),
            });
        }
        for (var, v) in (0u32..).zip(&variables) {
            if v.values.is_empty() {
                return Err(TaskError::EmptyDomain {
                    var,
                    name: v.name.clone(),
                });
            }
        }
        if initial.len() != variables.len() {
            return Err(TaskError::InitialStateArity {
                expected: variables.len(),
                got: initial.len(),
            });
        }
        let initial_facts: Vec<Fact> = (0u32..)
            .zip(&initial)
            .map(|(var, &val)| Fact::new(var, val))
            .collect();
        check_facts(&variables, &initial_facts, "initial state")?;

        goal.sort_unstable();
        check_facts(&variables, &goal, "goal")?;

        for op in &mut operators {
            op.preconditions.sort_unstable();
            op.effects.sort_unstable();
            if op.cost < 0 {
                return Err(TaskError::NegativeCost {
                    name: op.name.clone(),
                    cost: op.cost,
                });
            }
            check_facts(
                &variables,
                &op.preconditions,
                &format!("operator {} precondition", op.name),
            )?;
            check_facts(&variables, &op.effects, &format!("operator {} effect", op.name))?;
        }

        Ok(Self {
            variables,
            operators,
            initial: StateBuf::from_values(initial),
            goal,
        })
    }

    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    #[must_use]
    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    #[must_use]
    pub fn operator(&self, id: OperatorId) -> &Operator {
        &self.operators[id.index()]
    }

    #[must_use]
    pub fn goal(&self) -> &[Fact] {
        &self.goal
    }

    #[must_use]
    pub fn initial_state(&self) -> &StateBuf {
        &self.initial
    }

    #[must_use]
    pub fn is_goal(&self, state: &StateBuf) -> bool {
        self.goal.iter().all(|f| f.holds_in(state))
    }

    /// Operators applicable in `state`, in ascending id order.
    pub fn applicable<'a>(&'a self, state: &'a StateBuf) -> impl Iterator<Item = OperatorId> + 'a {
        (0u32..)
            .zip(&self.operators)
            .filter(move |(_, op)| op.is_applicable(state))
            .map(|(i, _)| OperatorId(i))
    }

    #[must_use]
    pub fn apply(&self, state: &StateBuf, op: OperatorId) -> StateBuf {
        self.operator(op).apply(state)
    }

    /// Cheapest operator cost, or 0 for a task without operators.
    #[must_use]
    pub fn min_operator_cost(&self) -> i64 {
        self.operators.iter().map(|o| o.cost).min().unwrap_or(0)
    }

    /// Simulate `plan` from the initial state.
    ///
    /// Returns the total cost if every step is applicable and the final
    /// state satisfies the goal.
    #[must_use]
    pub fn validate_plan(&self, plan: &[OperatorId]) -> Option<i64> {
        let mut state = self.initial.clone();
        let mut cost = 0;
        for &op in plan {
            let o = self.operators.get(op.index())?;
            if !o.is_applicable(&state) {
                return None;
            }
            state = o.apply(&state);
            cost += o.cost;
        }
        self.is_goal(&state).then_some(cost)
    }

    /// Human-readable `var=value` rendering of a state, for logs.
    #[must_use]
    pub fn describe_state(&self, state: &StateBuf) -> String {
        let mut out = String::new();
        for (i, (var, &val)) in self.variables.iter().zip(state.values()).enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&var.name);
            out.push('=');
            out.push_str(var.values.get(val as usize).map_or("?", String::as_str));
        }
        out
    }
}

fn check_facts(variables: &[Variable], facts: &[Fact], context: &str) -> Result<(), TaskError> {
    let mut seen = vec![false; variables.len()];
    for f in facts {
        let Some(var) = variables.get(f.var as usize) else {
            return Err(TaskError::VariableOutOfRange {
                context: context.to_string(),
                var: f.var,
            });
        };
        if f.value as usize >= var.domain_size() {
            return Err(TaskError::ValueOutOfRange {
                context: context.to_string(),
                var: f.var,
                value: f.value,
            });
        }
        if std::mem::replace(&mut seen[f.var as usize], true) {
            return Err(TaskError::DuplicateVariable {
                context: context.to_string(),
                var: f.var,
            });
        }
    }
    Ok(())
}

impl TryFrom<GroundTaskRepr> for GroundTask {
    type Error = TaskError;

    fn try_from(raw: GroundTaskRepr) -> Result<Self, Self::Error> {
        GroundTask::new(raw.variables, raw.operators, raw.initial, raw.goal)
    }
}

impl From<GroundTask> for GroundTaskRepr {
    fn from(task: GroundTask) -> Self {
        Self {
            variables: task.variables,
            operators: task.operators,
            initial: task.initial.values().to_vec(),
            goal: task.goal,
        }
    }
}
