//! Heuristic oracle seam.
//!
//! The engine asks a [`Heuristic`] for a cost-to-goal lower bound per state.
//! Implementations must be admissible for the enumerated plans to be the
//! cheapest ones; consistency is not required (the engine reopens nodes).

mod blind;
mod hmax;

pub use blind::BlindHeuristic;
pub use hmax::MaxHeuristic;

use crate::task::{GroundTask, StateBuf};

/// Result of one heuristic evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Estimate {
    /// Lower bound on the remaining cost. Must be non-negative.
    Value(i64),
    /// No goal state is reachable from this state.
    DeadEnd,
}

/// Pluggable cost-to-goal oracle.
pub trait Heuristic: Send + Sync {
    /// Short stable identifier, used in logs and result metadata.
    fn name(&self) -> &str;

    /// Estimate the cost from `state` to the nearest goal state.
    fn estimate(&self, task: &GroundTask, state: &StateBuf) -> Estimate;
}
