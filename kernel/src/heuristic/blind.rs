use super::{Estimate, Heuristic};
use crate::task::{GroundTask, StateBuf};

/// Zero on goal states, otherwise the cheapest operator cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlindHeuristic;

impl Heuristic for BlindHeuristic {
    fn name(&self) -> &str {
        "blind"
    }

    fn estimate(&self, task: &GroundTask, state: &StateBuf) -> Estimate {
        if task.is_goal(state) {
            Estimate::Value(0)
        } else {
            Estimate::Value(task.min_operator_cost())
        }
    }
}
