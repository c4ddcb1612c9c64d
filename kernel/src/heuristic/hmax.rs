use super::{Estimate, Heuristic};
use crate::task::{GroundTask, StateBuf};

/// The h-max delete-relaxation heuristic.
///
/// Admissible and consistent. Computed by a fixpoint over facts, which is
/// plenty for the task sizes this crate is exercised on.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxHeuristic;

const UNREACHED: i64 = i64::MAX;

impl Heuristic for MaxHeuristic {
    fn name(&self) -> &str {
        "hmax"
    }

    fn estimate(&self, task: &GroundTask, state: &StateBuf) -> Estimate {
        let offsets = fact_offsets(task);
        let mut cost = vec![UNREACHED; offsets.last().copied().unwrap_or(0)];
        for (var, &val) in state.values().iter().enumerate() {
            cost[offsets[var] + val as usize] = 0;
        }

        let mut changed = true;
        while changed {
            changed = false;
            for op in task.operators() {
                let mut reach = 0;
                for pre in &op.preconditions {
                    reach = reach.max(cost[offsets[pre.var as usize] + pre.value as usize]);
                }
                if reach == UNREACHED {
                    continue;
                }
                let next = reach.saturating_add(op.cost);
                for eff in &op.effects {
                    let slot = &mut cost[offsets[eff.var as usize] + eff.value as usize];
                    if next < *slot {
                        *slot = next;
                        changed = true;
                    }
                }
            }
        }

        let mut h = 0;
        for g in task.goal() {
            h = h.max(cost[offsets[g.var as usize] + g.value as usize]);
        }
        if h == UNREACHED {
            Estimate::DeadEnd
        } else {
            Estimate::Value(h)
        }
    }
}

/// Prefix sums of domain sizes; fact `(v, d)` lives at `offsets[v] + d`.
fn fact_offsets(task: &GroundTask) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(task.variables().len() + 1);
    let mut acc = 0;
    offsets.push(0);
    for v in task.variables() {
        acc += v.domain_size();
        offsets.push(acc);
    }
    offsets
}
