//! Stop conditions and A* batch sizing.
//!
//! The engine consults a [`TerminationController`] before every candidate it
//! pulls from the enumerator, and a [`WideningSchedule`] to size the A* batch
//! between two enumeration rounds.

use std::time::{Duration, Instant};

use crate::request::{EnginePolicyV1, PlanRequestV1};
use crate::result::TerminationReasonV1;

/// Wall-clock budget, started at construction.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    #[must_use]
    pub fn start(limit_ms: Option<u64>) -> Self {
        Self {
            start: Instant::now(),
            limit: limit_ms.map(Duration::from_millis),
        }
    }

    #[must_use]
    pub fn expired(&self) -> bool {
        self.limit.is_some_and(|limit| self.start.elapsed() >= limit)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Bounds of one A* batch, as a share of the expansions done so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WideningSchedule {
    lb_percent: u32,
    ub_percent: u32,
}

/// Lower and upper expansion counts of one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchBounds {
    pub min: u64,
    pub max: u64,
}

impl WideningSchedule {
    #[must_use]
    pub fn new(policy: &EnginePolicyV1) -> Self {
        Self {
            lb_percent: policy.openlist_inc_percent_lb,
            ub_percent: policy.openlist_inc_percent_ub,
        }
    }

    /// Both bounds are at least one expansion.
    #[must_use]
    pub fn bounds(&self, expanded: u64) -> BatchBounds {
        let share = |percent: u32| (expanded.saturating_mul(u64::from(percent)) / 100).max(1);
        BatchBounds {
            min: share(self.lb_percent),
            max: share(self.ub_percent),
        }
    }
}

/// What to do with the next candidate of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Stop enumerating for good.
    Stop(TerminationReasonV1),
    /// The candidate is certified; take it.
    Accept,
    /// The candidate may be beaten by a path the search has not recorded
    /// yet. `threshold` is its distance from the optimal cost, `None` if
    /// the round has no candidate left.
    Search { threshold: Option<i64> },
}

/// Snapshot of the search seen by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frontier {
    /// Smallest f on the open list, `None` when it is empty.
    pub min_f: Option<i64>,
}

/// Stop precedence and candidate certification.
#[derive(Debug, Clone)]
pub struct TerminationController {
    k: Option<usize>,
    quality_bound: Option<i64>,
    optimal: i64,
    deadline: Deadline,
}

impl TerminationController {
    /// `optimal` is the cost of the first plan found.
    #[must_use]
    pub fn new(request: &PlanRequestV1, optimal: i64, deadline: Deadline) -> Self {
        Self {
            k: request.k,
            quality_bound: request.quality_bound(optimal),
            optimal,
            deadline,
        }
    }

    #[must_use]
    pub fn quality_bound(&self) -> Option<i64> {
        self.quality_bound
    }

    #[must_use]
    pub fn optimal(&self) -> i64 {
        self.optimal
    }

    #[must_use]
    pub fn timed_out(&self) -> bool {
        self.deadline.expired()
    }

    /// Whether `k` plans have been collected.
    #[must_use]
    pub fn plan_limit_reached(&self, collected: usize) -> bool {
        self.k.is_some_and(|k| collected >= k)
    }

    /// Decide on the next candidate, whose cost is `next_cost` (`None` when
    /// the round is out of candidates).
    ///
    /// Precedence: time, plan count, quality bound, exhaustion. A candidate
    /// is certified once no open node could lead to a cheaper path. The
    /// quality bound only stops enumeration once every open node is above
    /// it.
    #[must_use]
    pub fn judge(&self, collected: usize, next_cost: Option<i64>, frontier: Frontier) -> Verdict {
        if self.timed_out() {
            return Verdict::Stop(TerminationReasonV1::Timeout);
        }
        if self.plan_limit_reached(collected) {
            return Verdict::Stop(TerminationReasonV1::PlanLimitReached);
        }
        let Some(cost) = next_cost else {
            return match frontier.min_f {
                None => Verdict::Stop(TerminationReasonV1::Exhausted),
                Some(min_f) if self.quality_bound.is_some_and(|bound| min_f > bound) => {
                    Verdict::Stop(TerminationReasonV1::QualityBoundReached)
                }
                Some(_) => Verdict::Search { threshold: None },
            };
        };
        if let Some(bound) = self.quality_bound.filter(|&bound| cost > bound) {
            // Open nodes within the bound may still lead to plans under it.
            return match frontier.min_f {
                Some(min_f) if min_f <= bound => Verdict::Search {
                    threshold: Some(bound + 1 - self.optimal),
                },
                _ => Verdict::Stop(TerminationReasonV1::QualityBoundReached),
            };
        }
        match frontier.min_f {
            Some(min_f) if cost > min_f => Verdict::Search {
                threshold: Some(cost - self.optimal),
            },
            _ => Verdict::Accept,
        }
    }

    /// Whether an A* batch that has run `steps` expansions may stop.
    ///
    /// Past `bounds.max` it always may. Otherwise it stops once the pending
    /// candidate is certified, or, with no pending candidate, once `min` is
    /// reached or the quality bound is below every open node.
    #[must_use]
    pub fn batch_done(
        &self,
        steps: u64,
        bounds: BatchBounds,
        threshold: Option<i64>,
        frontier: Frontier,
    ) -> bool {
        let Some(min_f) = frontier.min_f else {
            return true;
        };
        if steps >= bounds.max {
            return true;
        }
        match threshold {
            Some(thr) => self.optimal.saturating_add(thr) <= min_f,
            None => steps >= bounds.min || self.quality_bound.is_some_and(|bound| min_f > bound),
        }
    }
}
