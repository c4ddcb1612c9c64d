//! Top-k / top-quality plan enumeration.
//!
//! [`enumerate_plans`] runs A* until the first goal, then alternates
//! enumeration rounds and A* batches. Every round takes a fresh
//! shortest-path snapshot of the search graph and pulls candidates from
//! [`KShortestPaths`] for as long as the [`TerminationController`] certifies
//! them. A round that reaches an uncertified candidate ends, its plans become
//! the best list so far, and an A* batch grows the graph before the next
//! round starts over.

use kplan_kernel::heuristic::Heuristic;
use kplan_kernel::task::GroundTask;
use tracing::{debug, info, trace, warn};

use crate::assembler::{Plan, PlanAssembler};
use crate::astar::{AStarSearch, StepOutcome};
use crate::controller::{Deadline, Frontier, TerminationController, Verdict, WideningSchedule};
use crate::eppstein::KShortestPaths;
use crate::error::SearchError;
use crate::reorder::Reorderer;
use crate::request::{EnginePolicyV1, PlanRequestV1};
use crate::result::{PlanRecord, PlanningResultV1, SearchStatistics, TerminationReasonV1};
use crate::selector::{KeyMode, PlanSelector};
use crate::symmetry::SymmetryGroup;

/// Enumerate plans for `task` as asked by `request`.
///
/// Running out of time or states and finding no plan at all are reported on
/// the result, not as errors.
///
/// # Errors
///
/// [`SearchError::InvalidRequest`], [`SearchError::InvalidPolicy`] or
/// [`SearchError::InvalidPreserveRegex`] for bad input, and
/// [`SearchError::NegativeHeuristic`] if the heuristic breaks its contract.
pub fn enumerate_plans(
    task: &GroundTask,
    heuristic: &dyn Heuristic,
    request: &PlanRequestV1,
    policy: &EnginePolicyV1,
) -> Result<PlanningResultV1, SearchError> {
    let preserve = request.validate()?;
    policy.validate()?;
    let deadline = Deadline::start(request.time_limit_ms);

    let groups = SymmetryGroups::compute(task, policy);
    if request.unordered && preserve.is_some() {
        warn!("preserve_order_regex is ignored for unordered requests");
    }
    if request.unordered && policy.reorder_plans {
        warn!("reordered plans always collapse under unordered keys");
    }
    let mode = KeyMode::new(task, request.unordered, preserve.as_ref());

    info!(
        heuristic = heuristic.name(),
        k = ?request.k,
        quality = ?request.quality,
        unordered = request.unordered,
        operators = task.operators().len(),
        "plan enumeration started"
    );

    let mut search = AStarSearch::new(task, heuristic, groups.search.as_ref(), policy)?;
    let mut run = Run {
        stats: SearchStatistics {
            symmetry_generators: groups.generator_count(),
            ..SearchStatistics::default()
        },
        best: Vec::new(),
        optimal: None,
    };

    // Phase one: plain A* up to the first goal.
    let first = loop {
        if deadline.expired() {
            return Ok(run.finish(&search, TerminationReasonV1::Timeout, task));
        }
        match search.step()? {
            StepOutcome::Expanded { .. } => {}
            StepOutcome::Solved(g) => break g,
            StepOutcome::Exhausted => {
                return Ok(run.finish(&search, TerminationReasonV1::Unsolvable, task));
            }
            StepOutcome::MemoryExceeded => {
                return Ok(run.finish(&search, TerminationReasonV1::ResourceExhausted, task));
            }
        }
    };
    info!(cost = first, expanded = search.statistics().expanded, "first plan found");

    let assembler = PlanAssembler::new(task, groups.search.as_ref());
    let schedule = WideningSchedule::new(policy);
    let mut controller: Option<TerminationController> = None;

    loop {
        run.stats.eppstein_rounds += 1;
        let frontier = Frontier { min_f: search.min_f() };
        let tree = search.graph().shortest_path_tree(search.root(), search.sink());
        let Some(optimal) = tree.optimal_cost() else {
            debug_assert!(false, "a solved search has a path to the sink");
            return Ok(run.finish(&search, TerminationReasonV1::Unsolvable, task));
        };
        let control = controller.get_or_insert_with(|| {
            run.optimal = Some(optimal);
            TerminationController::new(request, optimal, deadline)
        });

        let mut selector =
            PlanSelector::new(&mode, groups.canonicalize(), groups.extend(), request.k);
        if policy.reorder_plans {
            selector = selector.with_reordering(Reorderer::new(task, policy.max_reorder_nodes));
        }
        let mut ksp = KShortestPaths::new(search.graph(), &tree);
        debug!(
            round = run.stats.eppstein_rounds,
            sidetracks = ksp.num_sidetracks(),
            min_f = ?frontier.min_f,
            "enumeration round"
        );

        let threshold = loop {
            match control.judge(selector.len(), ksp.peek_cost(), frontier) {
                Verdict::Stop(reason) => {
                    run.stats.duplicates_dropped += selector.duplicates();
                    let current = selector.into_plans();
                    // A round cut short by the clock may hold fewer plans
                    // than the previous one.
                    if reason != TerminationReasonV1::Timeout || current.len() >= run.best.len() {
                        run.best = current;
                    }
                    return Ok(run.finish(&search, reason, task));
                }
                Verdict::Search { threshold } => break threshold,
                Verdict::Accept => {}
            }
            let Some(candidate) = ksp.next() else {
                debug_assert!(false, "peeked candidate vanished");
                break None;
            };
            run.stats.candidates_popped += 1;
            let plan = assembler.assemble(&search, &ksp.path_edges(&candidate));
            trace!(cost = plan.cost, len = plan.operators.len(), "candidate");
            selector.offer(plan);
        };
        run.stats.duplicates_dropped += selector.duplicates();
        run.best = selector.into_plans();

        // Grow the graph.
        run.stats.astar_rounds += 1;
        let bounds = schedule.bounds(search.statistics().expanded);
        debug!(?threshold, min = bounds.min, max = bounds.max, "search batch");
        let mut steps = 0u64;
        loop {
            if control.timed_out() {
                return Ok(run.finish(&search, TerminationReasonV1::Timeout, task));
            }
            match search.step()? {
                StepOutcome::Exhausted => break,
                StepOutcome::MemoryExceeded => {
                    return Ok(run.finish(&search, TerminationReasonV1::ResourceExhausted, task));
                }
                StepOutcome::Expanded { goal_generated } => {
                    steps += 1;
                    if policy.switch_on_goal && goal_generated {
                        break;
                    }
                }
                StepOutcome::Solved(_) => steps += 1,
            }
            let frontier = Frontier { min_f: search.min_f() };
            if control.batch_done(steps, bounds, threshold, frontier) {
                break;
            }
        }
    }
}

/// The symmetry groups one enumeration uses.
struct SymmetryGroups {
    /// Canonicalizes states during search.
    search: Option<SymmetryGroup>,
    /// Fixes the initial state; keys and extends plans. `None` when the
    /// search group already fixes it and can be reused.
    plan: Option<SymmetryGroup>,
    canonicalize: bool,
    extend: bool,
}

impl SymmetryGroups {
    fn compute(task: &GroundTask, policy: &EnginePolicyV1) -> Self {
        let sym = &policy.symmetry;
        let search = sym
            .search_pruning
            .then(|| SymmetryGroup::compute(task, sym, sym.stabilize_initial_state));
        let plan_needed = sym.plan_canonicalization || sym.extend_plans;
        let reuse = search.as_ref().is_some_and(SymmetryGroup::stabilizes_initial_state);
        let plan = (plan_needed && !reuse).then(|| SymmetryGroup::compute(task, sym, true));
        Self {
            search,
            plan,
            canonicalize: sym.plan_canonicalization,
            extend: sym.extend_plans,
        }
    }

    fn plan_group(&self) -> Option<&SymmetryGroup> {
        self.plan
            .as_ref()
            .or_else(|| self.search.as_ref().filter(|g| g.stabilizes_initial_state()))
    }

    fn canonicalize(&self) -> Option<&SymmetryGroup> {
        self.plan_group().filter(|_| self.canonicalize)
    }

    fn extend(&self) -> Option<&SymmetryGroup> {
        self.plan_group().filter(|_| self.extend)
    }

    fn generator_count(&self) -> u64 {
        let count = |g: &Option<SymmetryGroup>| g.as_ref().map_or(0, SymmetryGroup::num_generators);
        count(&self.search).max(count(&self.plan)) as u64
    }
}

/// Mutable bookkeeping of one enumeration.
struct Run {
    stats: SearchStatistics,
    best: Vec<Plan>,
    optimal: Option<i64>,
}

impl Run {
    fn finish(
        self,
        search: &AStarSearch<'_>,
        termination: TerminationReasonV1,
        task: &GroundTask,
    ) -> PlanningResultV1 {
        let searched = search.statistics();
        let statistics = SearchStatistics {
            astar_rounds: self.stats.astar_rounds,
            eppstein_rounds: self.stats.eppstein_rounds,
            candidates_popped: self.stats.candidates_popped,
            duplicates_dropped: self.stats.duplicates_dropped,
            symmetry_generators: self.stats.symmetry_generators,
            ..searched
        };
        let plans: Vec<PlanRecord> = self
            .best
            .iter()
            .map(|p| PlanRecord {
                cost: p.cost,
                actions: p.action_names(task),
            })
            .collect();
        info!(
            ?termination,
            plans = plans.len(),
            expanded = statistics.expanded,
            states = statistics.states,
            rounds = statistics.eppstein_rounds,
            "plan enumeration finished"
        );
        PlanningResultV1 {
            plans,
            optimal_cost: self.optimal,
            unsolvable: termination == TerminationReasonV1::Unsolvable,
            timeout_triggered: termination == TerminationReasonV1::Timeout,
            memory_limit_triggered: termination == TerminationReasonV1::ResourceExhausted,
            termination,
            statistics,
        }
    }
}
