//! Quality-bounded requests return every plan within `floor(q * optimal)`
//! and nothing above it.

use std::collections::BTreeSet;

use kplan_harness::contract::PlanningWorld;
use kplan_harness::runner::{run_task, run_world, HeuristicChoice};
use kplan_harness::worlds::blocksworld::Blocksworld;
use kplan_harness::worlds::grid::Grid;
use kplan_harness::worlds::locked_door::LockedDoor;
use kplan_kernel::task::{GroundTask, StripsBuilder};
use kplan_search::{EnginePolicyV1, PlanRequestV1, TerminationReasonV1};
use lock_tests::oracle::{assert_well_formed, optimal_cost, plans_up_to, unordered_classes};

fn cases() -> Vec<(Box<dyn PlanningWorld>, f64)> {
    vec![
        (Box::new(Grid::new(3, 3)), 1.5),
        (Box::new(Grid::new(4, 2)), 1.75),
        (Box::new(Blocksworld::two_block_swap()), 2.0),
        (Box::new(LockedDoor::with_key()), 1.4),
    ]
}

#[test]
fn ordered_quality_is_complete_and_bounded() {
    for (world, q) in cases() {
        let task = world.build_task().unwrap();
        let request = PlanRequestV1::top_quality(q);
        let optimal = optimal_cost(&task).unwrap();
        let bound = request.quality_bound(optimal).unwrap();
        let expected: BTreeSet<(i64, Vec<String>)> =
            plans_up_to(&task, bound).into_iter().map(|p| (p.cost, p.actions)).collect();

        for heuristic in [HeuristicChoice::Blind, HeuristicChoice::Max] {
            let report =
                run_world(world.as_ref(), heuristic, &request, &EnginePolicyV1::default()).unwrap();
            let result = &report.result;
            let got: BTreeSet<(i64, Vec<String>)> =
                result.plans.iter().map(|p| (p.cost, p.actions.clone())).collect();
            assert_eq!(got.len(), result.plans.len());
            assert_eq!(got, expected, "{} q={q} heuristic={heuristic}", world.world_id());
            assert_eq!(result.termination, TerminationReasonV1::QualityBoundReached);
            assert!(result.plans.iter().all(|p| p.cost <= bound));
            assert_well_formed(&task, result);
        }
    }
}

#[test]
fn unordered_quality_keeps_one_plan_per_action_multiset() {
    for (world, q) in cases() {
        let task = world.build_task().unwrap();
        let request = PlanRequestV1::top_quality(q).with_unordered();
        let bound = request.quality_bound(optimal_cost(&task).unwrap()).unwrap();
        let oracle = plans_up_to(&task, bound);

        let policy = EnginePolicyV1::default();
        let report = run_world(world.as_ref(), HeuristicChoice::Max, &request, &policy).unwrap();
        assert_eq!(
            report.result.plans.len(),
            unordered_classes(&oracle),
            "{} q={q}",
            world.world_id()
        );
        let keys: BTreeSet<Vec<String>> = report
            .result
            .plans
            .iter()
            .map(|p| {
                let mut sorted = p.actions.clone();
                sorted.sort();
                sorted
            })
            .collect();
        assert_eq!(keys.len(), report.result.plans.len());
        assert_well_formed(&task, &report.result);
    }
}

#[test]
fn k_and_quality_together_stop_at_whichever_comes_first() {
    let world = Grid::new(3, 3);
    // Six plans of cost 4 exist; the bound 4 cuts after them.
    let loose_k = run_world(
        &world,
        HeuristicChoice::Max,
        &PlanRequestV1::top_k_quality(100, 1.0),
        &EnginePolicyV1::default(),
    )
    .unwrap();
    assert_eq!(loose_k.result.costs(), vec![4; 6]);
    assert_eq!(loose_k.result.termination, TerminationReasonV1::QualityBoundReached);

    let tight_k = run_world(
        &world,
        HeuristicChoice::Max,
        &PlanRequestV1::top_k_quality(2, 1.0),
        &EnginePolicyV1::default(),
    )
    .unwrap();
    assert_eq!(tight_k.result.costs(), vec![4, 4]);
    assert_eq!(tight_k.result.termination, TerminationReasonV1::PlanLimitReached);
}

/// A cheap direct route, an expensive detour, and a mid-priced route whose
/// last step is only recorded after the detour is already a candidate.
fn late_route() -> GroundTask {
    let mut b = StripsBuilder::new();
    let s = b.atom("at s");
    let m = b.atom("at m");
    let t = b.atom("at t");
    b.action("direct", 4, &[s], &[t], &[s]);
    b.action("detour", 10, &[s], &[t], &[s]);
    b.action("s-m", 1, &[s], &[m], &[s]);
    b.action("m-t", 4, &[m], &[t], &[m]);
    b.init(&[s]).goal(&[t]);
    b.build().unwrap()
}

#[test]
fn plans_within_the_bound_are_found_behind_a_candidate_above_it() {
    let task = late_route();
    let request = PlanRequestV1::top_quality(1.5);
    let bound = request.quality_bound(optimal_cost(&task).unwrap()).unwrap();
    assert_eq!(bound, 6);
    let expected: BTreeSet<(i64, Vec<String>)> =
        plans_up_to(&task, bound).into_iter().map(|p| (p.cost, p.actions)).collect();
    assert_eq!(expected.len(), 2);

    for heuristic in [HeuristicChoice::Max, HeuristicChoice::Blind] {
        let policy = EnginePolicyV1::default();
        let report = run_task("late-route", task.clone(), heuristic, &request, &policy).unwrap();
        let got: BTreeSet<(i64, Vec<String>)> =
            report.result.plans.iter().map(|p| (p.cost, p.actions.clone())).collect();
        assert_eq!(got, expected, "heuristic={heuristic}");
        assert_eq!(report.result.termination, TerminationReasonV1::QualityBoundReached);
        assert_well_formed(&task, &report.result);
    }
}
