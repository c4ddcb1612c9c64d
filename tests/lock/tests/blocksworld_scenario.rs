//! Two-block swap: B starts on A, the goal is A on B.

use kplan_harness::contract::PlanningWorld;
use kplan_harness::runner::{run_world, HeuristicChoice};
use kplan_harness::worlds::blocksworld::Blocksworld;
use kplan_search::{EnginePolicyV1, PlanRequestV1, TerminationReasonV1};
use lock_tests::oracle::{assert_well_formed, plans_up_to, unordered_classes};

#[test]
fn unordered_top_quality_with_a_large_k() {
    let world = Blocksworld::two_block_swap();
    let task = world.build_task().unwrap();
    let request = PlanRequestV1::top_k_quality(1000, 2.0).with_unordered();
    let report =
        run_world(&world, HeuristicChoice::Max, &request, &EnginePolicyV1::default()).unwrap();
    let result = &report.result;

    assert!(!result.plans.is_empty());
    assert!(result.plans.len() < 1000);
    assert_eq!(result.plans[0].cost, 4);
    assert_eq!(result.plans[0].actions.len(), 4);
    assert!(!result.unsolvable);
    assert!(!result.timeout_triggered);
    assert!(!result.memory_limit_triggered);
    assert_eq!(result.termination, TerminationReasonV1::QualityBoundReached);
    assert_eq!(result.plans.len(), unordered_classes(&plans_up_to(&task, 8)));
    assert_well_formed(&task, result);
}

#[test]
fn the_cheapest_plan_is_unique() {
    let report = run_world(
        &Blocksworld::two_block_swap(),
        HeuristicChoice::Blind,
        &PlanRequestV1::top_quality(1.0),
        &EnginePolicyV1::default(),
    )
    .unwrap();
    assert_eq!(report.result.plans.len(), 1);
    assert_eq!(
        report.result.plans[0].actions,
        vec!["unstack B A", "put-down B", "pick-up A", "stack A B"]
    );
}

#[test]
fn plans_json_wraps_the_plan_list() {
    let report = run_world(
        &Blocksworld::two_block_swap(),
        HeuristicChoice::Max,
        &PlanRequestV1::top_k(2),
        &EnginePolicyV1::default(),
    )
    .unwrap();
    let json = report.result.plans_json();
    let plans = json["plans"].as_array().unwrap();
    assert_eq!(plans.len(), 2);
    assert_eq!(plans[0]["cost"], 4);
    assert_eq!(plans[0]["actions"][0], "unstack B A");
}
