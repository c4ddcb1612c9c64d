//! Unsolvable, timeout and resource-limit outcomes are results, not errors.

use kplan_harness::contract::PlanningWorld;
use kplan_harness::runner::{run_world, HeuristicChoice};
use kplan_harness::worlds::grid::Grid;
use kplan_harness::worlds::locked_door::LockedDoor;
use kplan_search::{EnginePolicyV1, PlanRequestV1, TerminationReasonV1};
use lock_tests::oracle::assert_well_formed;

#[test]
fn unsolvable_task_reports_no_plans() {
    for heuristic in [HeuristicChoice::Blind, HeuristicChoice::Max] {
        let report = run_world(
            &LockedDoor::unsolvable(),
            heuristic,
            &PlanRequestV1::top_k(5),
            &EnginePolicyV1::default(),
        )
        .unwrap();
        let result = &report.result;
        assert!(result.unsolvable, "heuristic={heuristic}");
        assert!(result.plans.is_empty());
        assert_eq!(result.optimal_cost, None);
        assert_eq!(result.termination, TerminationReasonV1::Unsolvable);
        assert!(!result.timeout_triggered);
    }
}

#[test]
fn hmax_recognises_the_dead_end_without_searching() {
    let report = run_world(
        &LockedDoor::unsolvable(),
        HeuristicChoice::Max,
        &PlanRequestV1::top_k(1),
        &EnginePolicyV1::default(),
    )
    .unwrap();
    assert_eq!(report.result.statistics.expanded, 0);
    assert_eq!(report.result.statistics.dead_ends, 1);
}

#[test]
fn zero_budget_times_out_before_the_first_plan() {
    let report = run_world(
        &Grid::new(3, 3),
        HeuristicChoice::Blind,
        &PlanRequestV1::top_k(5).with_time_limit_ms(0),
        &EnginePolicyV1::default(),
    )
    .unwrap();
    let result = &report.result;
    assert!(result.timeout_triggered);
    assert!(result.plans.is_empty());
    assert!(!result.unsolvable);
    assert_eq!(result.termination, TerminationReasonV1::Timeout);
}

#[test]
fn a_running_enumeration_keeps_its_partial_plans_on_timeout() {
    let world = Grid::new(5, 5);
    let task = world.build_task().unwrap();
    let report = run_world(
        &world,
        HeuristicChoice::Max,
        &PlanRequestV1::top_k(10_000_000).with_time_limit_ms(150),
        &EnginePolicyV1::default(),
    )
    .unwrap();
    let result = &report.result;
    assert!(result.timeout_triggered);
    assert_eq!(result.termination, TerminationReasonV1::Timeout);
    assert!(result.plans.len() < 10_000_000);
    assert_well_formed(&task, result);
}

#[test]
fn state_ceiling_reports_resource_exhaustion() {
    let policy = EnginePolicyV1 {
        max_states: Some(5),
        ..EnginePolicyV1::default()
    };
    let request = PlanRequestV1::top_k(3);
    let report = run_world(&Grid::new(4, 4), HeuristicChoice::Blind, &request, &policy).unwrap();
    let result = &report.result;
    assert!(result.memory_limit_triggered);
    assert!(!result.timeout_triggered);
    assert!(!result.unsolvable);
    assert_eq!(result.termination, TerminationReasonV1::ResourceExhausted);
    assert!(result.plans.is_empty());
    assert!(result.statistics.states < 16);
}

#[test]
fn a_generous_ceiling_changes_nothing() {
    let world = Grid::new(3, 3);
    let request = PlanRequestV1::top_k(4);
    let limited = EnginePolicyV1 {
        max_states: Some(1000),
        ..EnginePolicyV1::default()
    };
    let a = run_world(&world, HeuristicChoice::Max, &request, &limited).unwrap();
    let b = run_world(&world, HeuristicChoice::Max, &request, &EnginePolicyV1::default()).unwrap();
    assert_eq!(a.result.plans, b.result.plans);
    assert!(!a.result.memory_limit_triggered);
}
