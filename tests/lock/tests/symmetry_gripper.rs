//! Symmetry handling on gripper, where balls and hands are interchangeable.

use std::collections::BTreeSet;

use kplan_harness::contract::PlanningWorld;
use kplan_harness::runner::{run_world, HeuristicChoice};
use kplan_harness::worlds::gripper::Gripper;
use kplan_search::{EnginePolicyV1, PlanRequestV1, PlanningResultV1, SymmetryPolicyV1};
use lock_tests::oracle::assert_well_formed;

fn policy(symmetry: SymmetryPolicyV1) -> EnginePolicyV1 {
    EnginePolicyV1 {
        symmetry,
        ..EnginePolicyV1::default()
    }
}

fn pruning() -> SymmetryPolicyV1 {
    SymmetryPolicyV1 {
        search_pruning: true,
        ..SymmetryPolicyV1::default()
    }
}

fn run(
    world: &Gripper,
    heuristic: HeuristicChoice,
    request: &PlanRequestV1,
    policy: &EnginePolicyV1,
) -> PlanningResultV1 {
    run_world(world, heuristic, request, policy).unwrap().result
}

fn plan_set(result: &PlanningResultV1) -> BTreeSet<Vec<String>> {
    result.plans.iter().map(|p| p.actions.clone()).collect()
}

#[test]
fn pruning_keeps_the_optimum_and_shrinks_the_search() {
    for balls in [2, 3] {
        let world = Gripper::new(balls);
        let request = PlanRequestV1::top_k(1);
        let plain = run(&world, HeuristicChoice::Blind, &request, &EnginePolicyV1::default());
        let pruned = run(&world, HeuristicChoice::Blind, &request, &policy(pruning()));

        assert_eq!(pruned.optimal_cost, Some(Gripper::optimal_cost(balls)));
        assert_eq!(plain.optimal_cost, pruned.optimal_cost);
        assert!(pruned.statistics.symmetry_generators >= 1);
        assert!(pruned.statistics.pruned_by_symmetry > 0);
        assert!(
            pruned.statistics.states < plain.statistics.states,
            "{balls} balls: {} pruned vs {} plain states",
            pruned.statistics.states,
            plain.statistics.states
        );
    }
}

#[test]
fn pruned_plans_decode_to_real_plans() {
    let world = Gripper::new(2);
    let task = world.build_task().unwrap();
    for heuristic in [HeuristicChoice::Blind, HeuristicChoice::Max] {
        let result = run(&world, heuristic, &PlanRequestV1::top_k(12), &policy(pruning()));
        assert_eq!(result.plans.len(), 12);
        assert_well_formed(&task, &result);
    }
}

#[test]
fn canonicalization_keeps_one_plan_per_orbit() {
    let world = Gripper::new(2);
    let request = PlanRequestV1::top_quality(1.0);
    let plain = run(&world, HeuristicChoice::Max, &request, &EnginePolicyV1::default());
    // Which ball goes to which hand, the pick order and the drop order.
    assert_eq!(plain.plans.len(), 8);

    let canonical = run(
        &world,
        HeuristicChoice::Max,
        &request,
        &policy(SymmetryPolicyV1 {
            plan_canonicalization: true,
            ..SymmetryPolicyV1::default()
        }),
    );
    // Swapping balls and swapping hands leaves drop-order-same and
    // drop-order-reversed as the two classes.
    assert_eq!(canonical.plans.len(), 2);
    assert!(plan_set(&canonical).is_subset(&plan_set(&plain)));
    assert!(canonical.statistics.duplicates_dropped >= 6);
}

#[test]
fn extension_recovers_symmetric_plans_after_pruning() {
    let world = Gripper::new(2);
    let task = world.build_task().unwrap();
    let request = PlanRequestV1::top_quality(1.0);
    let plain = run(&world, HeuristicChoice::Max, &request, &EnginePolicyV1::default());
    let extended = run(
        &world,
        HeuristicChoice::Max,
        &request,
        &policy(SymmetryPolicyV1 {
            search_pruning: true,
            stabilize_initial_state: true,
            extend_plans: true,
            ..SymmetryPolicyV1::default()
        }),
    );
    assert!(extended.plans.len() >= 4);
    assert!(plan_set(&extended).is_subset(&plan_set(&plain)));
    assert!(extended.plans.iter().all(|p| p.cost == 5));
    assert_well_formed(&task, &extended);
}

#[test]
fn canonicalization_and_extension_are_exclusive() {
    let err = run_world(
        &Gripper::new(2),
        HeuristicChoice::Blind,
        &PlanRequestV1::top_k(1),
        &policy(SymmetryPolicyV1 {
            plan_canonicalization: true,
            extend_plans: true,
            ..SymmetryPolicyV1::default()
        }),
    )
    .unwrap_err();
    assert!(err.to_string().contains("extend_plans"));
}
