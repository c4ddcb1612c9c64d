//! Plan reordering on gripper: reorderings of accepted plans are valid
//! plans of the same cost, and they never push out a cheaper plan.

use std::collections::BTreeSet;

use kplan_harness::contract::PlanningWorld;
use kplan_harness::runner::{run_world, HeuristicChoice};
use kplan_harness::worlds::gripper::Gripper;
use kplan_search::{EnginePolicyV1, PlanRequestV1, PlanningResultV1, SymmetryPolicyV1};
use lock_tests::oracle::{assert_well_formed, optimal_cost, plans_up_to};

fn reordering(symmetry: SymmetryPolicyV1) -> EnginePolicyV1 {
    EnginePolicyV1 {
        reorder_plans: true,
        symmetry,
        ..EnginePolicyV1::default()
    }
}

fn pruning() -> SymmetryPolicyV1 {
    SymmetryPolicyV1 {
        search_pruning: true,
        stabilize_initial_state: true,
        ..SymmetryPolicyV1::default()
    }
}

fn run(request: &PlanRequestV1, policy: &EnginePolicyV1) -> PlanningResultV1 {
    run_world(&Gripper::new(2), HeuristicChoice::Max, request, policy).unwrap().result
}

fn plan_set(result: &PlanningResultV1) -> BTreeSet<Vec<String>> {
    result.plans.iter().map(|p| p.actions.clone()).collect()
}

#[test]
fn reordered_quality_plans_match_the_oracle() {
    let task = Gripper::new(2).build_task().unwrap();
    let optimal = optimal_cost(&task).unwrap();
    let expected: BTreeSet<Vec<String>> =
        plans_up_to(&task, optimal).into_iter().map(|p| p.actions).collect();

    let result = run(&PlanRequestV1::top_quality(1.0), &reordering(SymmetryPolicyV1::default()));
    assert_eq!(plan_set(&result), expected);
    assert_eq!(result.plans.len(), expected.len());
    assert_well_formed(&task, &result);
}

#[test]
fn reordering_recovers_plans_lost_to_pruning() {
    let task = Gripper::new(2).build_task().unwrap();
    let optimal = optimal_cost(&task).unwrap();
    let oracle: BTreeSet<Vec<String>> =
        plans_up_to(&task, optimal).into_iter().map(|p| p.actions).collect();
    let request = PlanRequestV1::top_quality(1.0);

    let pruned = run(
        &request,
        &EnginePolicyV1 {
            symmetry: pruning(),
            ..EnginePolicyV1::default()
        },
    );
    let reordered = run(&request, &reordering(pruning()));
    assert!(plan_set(&pruned).is_subset(&plan_set(&reordered)));
    assert!(plan_set(&reordered).is_subset(&oracle));
    assert_eq!(plan_set(&reordered).len(), reordered.plans.len());
    assert!(reordered.plans.iter().all(|p| p.cost == optimal));
    assert_well_formed(&task, &reordered);
}

#[test]
fn top_k_costs_are_unchanged_by_reordering() {
    let task = Gripper::new(2).build_task().unwrap();
    let k = 12;
    let oracle = plans_up_to(&task, optimal_cost(&task).unwrap() + 2);
    let expected: Vec<i64> = oracle.iter().take(k).map(|p| p.cost).collect();
    assert_eq!(expected.len(), k);

    let result = run(&PlanRequestV1::top_k(k), &reordering(SymmetryPolicyV1::default()));
    assert_eq!(result.costs(), expected);
    assert_well_formed(&task, &result);
}
