//! Top-k results against the brute-force oracle.
//!
//! For every world, heuristic and k: the costs are exactly the k smallest
//! plan costs of the task, the first one is the Dijkstra optimum, and every
//! returned plan is a real plan of the task.

use kplan_harness::contract::PlanningWorld;
use kplan_harness::runner::{run_world, HeuristicChoice};
use kplan_harness::worlds::blocksworld::Blocksworld;
use kplan_harness::worlds::grid::Grid;
use kplan_harness::worlds::gripper::Gripper;
use kplan_harness::worlds::locked_door::LockedDoor;
use kplan_search::{EnginePolicyV1, PlanRequestV1, TerminationReasonV1};
use lock_tests::oracle::{assert_well_formed, optimal_cost, plans_up_to, OraclePlan};

fn worlds() -> Vec<Box<dyn PlanningWorld>> {
    vec![
        Box::new(Grid::new(3, 3)),
        Box::new(Grid::new(3, 3).with_wall(1, 1)),
        Box::new(Blocksworld::two_block_swap()),
        Box::new(LockedDoor::with_key()),
        Box::new(Gripper::new(1)),
    ]
}

/// Oracle plans up to the smallest bound that holds at least `k` of them.
fn oracle_plans(world: &dyn PlanningWorld, k: usize) -> Vec<OraclePlan> {
    let task = world.build_task().unwrap();
    let optimal = optimal_cost(&task).unwrap();
    let mut bound = optimal;
    loop {
        let plans = plans_up_to(&task, bound);
        if plans.len() >= k {
            return plans;
        }
        bound += 1;
        assert!(bound <= optimal + 12, "{} has fewer than {k} plans", world.world_id());
    }
}

#[test]
fn costs_are_the_k_smallest() {
    for world in worlds() {
        let task = world.build_task().unwrap();
        for k in [1, 4, 9] {
            let oracle = oracle_plans(world.as_ref(), k);
            let expected: Vec<i64> = oracle.iter().take(k).map(|p| p.cost).collect();
            for heuristic in [HeuristicChoice::Blind, HeuristicChoice::Max] {
                let request = PlanRequestV1::top_k(k);
                let policy = EnginePolicyV1::default();
                let report = run_world(world.as_ref(), heuristic, &request, &policy).unwrap();
                let result = &report.result;
                assert_eq!(
                    result.costs(),
                    expected,
                    "{} k={k} heuristic={heuristic}",
                    world.world_id()
                );
                assert_eq!(result.termination, TerminationReasonV1::PlanLimitReached);
                assert_eq!(result.optimal_cost, optimal_cost(&task));
                assert_well_formed(&task, result);
            }
        }
    }
}

#[test]
fn every_plan_is_an_oracle_plan() {
    for world in worlds() {
        let oracle = oracle_plans(world.as_ref(), 9);
        let report = run_world(
            world.as_ref(),
            HeuristicChoice::Max,
            &PlanRequestV1::top_k(9),
            &EnginePolicyV1::default(),
        )
        .unwrap();
        for plan in &report.result.plans {
            let as_oracle = OraclePlan {
                cost: plan.cost,
                actions: plan.actions.clone(),
            };
            assert!(
                oracle.binary_search(&as_oracle).is_ok(),
                "{}: {:?} is not a plan of the task",
                world.world_id(),
                plan.actions
            );
        }
    }
}

#[test]
fn first_cost_matches_dijkstra_on_larger_worlds() {
    let cases: Vec<Box<dyn PlanningWorld>> = vec![
        Box::new(Blocksworld::reverse_tower(3)),
        Box::new(Gripper::new(3)),
        Box::new(Grid::new(5, 4).with_wall(2, 1).with_wall(2, 2)),
    ];
    for world in cases {
        let task = world.build_task().unwrap();
        let report = run_world(
            world.as_ref(),
            HeuristicChoice::Max,
            &PlanRequestV1::top_k(3),
            &EnginePolicyV1::default(),
        )
        .unwrap();
        assert_eq!(report.result.optimal_cost, optimal_cost(&task), "{}", world.world_id());
        assert_eq!(report.result.plans.len(), 3);
        assert_well_formed(&task, &report.result);
    }
}
