//! Binary that runs a fixed set of worlds through the enumeration pipeline
//! and prints deterministic output lines for cross-process verification.
//!
//! Usage: `plan_fixture`
//!
//! Output: one block of key=value lines per world. Logs go to stderr
//! (`RUST_LOG` overrides the default `warn` level).

use kplan_harness::contract::PlanningWorld;
use kplan_harness::runner::{run_world, HeuristicChoice};
use kplan_harness::worlds::blocksworld::Blocksworld;
use kplan_harness::worlds::grid::Grid;
use kplan_harness::worlds::gripper::Gripper;
use kplan_harness::worlds::locked_door::LockedDoor;
use kplan_search::{EnginePolicyV1, PlanRequestV1};

struct Case {
    world: Box<dyn PlanningWorld>,
    heuristic: HeuristicChoice,
    request: PlanRequestV1,
    policy: EnginePolicyV1,
}

fn cases() -> Vec<Case> {
    let mut symmetric = EnginePolicyV1::default();
    symmetric.symmetry.search_pruning = true;
    vec![
        Case {
            world: Box::new(Blocksworld::two_block_swap()),
            heuristic: HeuristicChoice::Max,
            request: PlanRequestV1::top_k_quality(1000, 2.0).with_unordered(),
            policy: EnginePolicyV1::default(),
        },
        Case {
            world: Box::new(Grid::new(3, 3)),
            heuristic: HeuristicChoice::Blind,
            request: PlanRequestV1::top_k(10),
            policy: EnginePolicyV1::default(),
        },
        Case {
            world: Box::new(Gripper::new(2)),
            heuristic: HeuristicChoice::Max,
            request: PlanRequestV1::top_k(5),
            policy: symmetric,
        },
        Case {
            world: Box::new(LockedDoor::unsolvable()),
            heuristic: HeuristicChoice::Blind,
            request: PlanRequestV1::top_k(1),
            policy: EnginePolicyV1::default(),
        },
    ]
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    for case in cases() {
        let report = run_world(case.world.as_ref(), case.heuristic, &case.request, &case.policy)
            .expect("run failed");
        let termination =
            serde_json::to_value(report.result.termination).expect("termination serializes");
        println!("world={}", report.world_id);
        println!("heuristic={}", report.heuristic);
        println!("task_digest={}", report.task_digest);
        println!("result_digest={}", report.result_digest);
        println!("plans_digest={}", report.plans_digest);
        match &report.symmetry_digest {
            Some(digest) => println!("symmetry_digest={digest}"),
            None => println!("symmetry_digest=none"),
        }
        println!("plan_count={}", report.result.plans.len());
        println!("termination={}", termination.as_str().unwrap_or("?"));
    }
}
