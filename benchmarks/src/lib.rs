//! Shared helpers for kplan benchmark suites.
//!
//! A [`Regime`] fixes a world, a request and a policy. The macro benches time
//! whole enumerations per regime; [`guard_digest`] lets them check that
//! every timed iteration produced the same plans.

use kplan_harness::contract::PlanningWorld;
use kplan_harness::runner::HeuristicChoice;
use kplan_harness::worlds::blocksworld::Blocksworld;
use kplan_harness::worlds::grid::Grid;
use kplan_harness::worlds::gripper::Gripper;
use kplan_kernel::proof::canon::canonical_json_bytes;
use kplan_kernel::proof::hash::{canonical_hash, ContentHash};
use kplan_kernel::proof::hash_domain::HashDomain;
use kplan_kernel::task::GroundTask;
use kplan_search::{
    enumerate_plans, EnginePolicyV1, PlanRequestV1, PlanningResultV1, SymmetryPolicyV1,
};

/// One benchmark configuration, with its task already grounded.
pub struct Regime {
    pub name: &'static str,
    pub task: GroundTask,
    pub heuristic: HeuristicChoice,
    pub request: PlanRequestV1,
    pub policy: EnginePolicyV1,
}

impl Regime {
    /// # Panics
    ///
    /// Panics if the world does not build. Benchmark setup failures are fatal.
    #[must_use]
    pub fn new(
        name: &'static str,
        world: &dyn PlanningWorld,
        heuristic: HeuristicChoice,
        request: PlanRequestV1,
        policy: EnginePolicyV1,
    ) -> Self {
        Self {
            name,
            task: world.build_task().expect("benchmark world should build"),
            heuristic,
            request,
            policy,
        }
    }
}

/// The macro regimes: deep top-k, wide top-quality, unordered, symmetry.
#[must_use]
pub fn regimes() -> Vec<Regime> {
    let pruning = EnginePolicyV1 {
        symmetry: SymmetryPolicyV1 {
            search_pruning: true,
            ..SymmetryPolicyV1::default()
        },
        ..EnginePolicyV1::default()
    };
    vec![
        Regime::new(
            "grid_topk",
            &Grid::new(6, 6),
            HeuristicChoice::Max,
            PlanRequestV1::top_k(1000),
            EnginePolicyV1::default(),
        ),
        Regime::new(
            "grid_quality",
            &Grid::new(5, 5).with_wall(2, 2),
            HeuristicChoice::Max,
            PlanRequestV1::top_quality(1.25),
            EnginePolicyV1::default(),
        ),
        Regime::new(
            "blocks_unordered",
            &Blocksworld::reverse_tower(4),
            HeuristicChoice::Max,
            PlanRequestV1::top_k_quality(200, 1.5).with_unordered(),
            EnginePolicyV1::default(),
        ),
        Regime::new(
            "gripper_plain",
            &Gripper::new(4),
            HeuristicChoice::Blind,
            PlanRequestV1::top_k(100),
            EnginePolicyV1::default(),
        ),
        Regime::new(
            "gripper_pruned",
            &Gripper::new(4),
            HeuristicChoice::Blind,
            PlanRequestV1::top_k(100),
            pruning,
        ),
    ]
}

/// Run a regime's enumeration.
///
/// # Panics
///
/// Panics if the engine rejects the request or policy.
#[must_use]
pub fn run_regime(regime: &Regime) -> PlanningResultV1 {
    enumerate_plans(&regime.task, regime.heuristic.heuristic(), &regime.request, &regime.policy)
        .expect("enumeration should succeed in benchmarks")
}

/// Digest of the plan list alone, for cross-iteration determinism checks.
///
/// # Panics
///
/// Panics if the plan list cannot be canonicalized.
#[must_use]
pub fn guard_digest(result: &PlanningResultV1) -> ContentHash {
    let bytes = canonical_json_bytes(&result.plans_json()).expect("plans are canonical JSON");
    canonical_hash(HashDomain::BenchGuard, &bytes)
}
