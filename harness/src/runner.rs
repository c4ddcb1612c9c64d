//! Harness runner: builds a world's task, enumerates its plans and digests
//! the outcome.
//!
//! # Pipeline
//!
//! ```text
//! build_task() → task_digest() → enumerate_plans()
//!   → result.digest() / result.plans_digest() → RunReport
//! ```
//!
//! The runner holds no state between runs. Two runs with equal inputs
//! produce equal reports, in this process or another one.

use std::fmt;
use std::str::FromStr;

use kplan_kernel::heuristic::{BlindHeuristic, Heuristic, MaxHeuristic};
use kplan_kernel::proof::canon::{canonical_bytes_of, CanonError};
use kplan_kernel::proof::hash::{canonical_hash, ContentHash};
use kplan_kernel::proof::hash_domain::HashDomain;
use kplan_kernel::task::GroundTask;
use kplan_search::symmetry::SymmetryGroup;
use kplan_search::{enumerate_plans, EnginePolicyV1, PlanRequestV1, PlanningResultV1, SearchError};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::contract::{PlanningWorld, WorldError};

/// Error during a harness run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("world: {0}")]
    World(#[from] WorldError),
    #[error("search: {0}")]
    Search(#[from] SearchError),
    #[error("canonical JSON: {0}")]
    Canon(#[from] CanonError),
}

/// The heuristic oracle a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicChoice {
    Blind,
    Max,
}

impl HeuristicChoice {
    #[must_use]
    pub fn heuristic(self) -> &'static dyn Heuristic {
        match self {
            Self::Blind => &BlindHeuristic,
            Self::Max => &MaxHeuristic,
        }
    }
}

impl fmt::Display for HeuristicChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heuristic().name())
    }
}

/// Unknown heuristic name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown heuristic {0:?} (expected \"blind\" or \"hmax\")")]
pub struct UnknownHeuristic(pub String);

impl FromStr for HeuristicChoice {
    type Err = UnknownHeuristic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blind" => Ok(Self::Blind),
            "hmax" | "max" => Ok(Self::Max),
            other => Err(UnknownHeuristic(other.to_string())),
        }
    }
}

/// Everything a run produced, plus its digests.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub world_id: String,
    pub heuristic: HeuristicChoice,
    pub task: GroundTask,
    pub task_digest: ContentHash,
    pub result: PlanningResultV1,
    pub result_digest: ContentHash,
    pub plans_digest: ContentHash,
    /// Digest of the symmetry group, when the policy uses one.
    pub symmetry_digest: Option<ContentHash>,
}

/// Domain-separated digest of a task's canonical JSON.
///
/// # Errors
///
/// Returns [`CanonError`] if serialization fails.
pub fn task_digest(task: &GroundTask) -> Result<ContentHash, CanonError> {
    let bytes = canonical_bytes_of(task)?;
    Ok(canonical_hash(HashDomain::Task, &bytes))
}

/// Build and run a world.
///
/// # Errors
///
/// Returns [`RunError`] if the world cannot be built, the request or policy
/// is invalid, or digesting fails.
pub fn run_world(
    world: &dyn PlanningWorld,
    heuristic: HeuristicChoice,
    request: &PlanRequestV1,
    policy: &EnginePolicyV1,
) -> Result<RunReport, RunError> {
    let task = world.build_task()?;
    run_task(world.world_id(), task, heuristic, request, policy)
}

/// Run an already grounded task, e.g. one loaded from a JSON file.
///
/// # Errors
///
/// Returns [`RunError`] if the request or policy is invalid, or digesting
/// fails.
pub fn run_task(
    world_id: &str,
    task: GroundTask,
    heuristic: HeuristicChoice,
    request: &PlanRequestV1,
    policy: &EnginePolicyV1,
) -> Result<RunReport, RunError> {
    let task_digest = task_digest(&task)?;
    let result = enumerate_plans(&task, heuristic.heuristic(), request, policy)?;
    let result_digest = result.digest()?;
    let plans_digest = result.plans_digest()?;
    let symmetry_digest = symmetry_digest(&task, policy)?;

    info!(
        world = world_id,
        %heuristic,
        plans = result.plans.len(),
        termination = ?result.termination,
        %result_digest,
        "run finished"
    );

    Ok(RunReport {
        world_id: world_id.to_string(),
        heuristic,
        task,
        task_digest,
        result,
        result_digest,
        plans_digest,
        symmetry_digest,
    })
}

/// Digest of the group a policy asks for: the search-time group when states
/// are pruned, the initial-state stabilizer otherwise. `None` if the policy
/// uses no symmetry.
///
/// # Errors
///
/// Returns [`CanonError`] if serialization fails.
pub fn symmetry_digest(
    task: &GroundTask,
    policy: &EnginePolicyV1,
) -> Result<Option<ContentHash>, CanonError> {
    let sym = &policy.symmetry;
    if !sym.any_enabled() {
        return Ok(None);
    }
    let stabilize = !sym.search_pruning || sym.stabilize_initial_state;
    SymmetryGroup::compute(task, sym, stabilize).digest().map(Some)
}
