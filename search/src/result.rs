//! The planning result record.
//!
//! A [`PlanningResultV1`] is the only thing the engine hands back on success.
//! It is serde-serializable, and its canonical JSON digest is stable across
//! runs and processes for the same task, request and policy (wall-clock
//! timing is deliberately absent from it).

use kplan_kernel::proof::canon::{canonical_bytes_of, canonical_json_bytes, CanonError};
use kplan_kernel::proof::hash::{canonical_hash, ContentHash};
use kplan_kernel::proof::hash_domain::HashDomain;
use serde::{Deserialize, Serialize};

/// One returned plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub cost: i64,
    /// Operator names, in execution order.
    pub actions: Vec<String>,
}

/// Why enumeration stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReasonV1 {
    /// `k` plans were produced.
    PlanLimitReached,
    /// The next plan would exceed the quality bound.
    QualityBoundReached,
    /// Every plan of the search space has been produced.
    Exhausted,
    /// No plan exists.
    Unsolvable,
    /// The time budget elapsed.
    Timeout,
    /// The state ceiling was hit.
    ResourceExhausted,
}

/// Work counters. All deterministic for a fixed input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStatistics {
    pub expanded: u64,
    pub generated: u64,
    pub evaluated: u64,
    pub reopened: u64,
    pub dead_ends: u64,
    /// Successors replaced by their orbit representative.
    pub pruned_by_symmetry: u64,
    /// A* batches run after the first goal.
    pub astar_rounds: u64,
    /// Snapshots handed to the path enumerator.
    pub eppstein_rounds: u64,
    pub candidates_popped: u64,
    pub duplicates_dropped: u64,
    pub symmetry_generators: u64,
    pub states: u64,
    pub graph_edges: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningResultV1 {
    /// Non-decreasing in cost.
    pub plans: Vec<PlanRecord>,
    pub optimal_cost: Option<i64>,
    pub unsolvable: bool,
    pub timeout_triggered: bool,
    pub memory_limit_triggered: bool,
    pub termination: TerminationReasonV1,
    pub statistics: SearchStatistics,
}

impl PlanningResultV1 {
    /// Serialize to canonical JSON bytes (sorted keys, compact).
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn to_canonical_json_bytes(&self) -> Result<Vec<u8>, CanonError> {
        canonical_bytes_of(self)
    }

    /// Domain-separated digest of the canonical JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        let bytes = self.to_canonical_json_bytes()?;
        Ok(canonical_hash(HashDomain::PlanningResult, &bytes))
    }

    /// Digest of the plan list alone, independent of statistics.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn plans_digest(&self) -> Result<ContentHash, CanonError> {
        let bytes = canonical_json_bytes(&self.plans_json())?;
        Ok(canonical_hash(HashDomain::Plan, &bytes))
    }

    /// The `{"plans": [{"cost": N, "actions": [...]}]}` wrapper.
    #[must_use]
    pub fn plans_json(&self) -> serde_json::Value {
        serde_json::json!({
            "plans": self
                .plans
                .iter()
                .map(|p| serde_json::json!({"actions": p.actions, "cost": p.cost}))
                .collect::<Vec<_>>(),
        })
    }

    #[must_use]
    pub fn costs(&self) -> Vec<i64> {
        self.plans.iter().map(|p| p.cost).collect()
    }
}
