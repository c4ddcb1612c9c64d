//! Request and engine policy types.
//!
//! A [`PlanRequestV1`] says what to enumerate (how many plans, how far from
//! optimal, how long). An [`EnginePolicyV1`] says how the engine gets there
//! (widening cadence, reopening, memory ceiling, symmetry use). Both are plain
//! immutable values handed by reference to every component.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// What to enumerate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequestV1 {
    /// Maximum number of plans to return.
    pub k: Option<usize>,
    /// Return plans with cost at most `floor(quality * optimal)`.
    pub quality: Option<f64>,
    /// Wall-clock budget for the whole enumeration.
    pub time_limit_ms: Option<u64>,
    /// Collapse plans that are permutations of each other.
    #[serde(default)]
    pub unordered: bool,
    /// In ordered mode, only operators whose whole name matches keep their
    /// relative order in the dedup key; the others may appear in any order.
    /// Ignored for unordered requests.
    #[serde(default)]
    pub preserve_order_regex: Option<String>,
}

impl PlanRequestV1 {
    /// The `k` cheapest plans.
    #[must_use]
    pub fn top_k(k: usize) -> Self {
        Self {
            k: Some(k),
            quality: None,
            time_limit_ms: None,
            unordered: false,
            preserve_order_regex: None,
        }
    }

    /// Every plan within a factor `quality` of optimal.
    #[must_use]
    pub fn top_quality(quality: f64) -> Self {
        Self {
            k: None,
            quality: Some(quality),
            ..Self::top_k(1)
        }
    }

    /// At most `k` plans, each within a factor `quality` of optimal.
    #[must_use]
    pub fn top_k_quality(k: usize, quality: f64) -> Self {
        Self {
            quality: Some(quality),
            ..Self::top_k(k)
        }
    }

    #[must_use]
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    #[must_use]
    pub fn with_unordered(mut self) -> Self {
        self.unordered = true;
        self
    }

    #[must_use]
    pub fn with_preserve_order_regex(mut self, pattern: &str) -> Self {
        self.preserve_order_regex = Some(pattern.to_owned());
        self
    }

    /// Check the request and compile its preserve-order pattern, anchored so
    /// it has to match a whole operator name.
    ///
    /// # Errors
    ///
    /// [`SearchError::InvalidRequest`] if neither a positive `k` nor a
    /// quality factor is given, if `k` is zero, or if the quality factor is
    /// not a finite number `>= 1.0`. [`SearchError::InvalidPreserveRegex`]
    /// if the pattern does not compile.
    pub fn validate(&self) -> Result<Option<Regex>, SearchError> {
        if self.k.is_none() && self.quality.is_none() {
            return Err(SearchError::InvalidRequest {
                detail: "one of k or quality is required".into(),
            });
        }
        if self.k == Some(0) {
            return Err(SearchError::InvalidRequest {
                detail: "k must be at least 1".into(),
            });
        }
        if let Some(q) = self.quality {
            if !q.is_finite() || q < 1.0 {
                return Err(SearchError::InvalidRequest {
                    detail: format!("quality must be a finite number >= 1.0, got {q}"),
                });
            }
        }
        match &self.preserve_order_regex {
            Some(pattern) => Ok(Some(Regex::new(&format!("^(?:{pattern})$"))?)),
            None => Ok(None),
        }
    }

    /// Largest admissible plan cost for an optimal cost `optimal`.
    ///
    /// A small epsilon absorbs float error so `1.5 * 4` bounds at `6`.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn quality_bound(&self, optimal: i64) -> Option<i64> {
        self.quality.map(|q| (q * optimal as f64 + 1e-9).floor() as i64)
    }
}

/// How the engine searches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnginePolicyV1 {
    /// Lower bound of an A* batch, in percent of expansions so far.
    pub openlist_inc_percent_lb: u32,
    /// Upper bound of an A* batch, in percent of expansions so far.
    pub openlist_inc_percent_ub: u32,
    /// Reopen closed nodes when a strictly cheaper path is found.
    pub reopen_closed: bool,
    /// End an A* batch as soon as a goal state is generated.
    pub switch_on_goal: bool,
    /// Ceiling on distinct search states.
    pub max_states: Option<usize>,
    /// Offer the equal-cost reorderings of each accepted plan.
    pub reorder_plans: bool,
    /// Prefixes visited per plan while looking for reorderings.
    pub max_reorder_nodes: u64,
    pub symmetry: SymmetryPolicyV1,
}

impl Default for EnginePolicyV1 {
    fn default() -> Self {
        Self {
            openlist_inc_percent_lb: 1,
            openlist_inc_percent_ub: 5,
            reopen_closed: true,
            switch_on_goal: false,
            max_states: None,
            reorder_plans: false,
            max_reorder_nodes: 100_000,
            symmetry: SymmetryPolicyV1::default(),
        }
    }
}

impl EnginePolicyV1 {
    /// # Errors
    ///
    /// [`SearchError::InvalidPolicy`] if the widening bounds are inverted or
    /// above 100%, or if plan canonicalization and plan extension are both
    /// enabled.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.openlist_inc_percent_lb > self.openlist_inc_percent_ub {
            return Err(SearchError::InvalidPolicy {
                detail: format!(
                    "openlist_inc_percent_lb ({}) exceeds openlist_inc_percent_ub ({})",
                    self.openlist_inc_percent_lb, self.openlist_inc_percent_ub
                ),
            });
        }
        if self.openlist_inc_percent_ub > 100 {
            return Err(SearchError::InvalidPolicy {
                detail: format!(
                    "openlist_inc_percent_ub ({}) exceeds 100",
                    self.openlist_inc_percent_ub
                ),
            });
        }
        if self.symmetry.plan_canonicalization && self.symmetry.extend_plans {
            return Err(SearchError::InvalidPolicy {
                detail: "plan_canonicalization and extend_plans cannot both be enabled".into(),
            });
        }
        Ok(())
    }
}

/// Symmetry use at search time and plan time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymmetryPolicyV1 {
    /// Merge symmetric states during search.
    pub search_pruning: bool,
    /// Dedup plans up to symmetry.
    pub plan_canonicalization: bool,
    /// Offer symmetric images of accepted plans.
    pub extend_plans: bool,
    /// Restrict search-time symmetries to those fixing the initial state.
    pub stabilize_initial_state: bool,
    /// Refinement budget of the automorphism search.
    pub max_search_nodes: u64,
    /// Cap on plan images explored per plan.
    pub max_orbit_size: usize,
}

impl Default for SymmetryPolicyV1 {
    fn default() -> Self {
        Self {
            search_pruning: false,
            plan_canonicalization: false,
            extend_plans: false,
            stabilize_initial_state: false,
            max_search_nodes: 100_000,
            max_orbit_size: 1_000,
        }
    }
}

impl SymmetryPolicyV1 {
    #[must_use]
    pub fn any_enabled(&self) -> bool {
        self.search_pruning || self.plan_canonicalization || self.extend_plans
    }
}
