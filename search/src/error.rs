//! Typed search errors.
//!
//! `SearchError` covers malformed input and broken oracle contracts. Running
//! out of time or memory, or finding no plan, are outcomes recorded on
//! [`crate::result::PlanningResultV1`], not errors.

use kplan_kernel::task::TaskError;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("invalid request: {detail}")]
    InvalidRequest { detail: String },

    #[error("invalid engine policy: {detail}")]
    InvalidPolicy { detail: String },

    #[error("invalid preserve-order pattern: {0}")]
    InvalidPreserveRegex(#[from] regex::Error),

    #[error(transparent)]
    Task(#[from] TaskError),

    /// Heuristics must never return a negative lower bound.
    #[error("heuristic `{heuristic}` returned {value} for state {state}")]
    NegativeHeuristic {
        heuristic: String,
        value: i64,
        state: String,
    },
}
