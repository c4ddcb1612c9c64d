//! kplan search: top-k and top-quality plan enumeration.
//!
//! This crate turns a grounded task from `kplan_kernel` into a ranked list of
//! plans. It depends only on the kernel; worlds and the runner live in
//! `kplan_harness`.
//!
//! # Crate dependency graph
//!
//! ```text
//! kplan_kernel  ←  kplan_search  ←  kplan_harness
//! (task, h)        (engine)          (worlds, runner)
//! ```
//!
//! # Pipeline
//!
//! - [`astar`]: incremental A* that records every examined edge.
//! - [`graph`], [`sidetrack`], [`heap`]: shortest-path snapshots, sidetrack
//!   lists and persistent heaps over the recorded graph.
//! - [`eppstein`]: lazy k-shortest-paths enumeration of one snapshot.
//! - [`controller`]: stop conditions, certification, batch sizing.
//! - [`assembler`], [`selector`]: decoding paths into plans and dropping
//!   duplicates.
//! - [`reorder`]: equal-cost reorderings of accepted plans.
//! - [`symmetry`]: structural symmetries for state pruning and plan keys.
//! - [`engine::enumerate_plans`]: the entry point.

#![forbid(unsafe_code)]

pub mod assembler;
pub mod astar;
pub mod controller;
pub mod engine;
pub mod eppstein;
pub mod error;
pub mod frontier;
pub mod graph;
pub mod heap;
pub mod node;
pub mod reorder;
pub mod request;
pub mod result;
pub mod selector;
pub mod sidetrack;
pub mod symmetry;

pub use engine::enumerate_plans;
pub use error::SearchError;
pub use request::{EnginePolicyV1, PlanRequestV1, SymmetryPolicyV1};
pub use result::{PlanRecord, PlanningResultV1, SearchStatistics, TerminationReasonV1};
