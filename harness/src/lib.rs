//! kplan harness: named planning worlds and the run pipeline around the engine.
//!
//! The harness builds grounded tasks, runs them through
//! [`kplan_search::enumerate_plans`] and persists the outcome as a small
//! directory of canonical JSON files.
//!
//! The harness does NOT search. Worlds provide task content only; the
//! runner owns orchestration and digests.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod contract;
pub mod result_dir;
pub mod runner;
pub mod worlds;
