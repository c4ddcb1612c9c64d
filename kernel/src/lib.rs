//! kplan kernel: the grounded task model consumed by the plan enumerator.
//!
//! # API Surface
//!
//! - [`task::GroundTask`] -- a validated finite-domain transition system
//!   (variables, operators, initial state, goal)
//! - [`task::StripsBuilder`] -- builds a `GroundTask` from boolean atoms
//! - [`task::StateRegistry`] -- interns states to dense [`task::StateId`]s
//! - [`heuristic::Heuristic`] -- the pluggable cost-to-goal oracle
//! - [`proof::hash::canonical_hash`] -- domain-separated SHA-256 digests
//!
//! # Module Dependency Direction
//!
//! `task` ← `heuristic`, `proof` is independent.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod heuristic;
pub mod proof;
pub mod task;
