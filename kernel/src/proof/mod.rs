//! Digests for determinism checks: canonical JSON and domain-separated hashing.

pub mod canon;
pub mod hash;
pub mod hash_domain;
