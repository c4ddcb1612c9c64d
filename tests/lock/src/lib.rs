//! Shared helpers for the lock tests.
//!
//! [`oracle`] answers the questions the engine answers, by brute force, so
//! integration tests can compare the two on small worlds.
