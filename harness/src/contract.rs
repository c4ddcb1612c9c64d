//! World contract: the minimal trait a world must implement.
//!
//! Worlds build grounded tasks. They may NOT search, hash or persist
//! results; those are runner concerns.

use kplan_kernel::task::{GroundTask, TaskError};

/// Typed failure while building a world's task.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// The world's own parameters are inconsistent.
    #[error("world {world}: {detail}")]
    InvalidParameters { world: String, detail: String },
    /// The kernel rejected the grounded task.
    #[error(transparent)]
    Task(#[from] TaskError),
}

/// The contract a world must implement to be run by the harness runner.
pub trait PlanningWorld {
    /// Unique world identifier (e.g., `"blocksworld_2"`).
    fn world_id(&self) -> &str;

    /// Ground the world into a task.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError`] if the parameters do not describe a valid task.
    fn build_task(&self) -> Result<GroundTask, WorldError>;
}
