//! World implementations for the harness runner.

pub mod blocksworld;
pub mod grid;
pub mod gripper;
pub mod locked_door;
