//! An agent in a hall with a locked door and no key anywhere: unsolvable.
//!
//! With `key_in_closet` the key can be fetched first and the world becomes
//! solvable, which keeps both variants structurally alike.

use kplan_kernel::task::{GroundTask, StripsBuilder};

use crate::contract::{PlanningWorld, WorldError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedDoor {
    id: String,
    key_in_closet: bool,
}

impl LockedDoor {
    #[must_use]
    pub fn unsolvable() -> Self {
        Self {
            id: "locked_door".into(),
            key_in_closet: false,
        }
    }

    #[must_use]
    pub fn with_key() -> Self {
        Self {
            id: "locked_door_key".into(),
            key_in_closet: true,
        }
    }
}

impl PlanningWorld for LockedDoor {
    fn world_id(&self) -> &str {
        &self.id
    }

    fn build_task(&self) -> Result<GroundTask, WorldError> {
        let mut b = StripsBuilder::new();
        let hall = b.atom("at hall");
        let closet = b.atom("at closet");
        let room = b.atom("at room");
        let key = b.atom("have key");
        b.action("walk hall closet", 1, &[hall], &[closet], &[hall]);
        b.action("walk closet hall", 1, &[closet], &[hall], &[closet]);
        b.action("unlock-and-enter", 2, &[hall, key], &[room], &[hall]);
        if self.key_in_closet {
            b.action("take key", 1, &[closet], &[key], &[]);
        }
        b.init(&[hall]).goal(&[room]);
        Ok(b.build()?)
    }
}
