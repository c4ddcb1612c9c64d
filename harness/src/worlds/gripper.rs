//! Gripper: a two-handed robot carries balls from room A to room B.
//!
//! Balls are interchangeable and so are the two hands, which makes this the
//! reference world for symmetry pruning and plan canonicalization.

use kplan_kernel::task::{GroundTask, StripsBuilder};

use crate::contract::{PlanningWorld, WorldError};

const ROOMS: [&str; 2] = ["rooma", "roomb"];
const HANDS: [&str; 2] = ["left", "right"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gripper {
    id: String,
    balls: usize,
}

impl Gripper {
    #[must_use]
    pub fn new(balls: usize) -> Self {
        Self {
            id: format!("gripper_{balls}"),
            balls,
        }
    }

    /// Cost of the cheapest plan: full trips of two balls, then a single
    /// ball if one is left over.
    #[must_use]
    pub fn optimal_cost(balls: usize) -> i64 {
        let n = i64::try_from(balls).unwrap_or(i64::MAX / 4);
        if n == 0 {
            return 0;
        }
        let trips = (n + 1) / 2;
        // Pick and drop per ball, one move per trip, one return per extra trip.
        2 * n + trips + (trips - 1)
    }
}

impl PlanningWorld for Gripper {
    fn world_id(&self) -> &str {
        &self.id
    }

    fn build_task(&self) -> Result<GroundTask, WorldError> {
        if self.balls == 0 {
            return Err(WorldError::InvalidParameters {
                world: self.id.clone(),
                detail: "at least one ball is required".into(),
            });
        }
        let balls: Vec<String> = (1..=self.balls).map(|i| format!("ball{i}")).collect();
        let mut b = StripsBuilder::new();

        for from in ROOMS {
            for to in ROOMS.iter().filter(|&&to| to != from) {
                let here = b.atom(format!("at-robby {from}"));
                let there = b.atom(format!("at-robby {to}"));
                b.action(format!("move {from} {to}"), 1, &[here], &[there], &[here]);
            }
        }
        for ball in &balls {
            for room in ROOMS {
                for hand in HANDS {
                    let at_ball = b.atom(format!("at {ball} {room}"));
                    let at_robby = b.atom(format!("at-robby {room}"));
                    let free = b.atom(format!("free {hand}"));
                    let carry = b.atom(format!("carry {ball} {hand}"));
                    b.action(
                        format!("pick {ball} {room} {hand}"),
                        1,
                        &[at_ball, at_robby, free],
                        &[carry],
                        &[at_ball, free],
                    );
                    b.action(
                        format!("drop {ball} {room} {hand}"),
                        1,
                        &[carry, at_robby],
                        &[at_ball, free],
                        &[carry],
                    );
                }
            }
        }

        let mut init = vec![b.atom("at-robby rooma")];
        init.extend(HANDS.iter().map(|hand| b.atom(format!("free {hand}"))));
        init.extend(balls.iter().map(|ball| b.atom(format!("at {ball} rooma"))));
        let goal: Vec<_> = balls.iter().map(|ball| b.atom(format!("at {ball} roomb"))).collect();
        b.init(&init).goal(&goal);
        Ok(b.build()?)
    }
}
