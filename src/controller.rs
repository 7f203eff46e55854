use crate::engine::body::ActorBody;
use crate::engine::input::InputSource;
use crate::fsm::StateMachine;
use crate::states::{CROUCH, FALL, IDLE, JUMP, RUN, WALK};

/// Stick deflection below which movement input reads as noise.
const MOVE_THRESHOLD: f32 = 0.2;

/// Transition policy. Reads the current leaf plus input and ground contact,
/// and names the state to request; the machine owns how to get there. All
/// machine-driven transitions for an actor funnel through here, except the
/// in-state handover from Jump to Fall at the apex.
///
/// Ground-contact rules run before movement intent, so an actor that left
/// the floor is reclassified as falling before its stick is even looked at.
pub struct Controller {
    pub move_threshold: f32,
}

impl Controller {
    pub fn new() -> Self {
        Self {
            move_threshold: MOVE_THRESHOLD,
        }
    }

    /// The decision table. `None` means stay where you are.
    pub fn desired_state(
        &self,
        machine: &StateMachine,
        input: &dyn InputSource,
        body: &dyn ActorBody,
    ) -> Option<&'static str> {
        let grounded = body.is_grounded();

        match machine.leaf_name() {
            Some(IDLE | WALK | RUN | CROUCH) => {
                if !grounded {
                    // Walked off an edge; momentum handling moves to Airborne.
                    Some(FALL)
                } else if input.jump_pressed() {
                    Some(JUMP)
                } else {
                    Some(self.ground_leaf(input))
                }
            }
            Some(JUMP | FALL) => {
                if grounded {
                    // Touchdown: pick the ground leaf the stick is asking for.
                    Some(self.ground_leaf(input))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn ground_leaf(&self, input: &dyn InputSource) -> &'static str {
        if input.crouch_held() {
            CROUCH
        } else if input.movement_magnitude() > self.move_threshold {
            if input.run_held() {
                RUN
            } else {
                WALK
            }
        } else {
            IDLE
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}
