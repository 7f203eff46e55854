//! The concrete actor state tree.
//!
//! ```text
//! FreeLook                  look/camera, always active
//! └─ Locomotion (default)   grounded movement, stride tracking
//! │   ├─ Idle (default)
//! │   ├─ Walk
//! │   ├─ Run
//! │   └─ Crouch
//! └─ Airborne               gravity, airtime, landing
//!     ├─ Fall (default)
//!     └─ Jump
//! ```

mod airborne;
mod free_look;
mod locomotion;

use std::sync::Arc;

pub use airborne::{Airborne, Fall, Jump};
pub use free_look::FreeLook;
pub use locomotion::{Crouch, Idle, Locomotion, Run, Walk, CROUCH_SPEED, RUN_SPEED, WALK_SPEED};

use crate::fsm::{BuildError, Diagnostics, MachineBuilder, StateMachine};

pub const FREE_LOOK: &str = "FreeLook";
pub const LOCOMOTION: &str = "Locomotion";
pub const IDLE: &str = "Idle";
pub const WALK: &str = "Walk";
pub const RUN: &str = "Run";
pub const CROUCH: &str = "Crouch";
pub const AIRBORNE: &str = "Airborne";
pub const JUMP: &str = "Jump";
pub const FALL: &str = "Fall";

/// Assemble the standard actor tree. Fall is the airborne default so a
/// transition targeting Airborne itself (spawning in the air, walking off
/// a ledge) lands on the descending state, never on Jump.
pub fn locomotion_machine(diag: Arc<dyn Diagnostics>) -> Result<StateMachine, BuildError> {
    MachineBuilder::new(FREE_LOOK, FreeLook)
        .diagnostics(diag)
        .default_child(FREE_LOOK, LOCOMOTION, Locomotion::new())
        .default_child(LOCOMOTION, IDLE, Idle)
        .child(LOCOMOTION, WALK, Walk)
        .child(LOCOMOTION, RUN, Run)
        .child(LOCOMOTION, CROUCH, Crouch)
        .child(FREE_LOOK, AIRBORNE, Airborne::new())
        .default_child(AIRBORNE, FALL, Fall)
        .child(AIRBORNE, JUMP, Jump::new())
        .build()
}
