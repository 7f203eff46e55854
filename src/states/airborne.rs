use crate::fsm::{ActorCtx, Behavior};

use super::FALL;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Apex height of a full jump, in meters. The impulse is derived from this
/// and the body's gravity in [`Jump::ready`].
const JUMP_HEIGHT: f32 = 2.5;
/// Fraction of upward velocity kept when jump is released mid-rise.
const JUMP_CUT_FACTOR: f32 = 0.5;

// Air control: reduced max speed, acceleration-based steering, and no
// braking when the stick is neutral so momentum carries through the arc.
const AIR_CONTROL_SPEED: f32 = 4.0;
const AIR_ACCELERATION: f32 = 10.0;

/// Downward speed in m/s past which a landing reads as hard. A full jump
/// comes back down at about 7 m/s; this is roughly a four-meter drop.
const HARD_LANDING_SPEED: f32 = 9.0;

// ---------------------------------------------------------------------------
// Shared air movement
// ---------------------------------------------------------------------------

/// One physics tick of airborne movement: nudge horizontal velocity toward
/// the input direction at reduced authority, then integrate. Gravity is
/// already applied by [`Airborne`] before the leaf runs.
fn air_steer(ctx: &mut ActorCtx) {
    let dir = ctx.rig.direction_from_input(ctx.input.movement());
    if dir.length_squared() > 0.0 {
        let mut vel = ctx.body.velocity();
        let diff_x = dir.x * AIR_CONTROL_SPEED - vel.x;
        let diff_z = dir.z * AIR_CONTROL_SPEED - vel.z;
        let dist = (diff_x * diff_x + diff_z * diff_z).sqrt();
        if dist > 0.0 {
            let step = (AIR_ACCELERATION * ctx.dt).min(dist);
            vel.x += diff_x / dist * step;
            vel.z += diff_z / dist * step;
        }
        ctx.body.set_velocity(vel);
    }
    ctx.body.integrate(ctx.dt);
}

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

/// Off-the-ground category. Applies gravity before the active leaf steers,
/// and tracks the fastest downward speed of the whole flight so the landing
/// clip fired on exit can tell a hop from a plunge. The peak surviving the
/// Jump-to-Fall leaf swap is the point of keeping it here.
pub struct Airborne {
    peak_fall: f32,
}

impl Airborne {
    pub fn new() -> Self {
        Self { peak_fall: 0.0 }
    }
}

impl Behavior for Airborne {
    fn enter(&mut self, _ctx: &mut ActorCtx) {
        self.peak_fall = 0.0;
    }

    fn exit(&mut self, ctx: &mut ActorCtx) {
        let clip = if self.peak_fall >= HARD_LANDING_SPEED {
            "land_hard"
        } else {
            "land_soft"
        };
        ctx.anim.play(clip);
    }

    fn physics_update(&mut self, ctx: &mut ActorCtx) {
        let mut vel = ctx.body.velocity();
        vel.y -= ctx.body.gravity() * ctx.dt;
        ctx.body.set_velocity(vel);
        // Sampled before the leaf integrates, so the floor clamp can never
        // hide the impact speed.
        self.peak_fall = self.peak_fall.max(-vel.y);
    }
}

/// Rising phase. The impulse lands on enter; releasing jump mid-rise cuts
/// the ascent for variable height, and passing the apex hands over to Fall.
pub struct Jump {
    impulse: f32,
    cut_applied: bool,
}

impl Jump {
    pub fn new() -> Self {
        Self {
            impulse: 0.0,
            cut_applied: false,
        }
    }
}

impl Behavior for Jump {
    fn ready(&mut self, ctx: &mut ActorCtx) {
        // v = sqrt(2gh) puts the apex at JUMP_HEIGHT.
        self.impulse = (2.0 * ctx.body.gravity() * JUMP_HEIGHT).sqrt();
    }

    fn enter(&mut self, ctx: &mut ActorCtx) {
        self.cut_applied = false;
        let mut vel = ctx.body.velocity();
        vel.y = self.impulse;
        ctx.body.set_velocity(vel);
        ctx.anim.play("jump");
    }

    fn physics_update(&mut self, ctx: &mut ActorCtx) {
        if !self.cut_applied && !ctx.input.jump_held() {
            let mut vel = ctx.body.velocity();
            if vel.y > 0.0 {
                vel.y *= JUMP_CUT_FACTOR;
                ctx.body.set_velocity(vel);
            }
            self.cut_applied = true;
        }

        air_steer(ctx);

        if ctx.body.velocity().y <= 0.0 {
            ctx.request_transition(FALL);
        }
    }
}

/// Descending, whether past a jump apex or straight off a ledge. Ends when
/// the controller sees ground contact again.
pub struct Fall;

impl Behavior for Fall {
    fn enter(&mut self, ctx: &mut ActorCtx) {
        ctx.anim.play("fall");
    }

    fn physics_update(&mut self, ctx: &mut ActorCtx) {
        air_steer(ctx);
    }
}
