use glam::Vec2;

use crate::fsm::{ActorCtx, Behavior};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const WALK_SPEED: f32 = 6.0;
pub const RUN_SPEED: f32 = 10.0;
pub const CROUCH_SPEED: f32 = 2.5;

/// m/s² toward the target horizontal velocity while grounded.
const GROUND_ACCELERATION: f32 = 40.0;
/// Small downward bias that keeps the body reporting ground contact
/// between integration steps.
const GROUND_SNAP: f32 = 0.5;

/// Meters of ground travel between footstep triggers.
const STRIDE_LENGTH: f32 = 1.8;
/// Planar speed below which no stride accumulates.
const STRIDE_MIN_SPEED: f32 = 0.5;

// ---------------------------------------------------------------------------
// Shared ground movement
// ---------------------------------------------------------------------------

/// One physics tick of grounded movement at `speed`: accelerate the
/// horizontal velocity toward the camera-relative input direction, press
/// the body onto the floor, integrate. The calling leaf is the only
/// velocity writer this tick.
///
/// Acceleration is finite rather than an instant override, so momentum
/// carries across Idle/Walk/Run swaps instead of snapping.
pub(crate) fn ground_move(ctx: &mut ActorCtx, speed: f32) {
    let dir = ctx.rig.direction_from_input(ctx.input.movement());
    let target_x = dir.x * speed;
    let target_z = dir.z * speed;

    let mut vel = ctx.body.velocity();
    let diff_x = target_x - vel.x;
    let diff_z = target_z - vel.z;
    let dist = (diff_x * diff_x + diff_z * diff_z).sqrt();
    if dist > 0.0 {
        let step = (GROUND_ACCELERATION * ctx.dt).min(dist);
        vel.x += diff_x / dist * step;
        vel.z += diff_z / dist * step;
    }

    vel.y = if ctx.body.is_grounded() {
        -GROUND_SNAP
    } else {
        vel.y - ctx.body.gravity() * ctx.dt
    };

    ctx.body.set_velocity(vel);
    ctx.body.integrate(ctx.dt);
}

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

/// Grounded-movement category. Never a leaf itself; it owns the stride
/// accumulator so the footstep rhythm survives Idle/Walk/Run/Crouch swaps,
/// and resets it only when the actor returns to the ground.
pub struct Locomotion {
    stride: f32,
}

impl Locomotion {
    pub fn new() -> Self {
        Self { stride: 0.0 }
    }
}

impl Behavior for Locomotion {
    fn enter(&mut self, _ctx: &mut ActorCtx) {
        self.stride = 0.0;
    }

    fn physics_update(&mut self, ctx: &mut ActorCtx) {
        // Runs before the leaf, so this reads last tick's velocity. Good
        // enough for footstep cadence.
        let vel = ctx.body.velocity();
        let speed = Vec2::new(vel.x, vel.z).length();
        if ctx.body.is_grounded() && speed > STRIDE_MIN_SPEED {
            self.stride += speed * ctx.dt;
            if self.stride >= STRIDE_LENGTH {
                self.stride -= STRIDE_LENGTH;
                ctx.anim.play("footstep");
            }
        }
    }
}

/// Standing still. Steers toward zero velocity, so stopping decelerates
/// instead of freezing.
pub struct Idle;

impl Behavior for Idle {
    fn enter(&mut self, ctx: &mut ActorCtx) {
        ctx.anim.play("idle");
    }

    fn physics_update(&mut self, ctx: &mut ActorCtx) {
        ground_move(ctx, 0.0);
    }
}

pub struct Walk;

impl Behavior for Walk {
    fn enter(&mut self, ctx: &mut ActorCtx) {
        ctx.anim.play("walk");
    }

    fn physics_update(&mut self, ctx: &mut ActorCtx) {
        ground_move(ctx, WALK_SPEED);
    }
}

pub struct Run;

impl Behavior for Run {
    fn enter(&mut self, ctx: &mut ActorCtx) {
        ctx.anim.play("run");
    }

    fn physics_update(&mut self, ctx: &mut ActorCtx) {
        ground_move(ctx, RUN_SPEED);
    }
}

pub struct Crouch;

impl Behavior for Crouch {
    fn enter(&mut self, ctx: &mut ActorCtx) {
        ctx.anim.play("crouch");
    }

    fn physics_update(&mut self, ctx: &mut ActorCtx) {
        ground_move(ctx, CROUCH_SPEED);
    }
}
