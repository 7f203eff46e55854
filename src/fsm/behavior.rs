//! The capability trait state implementations fill in, and the per-tick
//! context handed to every hook.
//!
//! Orchestration (who gets entered, exited, or updated, and in what order)
//! belongs to [`StateMachine`](super::StateMachine). A behavior only ever
//! sees its own five hooks; all of them default to no-ops so leaf-only or
//! grouping-only states implement exactly what they need.

use crate::camera::CameraRig;
use crate::engine::anim::AnimationSink;
use crate::engine::body::ActorBody;
use crate::engine::input::InputSource;

/// Everything a hook may touch during one tick. Borrowed fresh each tick,
/// so no collaborator reference can go stale between frames.
pub struct ActorCtx<'a> {
    /// Fixed step for this tick, in seconds.
    pub dt: f32,
    pub input: &'a dyn InputSource,
    pub body: &'a mut dyn ActorBody,
    pub rig: &'a mut CameraRig,
    pub anim: &'a mut dyn AnimationSink,
    request: Option<String>,
}

impl<'a> ActorCtx<'a> {
    pub fn new(
        dt: f32,
        input: &'a dyn InputSource,
        body: &'a mut dyn ActorBody,
        rig: &'a mut CameraRig,
        anim: &'a mut dyn AnimationSink,
    ) -> Self {
        Self {
            dt,
            input,
            body,
            rig,
            anim,
            request: None,
        }
    }

    /// Ask the owning machine to transition once the current sweep finishes.
    /// Hooks must not re-enter the machine mid-sweep; the machine applies
    /// the request after the last active state has run. The most recent
    /// request in a sweep wins.
    pub fn request_transition(&mut self, target: impl Into<String>) {
        self.request = Some(target.into());
    }

    pub(crate) fn take_request(&mut self) -> Option<String> {
        self.request.take()
    }
}

/// One state's implementation hooks. Every method is optional.
///
/// Lifecycle contract:
/// - `ready` runs exactly once per state, parents before children, before
///   the machine enters anything. One-time setup and derived constants.
/// - `enter` / `exit` bracket the state's time on the active path. `exit`
///   runs leaf-first, `enter` parent-first.
/// - `update` and `physics_update` run every tick the state is active,
///   parents before children, each at most once per tick.
pub trait Behavior: Send + Sync {
    fn ready(&mut self, _ctx: &mut ActorCtx) {}
    fn enter(&mut self, _ctx: &mut ActorCtx) {}
    fn exit(&mut self, _ctx: &mut ActorCtx) {}
    fn update(&mut self, _ctx: &mut ActorCtx) {}
    fn physics_update(&mut self, _ctx: &mut ActorCtx) {}
}
