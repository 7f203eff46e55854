use crate::fsm::{ActorCtx, Behavior};

/// Root state. Active for the actor's whole lifetime; its only job is
/// feeding look input into the camera rig every frame, which is why aiming
/// keeps working mid-jump without any leaf knowing about the camera.
pub struct FreeLook;

impl Behavior for FreeLook {
    fn update(&mut self, ctx: &mut ActorCtx) {
        let look = ctx.input.look();
        ctx.rig.look(look);
    }
}
