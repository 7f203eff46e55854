use std::sync::Arc;

use glam::Vec3;
use hecs::{Entity, World};

use crate::camera::CameraRig;
use crate::controller::Controller;
use crate::engine::anim::AnimationSink;
use crate::engine::body::KinematicBody;
use crate::engine::input::InputSource;
use crate::fsm::{ActorCtx, BuildError, Diagnostics};
use crate::states::locomotion_machine;

/// Display name for logs and scenario summaries.
pub struct ActorName(pub String);

/// The actor's command feed. Boxed so players (scripted or device-backed)
/// and bots (waypoint AI) are the same archetype.
pub struct InputHandle(pub Box<dyn InputSource>);

/// Where the actor's clip triggers go.
pub struct AnimHandle(pub Box<dyn AnimationSink>);

/// Leaf name after the previous tick; the update system logs on change.
pub struct LastLeaf(pub Option<String>);

/// Spawn a fully wired actor: state machine over the standard tree,
/// controller, kinematic body, camera rig, and the given input and
/// animation endpoints. The machine is started before the components move
/// into the world, so the entity is never visible in a half-initialized
/// state.
pub fn spawn_actor(
    world: &mut World,
    name: &str,
    position: Vec3,
    input: Box<dyn InputSource>,
    mut anim: Box<dyn AnimationSink>,
    diag: Arc<dyn Diagnostics>,
) -> Result<Entity, BuildError> {
    let mut machine = locomotion_machine(diag)?;
    let mut body = KinematicBody::new(position);
    let mut rig = CameraRig::new();

    {
        let mut ctx = ActorCtx::new(0.0, input.as_ref(), &mut body, &mut rig, anim.as_mut());
        machine.start(&mut ctx);
    }

    let entity = world.spawn((
        ActorName(name.to_owned()),
        machine,
        Controller::new(),
        body,
        rig,
        InputHandle(input),
        AnimHandle(anim),
        LastLeaf(None),
    ));
    Ok(entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::anim::NullAnimation;
    use crate::engine::input::ScriptedInput;
    use crate::fsm::{CollectDiagnostics, StateMachine};
    use crate::states::IDLE;

    #[test]
    fn spawned_actor_is_started_and_idle() {
        let mut world = World::new();
        let diag = Arc::new(CollectDiagnostics::new());

        let entity = spawn_actor(
            &mut world,
            "hero",
            Vec3::ZERO,
            Box::new(ScriptedInput::idle()),
            Box::new(NullAnimation),
            diag.clone(),
        )
        .unwrap();

        let machine = world.get::<&StateMachine>(entity).unwrap();
        assert_eq!(machine.leaf_name(), Some(IDLE));
        assert_eq!(machine.active_path().len(), 3);
        assert!(diag.is_empty());
    }
}
