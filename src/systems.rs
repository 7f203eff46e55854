use hecs::World;
use log::debug;

use crate::actor::{ActorName, AnimHandle, InputHandle, LastLeaf};
use crate::camera::CameraRig;
use crate::controller::Controller;
use crate::engine::anim::AnimationSink;
use crate::engine::body::{ActorBody, KinematicBody};
use crate::engine::input::{ActorPose, InputSource};
use crate::fsm::{ActorCtx, StateMachine};

/// The control half of one actor tick: latch input, run the controller's
/// decision against the machine, then sweep `update` down the active path.
///
/// Order matters. Input is latched first so edges are stable for the whole
/// tick; the controller runs before the sweep so states tick in the frame
/// of the decision that selected them.
pub fn drive_actor_update(
    dt: f32,
    machine: &mut StateMachine,
    controller: &Controller,
    input: &mut dyn InputSource,
    body: &mut dyn ActorBody,
    rig: &mut CameraRig,
    anim: &mut dyn AnimationSink,
) {
    let pose = ActorPose {
        position: body.position(),
        yaw: rig.yaw,
        grounded: body.is_grounded(),
    };
    input.begin_frame(&pose);

    let target = controller.desired_state(machine, &*input, &*body);

    let mut ctx = ActorCtx::new(dt, &*input, body, rig, anim);
    if let Some(target) = target {
        machine.change_state(target, &mut ctx);
    }
    machine.update(&mut ctx);
}

/// The physics half of one actor tick: sweep `physics_update` down the
/// active path. Runs after [`drive_actor_update`] on the same latched
/// input frame.
pub fn drive_actor_physics(
    dt: f32,
    machine: &mut StateMachine,
    input: &dyn InputSource,
    body: &mut dyn ActorBody,
    rig: &mut CameraRig,
    anim: &mut dyn AnimationSink,
) {
    let mut ctx = ActorCtx::new(dt, input, body, rig, anim);
    machine.physics_update(&mut ctx);
}

/// Drive every actor's control tick, and log leaf changes as they happen.
/// Runs **before** [`actor_physics_system`] each frame.
pub fn actor_update_system(world: &mut World, dt: f32) {
    for (_entity, (machine, controller, body, rig, input, anim, name, last)) in world.query_mut::<(
        &mut StateMachine,
        &Controller,
        &mut KinematicBody,
        &mut CameraRig,
        &mut InputHandle,
        &mut AnimHandle,
        &ActorName,
        &mut LastLeaf,
    )>() {
        drive_actor_update(
            dt,
            machine,
            controller,
            input.0.as_mut(),
            body,
            rig,
            anim.0.as_mut(),
        );

        if machine.leaf_name() != last.0.as_deref() {
            debug!("[{}] state -> {}", name.0, machine.leaf_name().unwrap_or("?"));
            last.0 = machine.leaf_name().map(str::to_owned);
        }
    }
}

/// Drive every actor's fixed-step physics tick.
pub fn actor_physics_system(world: &mut World, dt: f32) {
    for (_entity, (machine, body, rig, input, anim)) in world.query_mut::<(
        &mut StateMachine,
        &mut KinematicBody,
        &mut CameraRig,
        &mut InputHandle,
        &mut AnimHandle,
    )>() {
        drive_actor_physics(dt, machine, input.0.as_ref(), body, rig, anim.0.as_mut());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glam::{Vec2, Vec3};

    use super::*;
    use crate::actor::spawn_actor;
    use crate::engine::anim::NullAnimation;
    use crate::engine::input::{InputFrame, ScriptedInput};
    use crate::fsm::CollectDiagnostics;
    use crate::states::{IDLE, WALK};

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn world_tick_walks_a_scripted_actor() {
        let mut world = World::new();
        let diag = Arc::new(CollectDiagnostics::new());
        let script = ScriptedInput::new([(30, InputFrame::move_dir(Vec2::new(0.0, 1.0)))]);

        let entity = spawn_actor(
            &mut world,
            "hero",
            Vec3::ZERO,
            Box::new(script),
            Box::new(NullAnimation),
            diag.clone(),
        )
        .unwrap();

        for _ in 0..30 {
            actor_update_system(&mut world, DT);
            actor_physics_system(&mut world, DT);
        }

        {
            let machine = world.get::<&StateMachine>(entity).unwrap();
            assert_eq!(machine.leaf_name(), Some(WALK));
        }
        {
            let body = world.get::<&KinematicBody>(entity).unwrap();
            assert!(body.position().z < -1.0, "moved forward: {:?}", body.position());
        }
        {
            let last = world.get::<&LastLeaf>(entity).unwrap();
            assert_eq!(last.0.as_deref(), Some(WALK));
        }
        assert!(diag.is_empty());
    }

    #[test]
    fn actor_settles_back_to_idle_when_the_script_ends() {
        let mut world = World::new();
        let diag = Arc::new(CollectDiagnostics::new());
        let script = ScriptedInput::new([(10, InputFrame::move_dir(Vec2::new(0.0, 1.0)))]);

        let entity = spawn_actor(
            &mut world,
            "hero",
            Vec3::ZERO,
            Box::new(script),
            Box::new(NullAnimation),
            diag,
        )
        .unwrap();

        for _ in 0..60 {
            actor_update_system(&mut world, DT);
            actor_physics_system(&mut world, DT);
        }

        let machine = world.get::<&StateMachine>(entity).unwrap();
        assert_eq!(machine.leaf_name(), Some(IDLE));
    }
}
