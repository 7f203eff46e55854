//! End-to-end locomotion scenarios: scripted input driving the standard
//! state tree through the same per-tick sequence the world systems run.

use std::sync::{Arc, Mutex};

use glam::{Vec2, Vec3};

use strider::camera::CameraRig;
use strider::engine::anim::ClipRecorder;
use strider::engine::body::{ActorBody, KinematicBody};
use strider::engine::input::{InputFrame, InputSource, ScriptedInput};
use strider::fsm::{ActorCtx, CollectDiagnostics, StateMachine};
use strider::states::{locomotion_machine, CROUCH_SPEED, RUN_SPEED, WALK_SPEED};
use strider::systems::{drive_actor_physics, drive_actor_update};
use strider::Controller;

const DT: f32 = 1.0 / 60.0;

struct Harness<I: InputSource> {
    machine: StateMachine,
    controller: Controller,
    input: I,
    body: KinematicBody,
    rig: CameraRig,
    anim: ClipRecorder,
    diag: Arc<CollectDiagnostics>,
    /// Every leaf the machine notified, starting with the initial descent.
    changes: Arc<Mutex<Vec<String>>>,
}

impl<I: InputSource> Harness<I> {
    fn new(input: I, position: Vec3) -> Self {
        let diag = Arc::new(CollectDiagnostics::new());
        let mut machine = locomotion_machine(diag.clone()).unwrap();

        let changes: Arc<Mutex<Vec<String>>> = Arc::default();
        let sink = Arc::clone(&changes);
        machine.on_change(move |leaf| sink.lock().unwrap().push(leaf.to_owned()));

        let mut body = KinematicBody::new(position);
        let mut rig = CameraRig::new();
        let mut anim = ClipRecorder::new();
        {
            let mut ctx = ActorCtx::new(DT, &input, &mut body, &mut rig, &mut anim);
            machine.start(&mut ctx);
        }

        Self {
            machine,
            controller: Controller::new(),
            input,
            body,
            rig,
            anim,
            diag,
            changes,
        }
    }

    fn tick(&mut self) {
        drive_actor_update(
            DT,
            &mut self.machine,
            &self.controller,
            &mut self.input,
            &mut self.body,
            &mut self.rig,
            &mut self.anim,
        );
        drive_actor_physics(
            DT,
            &mut self.machine,
            &self.input,
            &mut self.body,
            &mut self.rig,
            &mut self.anim,
        );
    }

    fn run(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    fn leaf(&self) -> &str {
        self.machine.leaf_name().unwrap_or("")
    }

    fn planar_speed(&self) -> f32 {
        let vel = self.body.velocity();
        Vec2::new(vel.x, vel.z).length()
    }

    fn changes(&self) -> Vec<String> {
        self.changes.lock().unwrap().clone()
    }
}

fn forward() -> Vec2 {
    Vec2::new(0.0, 1.0)
}

#[test]
fn locomotion_cycle_idle_walk_run_idle() {
    let script = ScriptedInput::new([
        (10, InputFrame::default()),
        (60, InputFrame::move_dir(forward())),
        (60, InputFrame::move_dir(forward()).with_run()),
    ]);
    let mut harness = Harness::new(script, Vec3::ZERO);

    harness.run(10);
    assert_eq!(harness.leaf(), "Idle");

    harness.run(60);
    assert_eq!(harness.leaf(), "Walk");
    let walk_speed = harness.planar_speed();
    assert!((walk_speed - WALK_SPEED).abs() < 0.1);

    // One tick into Run the walk momentum is still there; the swap never
    // resets velocity because Locomotion itself stays active.
    harness.tick();
    assert_eq!(harness.leaf(), "Run");
    assert!(harness.planar_speed() >= walk_speed - 0.2);

    harness.run(59);
    assert!((harness.planar_speed() - RUN_SPEED).abs() < 0.1);

    // Script over: stick returns to neutral, actor settles.
    harness.run(60);
    assert_eq!(harness.leaf(), "Idle");
    assert!(harness.planar_speed() < 0.05);

    assert_eq!(harness.changes(), ["Idle", "Walk", "Run", "Idle"]);

    // Leaf enter clips in order, with stride footsteps in between and no
    // landing clips because the actor never left the ground.
    let clips: Vec<&str> = harness
        .anim
        .history()
        .iter()
        .map(String::as_str)
        .filter(|clip| *clip != "footstep")
        .collect();
    assert_eq!(clips, ["idle", "walk", "run", "idle"]);
    assert!(harness.anim.count_of("footstep") > 3);
    assert!(harness.diag.is_empty());
}

#[test]
fn jump_arcs_through_fall_and_lands_back_in_walk() {
    let script = ScriptedInput::new([
        (30, InputFrame::move_dir(forward())),
        (20, InputFrame::move_dir(forward()).with_jump()),
        (90, InputFrame::move_dir(forward())),
    ]);
    let mut harness = Harness::new(script, Vec3::ZERO);

    harness.run(31);
    assert_eq!(harness.leaf(), "Jump");
    // Aiming stays live mid-air: the root look state never exited.
    assert!(harness.machine.is_active("FreeLook"));
    assert!(!harness.machine.is_active("Locomotion"));

    harness.run(200);
    assert_eq!(harness.leaf(), "Idle");
    assert!(harness.body.is_grounded());
    assert!((harness.body.position().y).abs() < 1e-3);

    assert_eq!(
        harness.changes(),
        ["Idle", "Walk", "Jump", "Fall", "Walk", "Idle"]
    );

    // A normal jump comes down well under the hard-landing speed.
    assert_eq!(harness.anim.count_of("land_soft"), 1);
    assert_eq!(harness.anim.count_of("land_hard"), 0);
    assert_eq!(harness.anim.count_of("jump"), 1);
    assert_eq!(harness.anim.count_of("fall"), 1);
    assert!(harness.diag.is_empty());
}

#[test]
fn spawning_in_the_air_falls_and_lands_hard() {
    let mut harness = Harness::new(ScriptedInput::idle(), Vec3::new(0.0, 6.0, 0.0));

    // First decision reclassifies the airborne spawn as falling.
    harness.tick();
    assert_eq!(harness.leaf(), "Fall");

    harness.run(120);
    assert_eq!(harness.leaf(), "Idle");
    assert!(harness.body.is_grounded());

    assert_eq!(harness.changes(), ["Idle", "Fall", "Idle"]);
    // Six meters of free fall crosses the hard-landing speed.
    assert_eq!(harness.anim.count_of("land_hard"), 1);
    assert!(harness.diag.is_empty());
}

#[test]
fn walking_off_a_ledge_falls_without_a_jump() {
    let script = ScriptedInput::new([(300, InputFrame::move_dir(forward()))]);
    let mut harness = Harness::new(script, Vec3::ZERO);

    harness.run(30);
    assert_eq!(harness.leaf(), "Walk");

    // The floor drops out from underneath, as at a ledge edge.
    harness.body.set_floor_height(-3.0);
    harness.run(120);

    assert_eq!(harness.leaf(), "Walk");
    assert!((harness.body.position().y - -3.0).abs() < 1e-3);
    assert_eq!(harness.changes(), ["Idle", "Walk", "Fall", "Walk"]);
    assert!(harness.diag.is_empty());
}

#[test]
fn crouch_caps_speed_and_releases_cleanly() {
    let script = ScriptedInput::new([
        (40, InputFrame::move_dir(forward())),
        (60, InputFrame::move_dir(forward()).with_crouch()),
        (40, InputFrame::move_dir(forward())),
    ]);
    let mut harness = Harness::new(script, Vec3::ZERO);

    harness.run(100);
    assert_eq!(harness.leaf(), "Crouch");
    assert!((harness.planar_speed() - CROUCH_SPEED).abs() < 0.1);

    harness.run(40);
    assert_eq!(harness.leaf(), "Walk");

    assert_eq!(harness.changes(), ["Idle", "Walk", "Crouch", "Walk"]);
    assert!(harness.diag.is_empty());
}

#[test]
fn waypoint_bot_runs_in_walks_up_and_stops() {
    use strider::ai::WaypointInput;

    let route = WaypointInput::one_shot(vec![Vec3::new(10.0, 0.0, 0.0)]);
    let mut harness = Harness::new(route, Vec3::ZERO);

    harness.run(400);

    assert!(harness.input.finished());
    assert_eq!(harness.leaf(), "Idle");
    assert!(harness.planar_speed() < 0.05);

    let landed_at = harness.body.position();
    assert!(
        (landed_at - Vec3::new(10.0, 0.0, 0.0)).length() < 1.0,
        "stopped at {landed_at:?}"
    );

    // Far target approached at a run, finished at a walk, then parked.
    assert_eq!(harness.changes(), ["Idle", "Run", "Walk", "Idle"]);
    assert!(harness.diag.is_empty());
}

#[test]
fn footsteps_keep_cadence_across_pace_changes() {
    let script = ScriptedInput::new([
        (60, InputFrame::move_dir(forward())),
        (60, InputFrame::move_dir(forward()).with_run()),
    ]);
    let mut harness = Harness::new(script, Vec3::ZERO);

    harness.run(120);

    // Roughly 15 m of ground covered at a 1.8 m stride.
    let steps = harness.anim.count_of("footstep");
    assert!((6..=10).contains(&steps), "footsteps: {steps}");
}
