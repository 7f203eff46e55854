use std::sync::Arc;

use clap::{Parser, ValueEnum};
use env_logger::{Builder, Env};
use glam::{Vec2, Vec3};
use hecs::World;
use log::{info, LevelFilter};

use strider::actor::{spawn_actor, ActorName};
use strider::ai::WaypointInput;
use strider::camera::CameraRig;
use strider::engine::anim::AnimationSink;
use strider::engine::body::{ActorBody, KinematicBody};
use strider::engine::input::{InputFrame, ScriptedInput};
use strider::fsm::{Diagnostics, LogDiagnostics, StateMachine};
use strider::systems::{actor_physics_system, actor_update_system};

const TICK_DT: f32 = 1.0 / 60.0;

#[derive(Parser)]
#[command(name = "strider", about = "Headless actor locomotion sandbox")]
struct Args {
    /// Number of fixed 60 Hz ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u32,
    /// What to simulate
    #[arg(long, value_enum, default_value = "showcase")]
    scenario: Scenario,
    /// Log state changes and clip triggers
    #[arg(long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Scenario {
    /// One scripted actor touring walk, run, jump, and crouch
    Showcase,
    /// Two waypoint bots walking fixed routes
    Patrol,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let env = Env::default().default_filter_or(level.to_string());
    // Ignore re-init failures so the binary can be embedded in harnesses
    // that already installed a logger.
    let _ = Builder::from_env(env).try_init();
}

/// Animation endpoint for the demo: every clip trigger becomes a log line.
struct LogAnimation {
    actor: String,
}

impl AnimationSink for LogAnimation {
    fn play(&mut self, clip: &str) {
        info!("[{}] clip: {clip}", self.actor);
    }
}

fn log_anim(actor: &str) -> Box<LogAnimation> {
    Box::new(LogAnimation {
        actor: actor.to_owned(),
    })
}

fn showcase_script() -> ScriptedInput {
    let fwd = Vec2::new(0.0, 1.0);
    ScriptedInput::new([
        (30, InputFrame::default()),
        (90, InputFrame::move_dir(fwd)),
        (60, InputFrame::move_dir(fwd).with_look(Vec2::new(2.0, 0.0))),
        (90, InputFrame::move_dir(fwd).with_run()),
        (20, InputFrame::move_dir(fwd).with_jump()),
        (70, InputFrame::move_dir(fwd)),
        (60, InputFrame::move_dir(fwd).with_crouch()),
        (30, InputFrame::default()),
    ])
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut world = World::new();
    let diag: Arc<dyn Diagnostics> = Arc::new(LogDiagnostics);

    match args.scenario {
        Scenario::Showcase => {
            spawn_actor(
                &mut world,
                "hero",
                Vec3::ZERO,
                Box::new(showcase_script()),
                log_anim("hero"),
                Arc::clone(&diag),
            )
            .expect("valid state tree");
        }
        Scenario::Patrol => {
            let square = vec![
                Vec3::new(12.0, 0.0, 0.0),
                Vec3::new(12.0, 0.0, 12.0),
                Vec3::new(0.0, 0.0, 12.0),
                Vec3::ZERO,
            ];
            spawn_actor(
                &mut world,
                "bot-a",
                Vec3::ZERO,
                Box::new(WaypointInput::patrol(square)),
                log_anim("bot-a"),
                Arc::clone(&diag),
            )
            .expect("valid state tree");

            let line = vec![Vec3::new(-20.0, 0.0, 4.0), Vec3::new(-4.0, 0.0, 4.0)];
            spawn_actor(
                &mut world,
                "bot-b",
                Vec3::new(-4.0, 0.0, 4.0),
                Box::new(WaypointInput::patrol(line)),
                log_anim("bot-b"),
                Arc::clone(&diag),
            )
            .expect("valid state tree");
        }
    }

    info!("simulating {} ticks at 60 Hz", args.ticks);
    for _ in 0..args.ticks {
        actor_update_system(&mut world, TICK_DT);
        actor_physics_system(&mut world, TICK_DT);
    }

    for (_entity, (name, machine, body, rig)) in
        world.query_mut::<(&ActorName, &StateMachine, &KinematicBody, &CameraRig)>()
    {
        let path: Vec<&str> = machine
            .active_path()
            .iter()
            .map(|&id| machine.name_of(id))
            .collect();
        let pos = body.position();
        let view = rig.forward();
        info!(
            "[{}] finished in {} at ({:.1}, {:.1}, {:.1}) looking ({:.2}, {:.2}, {:.2})",
            name.0,
            path.join("/"),
            pos.x,
            pos.y,
            pos.z,
            view.x,
            view.y,
            view.z
        );
    }
}
