use std::collections::VecDeque;

use glam::{Vec2, Vec3};

/// Where the actor is at the start of a tick, as seen by its input source.
/// Scripted sources ignore it; steering sources (patrol routes) read it to
/// decide where to push the stick.
#[derive(Debug, Clone, Copy)]
pub struct ActorPose {
    pub position: Vec3,
    /// View yaw in degrees, matching [`crate::camera::CameraRig::yaw`].
    pub yaw: f32,
    pub grounded: bool,
}

/// One tick of raw commands. All booleans are level-triggered; edge
/// detection happens inside the source that latches consecutive frames.
///
/// `movement` is stick-space: +y pushes toward the camera's planar forward,
/// +x strafes right. Sources keep it within unit length.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    pub movement: Vec2,
    pub look: Vec2,
    pub jump: bool,
    pub attack: bool,
    pub crouch: bool,
    pub run: bool,
}

impl InputFrame {
    pub fn move_dir(movement: Vec2) -> Self {
        Self {
            movement,
            ..Self::default()
        }
    }

    pub fn with_look(mut self, look: Vec2) -> Self {
        self.look = look;
        self
    }

    pub fn with_jump(mut self) -> Self {
        self.jump = true;
        self
    }

    pub fn with_attack(mut self) -> Self {
        self.attack = true;
        self
    }

    pub fn with_run(mut self) -> Self {
        self.run = true;
        self
    }

    pub fn with_crouch(mut self) -> Self {
        self.crouch = true;
        self
    }
}

/// Command feed for one actor. The driver calls [`begin_frame`] exactly once
/// per tick, before any state or controller code runs; every query below is
/// stable for the rest of that tick.
///
/// [`begin_frame`]: InputSource::begin_frame
pub trait InputSource: Send + Sync {
    /// Latch the next frame of commands. Edge queries compare against the
    /// frame latched by the previous call.
    fn begin_frame(&mut self, pose: &ActorPose);

    fn movement(&self) -> Vec2;
    fn look(&self) -> Vec2;

    /// True only on the tick jump went from released to held.
    fn jump_pressed(&self) -> bool;
    fn jump_held(&self) -> bool;
    /// True only on the tick attack went from released to held.
    fn attack_pressed(&self) -> bool;
    fn crouch_held(&self) -> bool;
    fn run_held(&self) -> bool;

    /// Stick deflection in `[0, 1]` for sources that normalize their input.
    fn movement_magnitude(&self) -> f32 {
        self.movement().length()
    }
}

// ---------------------------------------------------------------------------
// Scripted input
// ---------------------------------------------------------------------------

/// Plays back a fixed command script: a queue of `(ticks, frame)` steps.
/// Once the script runs out it keeps producing neutral frames, so the actor
/// settles instead of repeating its last command.
pub struct ScriptedInput {
    steps: VecDeque<(u32, InputFrame)>,
    current: InputFrame,
    previous: InputFrame,
}

impl ScriptedInput {
    pub fn new(steps: impl IntoIterator<Item = (u32, InputFrame)>) -> Self {
        Self {
            steps: steps.into_iter().filter(|(ticks, _)| *ticks > 0).collect(),
            current: InputFrame::default(),
            previous: InputFrame::default(),
        }
    }

    /// A script that never presses anything.
    pub fn idle() -> Self {
        Self::new([])
    }

    pub fn finished(&self) -> bool {
        self.steps.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn begin_frame(&mut self, _pose: &ActorPose) {
        self.previous = self.current;
        self.current = match self.steps.front_mut() {
            Some((remaining, frame)) => {
                let frame = *frame;
                *remaining -= 1;
                if *remaining == 0 {
                    self.steps.pop_front();
                }
                frame
            }
            None => InputFrame::default(),
        };
    }

    fn movement(&self) -> Vec2 {
        self.current.movement
    }

    fn look(&self) -> Vec2 {
        self.current.look
    }

    fn jump_pressed(&self) -> bool {
        self.current.jump && !self.previous.jump
    }

    fn jump_held(&self) -> bool {
        self.current.jump
    }

    fn attack_pressed(&self) -> bool {
        self.current.attack && !self.previous.attack
    }

    fn crouch_held(&self) -> bool {
        self.current.crouch
    }

    fn run_held(&self) -> bool {
        self.current.run
    }
}
