use glam::{Vec2, Vec3};

use crate::engine::input::{ActorPose, InputSource};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Planar distance at which a waypoint counts as reached.
const ARRIVE_RADIUS: f32 = 0.75;
/// Waypoints farther than this are approached at a run.
const RUN_DISTANCE: f32 = 8.0;

/// Steers an actor along a fixed route by synthesizing stick input.
///
/// This is deliberately just another [`InputSource`]: the bot and the
/// player share the controller, the state tree, and the movement code,
/// so route logic can never reach into the hierarchy.
pub struct WaypointInput {
    route: Vec<Vec3>,
    next: usize,
    looping: bool,
    movement: Vec2,
    run: bool,
}

impl WaypointInput {
    /// Visit each waypoint once, then stand still.
    pub fn one_shot(route: Vec<Vec3>) -> Self {
        Self {
            route,
            next: 0,
            looping: false,
            movement: Vec2::ZERO,
            run: false,
        }
    }

    /// Cycle the route forever.
    pub fn patrol(route: Vec<Vec3>) -> Self {
        Self {
            looping: true,
            ..Self::one_shot(route)
        }
    }

    pub fn current_target(&self) -> Option<Vec3> {
        self.route.get(self.next).copied()
    }

    pub fn finished(&self) -> bool {
        !self.looping && self.next >= self.route.len()
    }
}

impl InputSource for WaypointInput {
    fn begin_frame(&mut self, pose: &ActorPose) {
        self.movement = Vec2::ZERO;
        self.run = false;

        let Some(target) = self.current_target() else {
            return;
        };

        let to_target = Vec2::new(target.x - pose.position.x, target.z - pose.position.z);
        let dist = to_target.length();
        if dist <= ARRIVE_RADIUS {
            self.next += 1;
            if self.looping && self.next >= self.route.len() {
                self.next = 0;
            }
            // Stand for this tick; next frame steers at the new target.
            return;
        }

        // World direction back into stick space for the actor's view yaw,
        // the inverse of the camera's direction_from_input mapping.
        let yaw_rad = pose.yaw.to_radians();
        let (sin, cos) = yaw_rad.sin_cos();
        let dir_x = to_target.x / dist;
        let dir_z = to_target.y / dist;
        self.movement = Vec2::new(
            -dir_x * sin + dir_z * cos,
            dir_x * cos + dir_z * sin,
        );
        self.run = dist > RUN_DISTANCE;
    }

    fn movement(&self) -> Vec2 {
        self.movement
    }

    fn look(&self) -> Vec2 {
        Vec2::ZERO
    }

    fn jump_pressed(&self) -> bool {
        false
    }

    fn jump_held(&self) -> bool {
        false
    }

    fn attack_pressed(&self) -> bool {
        false
    }

    fn crouch_held(&self) -> bool {
        false
    }

    fn run_held(&self) -> bool {
        self.run
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn pose_at(position: Vec3) -> ActorPose {
        ActorPose {
            position,
            yaw: -90.0,
            grounded: true,
        }
    }

    #[test]
    fn steers_toward_the_waypoint_in_stick_space() {
        // Default view yaw faces -Z, so +X is to the actor's right.
        let mut input = WaypointInput::one_shot(vec![Vec3::new(10.0, 0.0, 0.0)]);
        input.begin_frame(&pose_at(Vec3::ZERO));

        assert_relative_eq!(input.movement().x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(input.movement().y, 0.0, epsilon = 1e-5);
        assert!(input.run_held());
        assert_relative_eq!(input.movement_magnitude(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn walks_once_the_waypoint_is_near() {
        let mut input = WaypointInput::one_shot(vec![Vec3::new(3.0, 0.0, 0.0)]);
        input.begin_frame(&pose_at(Vec3::ZERO));
        assert!(!input.run_held());
        assert!(input.movement_magnitude() > 0.9);
    }

    #[test]
    fn arrival_advances_and_one_shot_finishes() {
        let mut input = WaypointInput::one_shot(vec![Vec3::new(5.0, 0.0, 0.0)]);
        input.begin_frame(&pose_at(Vec3::new(4.6, 0.0, 0.0)));

        assert_eq!(input.movement(), Vec2::ZERO);
        assert!(input.finished());
        assert_eq!(input.current_target(), None);

        input.begin_frame(&pose_at(Vec3::new(4.6, 0.0, 0.0)));
        assert_eq!(input.movement(), Vec2::ZERO);
    }

    #[test]
    fn patrol_wraps_back_to_the_first_waypoint() {
        let a = Vec3::new(5.0, 0.0, 0.0);
        let b = Vec3::new(5.0, 0.0, 5.0);
        let mut input = WaypointInput::patrol(vec![a, b]);

        input.begin_frame(&pose_at(a));
        assert_eq!(input.current_target(), Some(b));
        input.begin_frame(&pose_at(b));
        assert_eq!(input.current_target(), Some(a));
        assert!(!input.finished());
    }

    #[test]
    fn steering_respects_view_yaw() {
        // Facing +X: a waypoint straight ahead is pure forward stick.
        let mut input = WaypointInput::one_shot(vec![Vec3::new(10.0, 0.0, 0.0)]);
        input.begin_frame(&ActorPose {
            position: Vec3::ZERO,
            yaw: 0.0,
            grounded: true,
        });

        assert_relative_eq!(input.movement().x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(input.movement().y, 1.0, epsilon = 1e-5);
    }
}
