use glam::Vec3;

/// Downward acceleration in m/s². Matches the world gravity the physics
/// layer applies to free bodies.
const GRAVITY: f32 = 9.81;

/// The actor's physical proxy. States read ground contact, steer by writing
/// velocity, and ask the body to integrate once per physics tick; everything
/// about collision resolution stays behind this trait.
pub trait ActorBody: Send + Sync {
    fn is_grounded(&self) -> bool;
    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);
    fn position(&self) -> Vec3;
    /// Advance by the current velocity for one fixed step and refresh
    /// ground contact. Exactly one caller per physics tick.
    fn integrate(&mut self, dt: f32);
    /// Gravity magnitude in m/s², for impulse math like jump strength.
    fn gravity(&self) -> f32;
}

// ---------------------------------------------------------------------------
// Flat-floor kinematic body
// ---------------------------------------------------------------------------

/// Kinematic body over an infinite flat floor. Enough collision response for
/// locomotion work: falls clamp to the floor, ground contact is the clamp
/// itself. Lowering the floor under the actor is how scenarios fake a ledge.
pub struct KinematicBody {
    position: Vec3,
    velocity: Vec3,
    grounded: bool,
    floor_height: f32,
    gravity: f32,
}

impl KinematicBody {
    pub fn new(position: Vec3) -> Self {
        Self::with_floor(position, 0.0)
    }

    pub fn with_floor(position: Vec3, floor_height: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            grounded: position.y <= floor_height,
            floor_height,
            gravity: GRAVITY,
        }
    }

    pub fn floor_height(&self) -> f32 {
        self.floor_height
    }

    pub fn set_floor_height(&mut self, height: f32) {
        self.floor_height = height;
    }
}

impl ActorBody for KinematicBody {
    fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn integrate(&mut self, dt: f32) {
        self.position += self.velocity * dt;

        if self.position.y <= self.floor_height {
            self.position.y = self.floor_height;
            if self.velocity.y < 0.0 {
                self.velocity.y = 0.0;
            }
            self.grounded = true;
        } else {
            self.grounded = false;
        }
    }

    fn gravity(&self) -> f32 {
        self.gravity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn starts_grounded_on_the_floor() {
        let body = KinematicBody::new(Vec3::ZERO);
        assert!(body.is_grounded());
    }

    #[test]
    fn integrate_moves_by_velocity() {
        let mut body = KinematicBody::new(Vec3::ZERO);
        body.set_velocity(Vec3::new(2.0, 0.0, -1.0));
        body.integrate(0.5);
        assert_relative_eq!(body.position().x, 1.0);
        assert_relative_eq!(body.position().z, -0.5);
    }

    #[test]
    fn upward_velocity_leaves_the_ground() {
        let mut body = KinematicBody::new(Vec3::ZERO);
        body.set_velocity(Vec3::new(0.0, 5.0, 0.0));
        body.integrate(1.0 / 60.0);
        assert!(!body.is_grounded());
        assert!(body.position().y > 0.0);
    }

    #[test]
    fn falls_clamp_to_the_floor() {
        let mut body = KinematicBody::new(Vec3::new(0.0, 0.05, 0.0));
        body.set_velocity(Vec3::new(0.0, -10.0, 0.0));
        body.integrate(1.0 / 60.0);
        assert!(body.is_grounded());
        assert_relative_eq!(body.position().y, 0.0);
        assert_relative_eq!(body.velocity().y, 0.0);
    }

    #[test]
    fn lowering_the_floor_drops_ground_contact() {
        let mut body = KinematicBody::new(Vec3::ZERO);
        assert!(body.is_grounded());
        body.set_floor_height(-3.0);
        body.set_velocity(Vec3::new(0.0, -0.5, 0.0));
        body.integrate(1.0 / 60.0);
        assert!(!body.is_grounded());
    }
}
