use glam::{Vec2, Vec3};

/// First-person look rig. Owns view orientation only; the body it sits on
/// owns position. Yaw and pitch are degrees, with pitch clamped just short
/// of the poles so the forward vector never degenerates.
pub struct CameraRig {
    pub yaw: f32,
    pub pitch: f32,
    pub sensitivity: f32,
}

impl CameraRig {
    pub fn new() -> Self {
        Self {
            yaw: -90.0_f32,
            pitch: 0.0,
            sensitivity: 0.1,
        }
    }

    /// Apply one tick of look input (mouse deltas or stick deflection).
    pub fn look(&mut self, delta: Vec2) {
        self.yaw += delta.x * self.sensitivity;
        self.pitch -= delta.y * self.sensitivity;
        self.pitch = self.pitch.clamp(-89.0, 89.0);
    }

    /// Full 3D view direction, pitch included.
    pub fn forward(&self) -> Vec3 {
        let yaw_rad = self.yaw.to_radians();
        let pitch_rad = self.pitch.to_radians();
        Vec3::new(
            yaw_rad.cos() * pitch_rad.cos(),
            pitch_rad.sin(),
            yaw_rad.sin() * pitch_rad.cos(),
        )
        .normalize()
    }

    /// Planar `(forward, right)` basis on the XZ plane. Movement ignores
    /// pitch so looking at the floor never slows the actor down.
    pub fn movement_basis(&self) -> (Vec3, Vec3) {
        let yaw_rad = self.yaw.to_radians();
        let forward = Vec3::new(yaw_rad.cos(), 0.0, yaw_rad.sin()).normalize();
        let right = forward.cross(Vec3::Y).normalize();
        (forward, right)
    }

    /// Map a stick-space movement vector (+y forward, +x right) into a world
    /// direction on the XZ plane. Unit input gives a unit direction.
    pub fn direction_from_input(&self, movement: Vec2) -> Vec3 {
        let (forward, right) = self.movement_basis();
        let dir = forward * movement.y + right * movement.x;
        dir.normalize_or_zero()
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pitch_clamps_short_of_the_poles() {
        let mut rig = CameraRig::new();
        rig.look(Vec2::new(0.0, -10_000.0));
        assert_relative_eq!(rig.pitch, 89.0);
        rig.look(Vec2::new(0.0, 10_000.0));
        assert_relative_eq!(rig.pitch, -89.0);
    }

    #[test]
    fn movement_basis_is_planar_and_orthogonal() {
        let mut rig = CameraRig::new();
        rig.look(Vec2::new(300.0, 40.0));
        let (forward, right) = rig.movement_basis();
        assert_relative_eq!(forward.y, 0.0);
        assert_relative_eq!(right.y, 0.0);
        assert_relative_eq!(forward.dot(right), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn default_yaw_pushes_forward_along_negative_z() {
        let rig = CameraRig::new();
        let dir = rig.direction_from_input(Vec2::new(0.0, 1.0));
        assert_relative_eq!(dir.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(dir.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn strafe_input_maps_to_camera_right() {
        let rig = CameraRig::new();
        let dir = rig.direction_from_input(Vec2::new(1.0, 0.0));
        assert_relative_eq!(dir.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(dir.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn looking_down_does_not_shrink_movement() {
        let mut rig = CameraRig::new();
        rig.look(Vec2::new(0.0, 890.0));
        let dir = rig.direction_from_input(Vec2::new(0.0, 1.0));
        assert_relative_eq!(dir.length(), 1.0, epsilon = 1e-6);
    }
}
