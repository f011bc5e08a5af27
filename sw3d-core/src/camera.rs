/// Free-look camera state
use nalgebra::{Matrix4, Point3, Vector3};

use crate::transform;

/// Camera position and orientation, mutated by the host's input loop
/// once per frame and read by the pipeline when building the view
/// matrix.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Point3<f32>,
    /// Heading about the world Y axis, radians
    pub yaw: f32,
    /// Elevation about the camera X axis, radians; positive looks down
    pub pitch: f32,
}

impl Camera {
    const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

    pub fn new(position: Point3<f32>) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Unit look direction derived from yaw and pitch. With both zero
    /// the camera faces +z.
    pub fn look_dir(&self) -> Vector3<f32> {
        let m = transform::rotation_y(self.yaw) * transform::rotation_x(self.pitch);
        let h = transform::transform_point(&m, &Point3::new(0.0, 0.0, 1.0));
        Vector3::new(h.x, h.y, h.z)
    }

    /// View matrix: the fast inverse of the camera's point-at matrix.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let target = self.position + self.look_dir();
        let camera = transform::point_at(&self.position, &target, &Vector3::y());
        transform::quick_inverse(&camera)
    }

    /// Move along the current look direction (negative = backward).
    pub fn advance(&mut self, dist: f32) {
        self.position += self.look_dir() * dist;
    }

    /// Move along the horizontal right vector (negative = left).
    pub fn strafe(&mut self, dist: f32) {
        let dir = self.look_dir();
        let right = Vector3::y().cross(&Vector3::new(dir.x, 0.0, dir.z).normalize());
        self.position += right * dist;
    }

    /// Move along the world up axis (negative = down).
    pub fn rise(&mut self, dist: f32) {
        self.position.y += dist;
    }

    /// Apply yaw/pitch deltas; pitch is clamped short of straight up or
    /// down so the up vector never degenerates.
    pub fn turn(&mut self, dyaw: f32, dpitch: f32) {
        self.yaw += dyaw;
        self.pitch = (self.pitch + dpitch).clamp(-Self::MAX_PITCH, Self::MAX_PITCH);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Point3::origin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_default_faces_positive_z() {
        let cam = Camera::default();
        assert!((cam.look_dir() - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_yaw_quarter_turn_faces_positive_x() {
        let mut cam = Camera::default();
        cam.turn(FRAC_PI_2, 0.0);
        assert!((cam.look_dir() - Vector3::new(1.0, 0.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut cam = Camera::default();
        cam.turn(0.0, PI);
        assert!(cam.pitch < FRAC_PI_2);
        cam.turn(0.0, -2.0 * PI);
        assert!(cam.pitch > -FRAC_PI_2);
    }

    #[test]
    fn test_view_matrix_moves_world_opposite_to_camera() {
        // Camera at (0,0,-5) facing +z: the origin lands 5 units down
        // the view-space z axis.
        let cam = Camera::new(Point3::new(0.0, 0.0, -5.0));
        let view = cam.view_matrix();
        let h = transform::transform_point(&view, &Point3::origin());
        let p = transform::perspective_divide(&h);
        assert!((p - Point3::new(0.0, 0.0, 5.0)).norm() < 1e-5);
    }

    #[test]
    fn test_advance_moves_along_look_dir() {
        let mut cam = Camera::new(Point3::new(1.0, 2.0, 3.0));
        cam.advance(2.0);
        assert!((cam.position - Point3::new(1.0, 2.0, 5.0)).norm() < 1e-6);
    }

    #[test]
    fn test_strafe_stays_horizontal() {
        let mut cam = Camera::default();
        cam.turn(0.3, -0.4);
        let y = cam.position.y;
        cam.strafe(1.5);
        assert!((cam.position.y - y).abs() < 1e-6);
    }
}
