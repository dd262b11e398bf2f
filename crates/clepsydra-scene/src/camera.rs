//! Orbit camera and cell projection for the depth scene.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;

/// Terminal cells are roughly twice as tall as they are wide.
pub const CELL_ASPECT: f32 = 2.0;

/// Lowest allowed pitch: polar angle of π/2.5 from the zenith.
pub const MIN_PITCH: f32 = FRAC_PI_2 - PI / 2.5;
/// Highest allowed pitch: polar angle of π/6 from the zenith.
pub const MAX_PITCH: f32 = FRAC_PI_2 - PI / 6.0;

const NEAR: f32 = 0.1;

/// A point projected onto the terminal grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Column, fractional.
    pub x: f32,
    /// Row, fractional.
    pub y: f32,
    /// Distance along the view direction.
    pub depth: f32,
    /// Straight-line distance from the eye.
    pub distance: f32,
}

/// Orbit camera looking at a fixed target. Zoom and pan are not offered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Elevation above the horizon in radians.
    pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitCamera {
    /// Camera at `(0, 5, 10)` looking at the origin with a 55° field of view.
    pub fn new() -> Self {
        let eye = Vec3::new(0.0, 5.0, 10.0);
        let distance = eye.length();
        Self {
            yaw: 0.0,
            pitch: (eye.y / distance).asin(),
            distance,
            target: Vec3::ZERO,
            fov_y: 55f32.to_radians(),
        }
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Rotate around the vertical axis.
    pub fn orbit(&mut self, delta_yaw: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(2.0 * PI);
    }

    /// Tilt up or down, staying within the allowed polar range.
    pub fn tilt(&mut self, delta_pitch: f32) {
        self.pitch = (self.pitch + delta_pitch).clamp(MIN_PITCH, MAX_PITCH);
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Forward, right and up unit vectors.
    fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.target - self.position()).normalize();
        let right = forward.cross(Vec3::Y).normalize();
        let up = right.cross(forward);
        (forward, right, up)
    }

    fn half_extents(&self, width: u16, height: u16) -> (f32, f32) {
        let tan_half = (self.fov_y * 0.5).tan();
        let aspect = width.max(1) as f32 / (height.max(1) as f32 * CELL_ASPECT);
        (tan_half * aspect, tan_half)
    }

    /// Project a world point onto a `width` x `height` grid.
    ///
    /// Returns `None` for points behind the near plane.
    pub fn project(&self, point: Vec3, width: u16, height: u16) -> Option<Projected> {
        let (forward, right, up) = self.basis();
        let (half_w, half_h) = self.half_extents(width, height);

        let v = point - self.position();
        let depth = v.dot(forward);
        if depth <= NEAR {
            return None;
        }
        let ndc_x = v.dot(right) / (depth * half_w);
        let ndc_y = v.dot(up) / (depth * half_h);

        Some(Projected {
            x: (ndc_x + 1.0) * 0.5 * width as f32,
            y: (1.0 - ndc_y) * 0.5 * height as f32,
            depth,
            distance: v.length(),
        })
    }

    /// Unit ray through the centre of cell `(col, row)`.
    pub fn ray(&self, col: u16, row: u16, width: u16, height: u16) -> Vec3 {
        let (forward, right, up) = self.basis();
        let (half_w, half_h) = self.half_extents(width, height);

        let ndc_x = (col as f32 + 0.5) / width.max(1) as f32 * 2.0 - 1.0;
        let ndc_y = 1.0 - (row as f32 + 0.5) / height.max(1) as f32 * 2.0;
        (forward + right * (ndc_x * half_w) + up * (ndc_y * half_h)).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_position() {
        let camera = OrbitCamera::new();
        let eye = camera.position();
        assert!((eye - Vec3::new(0.0, 5.0, 10.0)).length() < 1e-4);
        assert!(camera.pitch() >= MIN_PITCH && camera.pitch() <= MAX_PITCH);
    }

    #[test]
    fn test_target_projects_to_centre() {
        let camera = OrbitCamera::new();
        let p = camera.project(Vec3::ZERO, 80, 24).unwrap();
        assert!((p.x - 40.0).abs() < 1e-3);
        assert!((p.y - 12.0).abs() < 1e-3);
        assert!((p.depth - camera.distance).abs() < 1e-3);
    }

    #[test]
    fn test_points_behind_are_culled() {
        let camera = OrbitCamera::new();
        assert!(camera.project(Vec3::new(0.0, 10.0, 30.0), 80, 24).is_none());
    }

    #[test]
    fn test_up_is_up_on_screen() {
        let camera = OrbitCamera::new();
        let low = camera.project(Vec3::new(0.0, -1.0, 0.0), 80, 24).unwrap();
        let high = camera.project(Vec3::new(0.0, 1.0, 0.0), 80, 24).unwrap();
        assert!(high.y < low.y);
        let right = camera.project(Vec3::new(1.0, 0.0, 0.0), 80, 24).unwrap();
        assert!(right.x > 40.0);
    }

    #[test]
    fn test_tilt_is_clamped() {
        let mut camera = OrbitCamera::new();
        camera.tilt(10.0);
        assert_eq!(camera.pitch(), MAX_PITCH);
        camera.tilt(-10.0);
        assert_eq!(camera.pitch(), MIN_PITCH);
    }

    #[test]
    fn test_orbit_wraps() {
        let mut camera = OrbitCamera::new();
        camera.orbit(-0.5);
        assert!(camera.yaw > 0.0 && camera.yaw < 2.0 * PI);
        let eye = camera.position();
        assert!((eye.length() - camera.distance).abs() < 1e-3);
    }

    #[test]
    fn test_centre_ray_hits_target() {
        let camera = OrbitCamera::new();
        // An odd grid puts a cell centre exactly on the optical axis.
        let dir = camera.ray(40, 12, 81, 25);
        let to_target = (camera.target - camera.position()).normalize();
        assert!(dir.dot(to_target) > 0.9999);
    }
}
