//! Perspective camera with explicitly refreshed matrices.
//!
//! Right-handed, looks down its local -Z like a GL camera. Changing
//! `position`, `target` or `up` has no effect on projection until
//! `update_matrix_world` is called; changing `fov`, `aspect`, `near` or
//! `far` needs `update_projection_matrix`.

use nalgebra::{Isometry3, Perspective3, Point3};

use crate::simulation::states::NVec3;

#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    pub position: NVec3,
    pub target: NVec3,
    pub up: NVec3,
    pub fov: f64, // vertical, degrees
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    matrix_world: Isometry3<f64>,
    projection: Perspective3<f64>,
}

impl PerspectiveCamera {
    pub fn new(fov: f64, aspect: f64, near: f64, far: f64) -> Self {
        let mut camera = Self {
            position: NVec3::zeros(),
            target: NVec3::new(0.0, 0.0, -1.0),
            up: NVec3::y(),
            fov,
            aspect,
            near,
            far,
            matrix_world: Isometry3::identity(),
            projection: Perspective3::new(1.0, fov.to_radians(), near, far),
        };
        camera.update_projection_matrix();
        camera.update_matrix_world();
        camera
    }

    pub fn with_position(mut self, position: NVec3) -> Self {
        self.position = position;
        self.update_matrix_world();
        self
    }

    /// Aim at `target` and refresh the world matrix
    pub fn look_at(&mut self, target: NVec3) {
        self.target = target;
        self.update_matrix_world();
    }

    pub fn update_matrix_world(&mut self) {
        let mut forward = self.target - self.position;
        if forward.norm_squared() < 1e-24 {
            forward = -NVec3::z();
        }
        let eye = Point3::from(self.position);
        let target = eye + forward;
        // Degenerate when looking straight along `up`
        let up = if forward.cross(&self.up).norm_squared() < 1e-24 {
            NVec3::z()
        } else {
            self.up
        };
        let view = Isometry3::look_at_rh(&eye, &target, &up);
        self.matrix_world = view.inverse();
    }

    pub fn update_projection_matrix(&mut self) {
        let aspect = if self.aspect > 0.0 { self.aspect } else { 1.0 };
        self.projection = Perspective3::new(aspect, self.fov.to_radians(), self.near, self.far);
    }

    /// Camera-to-world transform as of the last refresh
    pub fn matrix_world(&self) -> &Isometry3<f64> {
        &self.matrix_world
    }

    pub fn projection(&self) -> &Perspective3<f64> {
        &self.projection
    }

    /// Camera position taken from the world matrix
    pub fn world_position(&self) -> NVec3 {
        self.matrix_world.translation.vector
    }

    /// Normalized device coordinates (each in [-1, 1]) to a world-space point
    pub fn unproject(&self, ndc: &NVec3) -> NVec3 {
        let view_point = self.projection.unproject_point(&Point3::from(*ndc));
        self.matrix_world.transform_point(&view_point).coords
    }

    /// World-space point to normalized device coordinates
    pub fn project(&self, world: &NVec3) -> NVec3 {
        let view_point = self.matrix_world.inverse_transform_point(&Point3::from(*world));
        self.projection.project_point(&view_point).coords
    }
}

/// GL-style smoothstep of `x` between `edge0` and `edge1`
pub fn smoothstep(x: f64, edge0: f64, edge1: f64) -> f64 {
    if x <= edge0 {
        return 0.0;
    }
    if x >= edge1 {
        return 1.0;
    }
    let t = (x - edge0) / (edge1 - edge0);
    t * t * (3.0 - 2.0 * t)
}

/// Camera distance for a viewport width: 5 on narrow screens, 3 on wide ones
pub fn camera_distance_for_width(width: f64) -> f64 {
    let z = 1.0 - smoothstep(width, 769.0, 1600.0);
    z * (5.0 - 3.0) + 3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(50.0, 16.0 / 9.0, 0.01, 100.0)
            .with_position(NVec3::new(0.0, 0.0, 3.0));
        camera.look_at(NVec3::zeros());
        camera
    }

    #[test]
    fn center_of_screen_unprojects_onto_view_axis() {
        let camera = camera();
        let p = camera.unproject(&NVec3::new(0.0, 0.0, 0.5));
        assert!(p.x.abs() < 1e-9 && p.y.abs() < 1e-9);
        assert!(p.z < 3.0);
    }

    #[test]
    fn project_inverts_unproject() {
        let camera = camera();
        let ndc = NVec3::new(0.3, -0.6, 0.2);
        let back = camera.project(&camera.unproject(&ndc));
        assert!((back - ndc).norm() < 1e-9);
    }

    #[test]
    fn world_position_follows_refresh() {
        let mut camera = camera();
        camera.position.z = 5.0;
        assert!((camera.world_position().z - 3.0).abs() < 1e-12);
        camera.update_matrix_world();
        assert!((camera.world_position().z - 5.0).abs() < 1e-12);
    }

    #[test]
    fn responsive_distance_spans_three_to_five() {
        assert_eq!(camera_distance_for_width(400.0), 5.0);
        assert_eq!(camera_distance_for_width(1920.0), 3.0);
        let mid = camera_distance_for_width(1184.5);
        assert!((mid - 4.0).abs() < 1e-9);
    }
}
