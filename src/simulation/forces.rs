//! Force helpers used by the body variants
//!
//! Radial forces are built from the unit direction of the current position.
//! At the exact origin that direction is undefined, so the force is zero
//! rather than NaN.

use super::states::{NQuat, NVec3};

/// Below this length a position counts as the origin
pub const MIN_RADIAL_LENGTH: f64 = 1e-12;

/// `normalize(position) * magnitude`, zero at the origin.
/// A negative magnitude pulls toward the origin.
pub fn radial_force(position: &NVec3, magnitude: f64) -> NVec3 {
    let len = position.norm();
    if !len.is_finite() || len < MIN_RADIAL_LENGTH {
        return NVec3::zeros();
    }
    position * (magnitude / len)
}

/// Pull of a damped sphere: `-pull * radius` along the radial direction
pub fn damped_pull(position: &NVec3, radius: f64, pull: f64) -> NVec3 {
    radial_force(position, -pull * radius)
}

/// Rotation from Euler angles applied in X, then Y, then Z order (intrinsic)
pub fn quat_from_euler_xyz(rotation: [f64; 3]) -> NQuat {
    let qx = NQuat::from_axis_angle(&NVec3::x_axis(), rotation[0]);
    let qy = NQuat::from_axis_angle(&NVec3::y_axis(), rotation[1]);
    let qz = NQuat::from_axis_angle(&NVec3::z_axis(), rotation[2]);
    qx * qy * qz
}
