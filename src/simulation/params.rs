//! Tuning constants and runtime parameters for the simulation
//!
//! `Parameters` holds the settings the world and bodies actually run with:
//! - fixed step size and gravity,
//! - sphere mass, linear damping and pull constant,
//! - tracker radius and boundary plane spacing
//!
//! The constants below are tuning values, not physical units.

use super::states::NVec3;

/// Inward pull per unit of radius applied to every damped sphere each frame
pub const K_DAMPED_PULL: f64 = 30.0;

/// Fraction of linear velocity lost per second of simulated time
pub const LINEAR_DAMPING: f64 = 0.95;

/// Default fixed step (the usual 60 Hz frame)
pub const FIXED_TIMESTEP: f64 = 1.0 / 60.0;

/// Distance of each boundary plane from the origin along z
pub const BOUNDARY_HALF_SPACING: f64 = 0.7;

pub const DEFAULT_SPHERE_MASS: f64 = 1.0;
pub const DEFAULT_TRACKER_RADIUS: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub timestep: f64,        // fixed step dt
    pub gravity: NVec3,       // world gravity, zero for this scene
    pub sphere_mass: f64,     // mass of every damped sphere
    pub linear_damping: f64,  // velocity decay factor
    pub pull: f64,            // pull constant, scaled by radius
    pub tracker_radius: f64,  // kinematic sphere radius
    pub half_spacing: f64,    // boundary plane distance from origin
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            timestep: FIXED_TIMESTEP,
            gravity: NVec3::zeros(),
            sphere_mass: DEFAULT_SPHERE_MASS,
            linear_damping: LINEAR_DAMPING,
            pull: K_DAMPED_PULL,
            tracker_radius: DEFAULT_TRACKER_RADIUS,
            half_spacing: BOUNDARY_HALF_SPACING,
        }
    }
}
