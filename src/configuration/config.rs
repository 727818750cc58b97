//! Configuration types for loading scenes from YAML.
//!
//! A thin, `serde`-deserializable description of the scene. Every section
//! has defaults matching the stock scene, so an empty document is valid:
//!
//! - [`EngineConfig`]     – fixed step and gravity
//! - [`SpheresConfig`]    – sphere count, seeded layout, mass, damping, pull
//! - [`TrackerConfig`]    – radius of the pointer-driven sphere
//! - [`BoundaryConfig`]   – depth planes spacing and debug size
//! - [`CameraConfig`]     – simulation camera
//! - [`PointerConfig`]    – reference surface for pointer projection
//! - [`ViewportConfig`]   – initial offscreen target size
//! - [`SceneConfig`]      – top-level wrapper
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   timestep: 0.0166667     # fixed step, seconds
//!   gravity: [0.0, 0.0, 0.0]
//!
//! spheres:
//!   count: 12
//!   seed: 1                 # deterministic layout
//!   radius: [0.1, 0.4]      # seeded radius range
//!   position: [-1.0, 1.0]   # seeded range per axis
//!   mass: 1.0
//!   linear_damping: 0.95
//!   pull: 30.0              # inward pull per unit radius
//!   bodies:                 # optional, replaces the seeded layout
//!     - radius: 0.2
//!       position: [1.0, 0.0, 0.0]
//!
//! tracker:
//!   radius: 0.5
//!
//! boundaries:
//!   half_spacing: 0.7       # planes at z = +-0.7
//!   debug_size: [2.0, 2.0]
//!
//! camera:
//!   fov: 50.0
//!   near: 0.01
//!   far: 100.0
//!   position: [0.0, 0.0, 3.0]
//!
//! pointer:
//!   surface: sphere         # or "view_plane"
//!   reference_radius: 1.0
//!
//! viewport:
//!   width: 1280
//!   height: 720
//!
//! debug:
//!   visuals: true
//! ```

use serde::Deserialize;

use crate::error::{SimError, SimResult};
use crate::pointer::projector::ReferenceSurface;
use crate::simulation::params::{
    BOUNDARY_HALF_SPACING, DEFAULT_SPHERE_MASS, DEFAULT_TRACKER_RADIUS, FIXED_TIMESTEP, K_DAMPED_PULL,
    LINEAR_DAMPING,
};

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EngineConfig {
    pub timestep: f64,     // fixed physics step
    pub gravity: [f64; 3], // zero for this scene
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timestep: FIXED_TIMESTEP,
            gravity: [0.0; 3],
        }
    }
}

/// Explicit initial state of one sphere
#[derive(Deserialize, Debug, Clone)]
pub struct SphereBodyConfig {
    pub radius: f64,
    pub position: [f64; 3],
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SpheresConfig {
    pub count: usize,                  // number of seeded spheres
    pub seed: u64,                     // layout seed
    pub radius: [f64; 2],              // seeded radius range [min, max]
    pub position: [f64; 2],            // seeded position range per axis
    pub mass: f64,                     // every sphere
    pub linear_damping: f64,           // velocity decay
    pub pull: f64,                     // inward pull per unit radius
    pub bodies: Vec<SphereBodyConfig>, // overrides the seeded layout when non-empty
}

impl Default for SpheresConfig {
    fn default() -> Self {
        Self {
            count: 12,
            seed: 1,
            radius: [0.1, 0.4],
            position: [-1.0, 1.0],
            mass: DEFAULT_SPHERE_MASS,
            linear_damping: LINEAR_DAMPING,
            pull: K_DAMPED_PULL,
            bodies: Vec::new(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TrackerConfig {
    pub radius: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_TRACKER_RADIUS,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BoundaryConfig {
    pub half_spacing: f64,    // each plane's distance from the origin
    pub debug_size: [f64; 2], // debug plane width/height
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            half_spacing: BOUNDARY_HALF_SPACING,
            debug_size: [2.0, 2.0],
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct CameraConfig {
    pub fov: f64, // vertical, degrees
    pub near: f64,
    pub far: f64,
    pub position: [f64; 3], // always looks at the origin
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 50.0,
            near: 0.01,
            far: 100.0,
            position: [0.0, 0.0, 3.0],
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PointerConfig {
    pub surface: ReferenceSurface,
    pub reference_radius: f64,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            surface: ReferenceSurface::Sphere,
            reference_radius: 1.0,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct DebugConfig {
    pub visuals: bool, // attach wireframe proxies to every body
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self { visuals: true }
    }
}

/// Top-level scene configuration loaded from YAML
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct SceneConfig {
    pub engine: EngineConfig,
    pub spheres: SpheresConfig,
    pub tracker: TrackerConfig,
    pub boundaries: BoundaryConfig,
    pub camera: CameraConfig,
    pub pointer: PointerConfig,
    pub viewport: ViewportConfig,
    pub debug: DebugConfig,
}

fn invalid(msg: impl Into<String>) -> SimError {
    SimError::InvalidConfig(msg.into())
}

impl SceneConfig {
    pub fn from_yaml_str(text: &str) -> SimResult<Self> {
        let cfg: SceneConfig = serde_yaml::from_str(text).map_err(|e| invalid(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> SimResult<()> {
        if !(self.engine.timestep > 0.0) {
            return Err(invalid("engine.timestep must be positive"));
        }
        let s = &self.spheres;
        if !(s.radius[0] > 0.0 && s.radius[0] <= s.radius[1]) {
            return Err(invalid("spheres.radius must be a positive [min, max] range"));
        }
        if !(s.position[0] <= s.position[1]) {
            return Err(invalid("spheres.position must be a [min, max] range"));
        }
        if !(s.mass > 0.0) {
            return Err(invalid("spheres.mass must be positive"));
        }
        if !(0.0..1.0).contains(&s.linear_damping) {
            return Err(invalid("spheres.linear_damping must be in [0, 1)"));
        }
        if s.bodies.iter().any(|b| !(b.radius > 0.0)) {
            return Err(invalid("spheres.bodies radius must be positive"));
        }
        if !(self.tracker.radius > 0.0) {
            return Err(invalid("tracker.radius must be positive"));
        }
        let h = self.boundaries.half_spacing;
        if !(h > 0.0) {
            return Err(invalid("boundaries.half_spacing must be positive"));
        }
        // a sphere must fit between the two boundary planes
        if s.bodies.is_empty() && s.radius[1] >= h {
            return Err(invalid("spheres.radius max must be below boundaries.half_spacing"));
        }
        if s.bodies.iter().any(|b| b.radius >= h) {
            return Err(invalid("spheres.bodies radius must be below boundaries.half_spacing"));
        }
        let c = &self.camera;
        if !(c.fov > 0.0 && c.fov < 180.0 && c.near > 0.0 && c.far > c.near) {
            return Err(invalid("camera needs 0 < fov < 180 and 0 < near < far"));
        }
        if !(self.pointer.reference_radius > 0.0) {
            return Err(invalid("pointer.reference_radius must be positive"));
        }
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(invalid("viewport size must be non-zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_stock_scene() {
        let cfg = SceneConfig::from_yaml_str("{}").expect("defaults");
        assert_eq!(cfg.spheres.count, 12);
        assert_eq!(cfg.spheres.linear_damping, 0.95);
        assert_eq!(cfg.spheres.pull, 30.0);
        assert_eq!(cfg.boundaries.half_spacing, 0.7);
        assert_eq!(cfg.pointer.surface, ReferenceSurface::Sphere);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let yaml = "spheres:\n  count: 3\n  bodies:\n    - radius: 0.2\n      position: [1.0, 0.0, 0.0]\npointer:\n  surface: view_plane\n";
        let cfg = SceneConfig::from_yaml_str(yaml).expect("parse");
        assert_eq!(cfg.spheres.count, 3);
        assert_eq!(cfg.spheres.seed, 1);
        assert_eq!(cfg.spheres.bodies.len(), 1);
        assert_eq!(cfg.pointer.surface, ReferenceSurface::ViewPlane);
    }

    #[test]
    fn bad_values_are_rejected() {
        let err = SceneConfig::from_yaml_str("spheres:\n  radius: [0.4, 0.1]\n");
        assert!(matches!(err, Err(SimError::InvalidConfig(_))));

        let err = SceneConfig::from_yaml_str("engine:\n  timestep: 0.0\n");
        assert!(matches!(err, Err(SimError::InvalidConfig(_))));

        let err = SceneConfig::from_yaml_str("camera:\n  near: 10.0\n  far: 1.0\n");
        assert!(matches!(err, Err(SimError::InvalidConfig(_))));

        // wider than the gap between the boundary planes
        let err = SceneConfig::from_yaml_str("spheres:\n  radius: [0.1, 0.7]\n");
        assert!(matches!(err, Err(SimError::InvalidConfig(_))));

        let err = SceneConfig::from_yaml_str(
            "spheres:\n  bodies:\n    - radius: 0.8\n      position: [0.0, 0.0, 0.05]\nboundaries:\n  half_spacing: 0.7\n",
        );
        assert!(matches!(err, Err(SimError::InvalidConfig(_))));

        let ok = SceneConfig::from_yaml_str("spheres:\n  radius: [0.1, 0.69]\n");
        assert!(ok.is_ok());
    }
}
