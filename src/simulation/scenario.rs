//! Build runtime scenes from configuration
//!
//! Takes a `SceneConfig` (YAML-facing) and produces a `Scenario`:
//! - runtime `Parameters`
//! - the initial sphere descriptors, seeded or explicit, in construction order
//! - camera/pointer/viewport settings the simulator needs at construction
//!
//! The sphere layout is deterministic for a given seed: each sphere draws its
//! radius and then its x, y, z from one seeded generator, in index order.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::configuration::config::SceneConfig;
use crate::error::SimResult;
use crate::simulation::params::Parameters;
use crate::simulation::states::{NVec3, SphereDescriptor};

#[derive(Debug, Clone)]
pub struct Scenario {
    pub parameters: Parameters,
    pub spheres: Vec<SphereDescriptor>,
    pub config: SceneConfig,
}

impl Scenario {
    pub fn build_scenario(cfg: SceneConfig) -> SimResult<Self> {
        cfg.validate()?;

        let parameters = Parameters {
            timestep: cfg.engine.timestep,
            gravity: NVec3::from(cfg.engine.gravity),
            sphere_mass: cfg.spheres.mass,
            linear_damping: cfg.spheres.linear_damping,
            pull: cfg.spheres.pull,
            tracker_radius: cfg.tracker.radius,
            half_spacing: cfg.boundaries.half_spacing,
        };

        let spheres = if cfg.spheres.bodies.is_empty() {
            seeded_spheres(
                cfg.spheres.count,
                cfg.spheres.seed,
                cfg.spheres.radius,
                cfg.spheres.position,
            )
        } else {
            cfg.spheres
                .bodies
                .iter()
                .map(|b| SphereDescriptor::new(b.radius, b.position))
                .collect()
        };

        Ok(Self {
            parameters,
            spheres,
            config: cfg,
        })
    }
}

/// `count` spheres with radius in `radius` and each coordinate in `position`
pub fn seeded_spheres(count: usize, seed: u64, radius: [f64; 2], position: [f64; 2]) -> Vec<SphereDescriptor> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut draw = |range: [f64; 2]| {
        if range[0] < range[1] {
            rng.gen_range(range[0]..range[1])
        } else {
            range[0]
        }
    };

    (0..count)
        .map(|_| {
            let r = draw(radius);
            let p = [draw(position), draw(position), draw(position)];
            SphereDescriptor::new(r, p)
        })
        .collect()
}
