//! The three body roles built on [`PhysicalBody`]:
//! - [`DampedSphere`]  dynamic, heavily damped, pulled toward the origin
//! - [`TrackerSphere`] kinematic, teleported to an external point every frame
//! - [`BoundaryPlane`] static plane bounding the depth axis

use super::body::{Body, PhysicalBody};
use super::forces::quat_from_euler_xyz;
use super::params::Parameters;
use super::states::{Coordinates, NVec3, SphereDescriptor};
use super::world::{RigidBody, Shape, World};
use crate::error::SimResult;
use crate::render::scene::{DebugVisual, Scene, VisualId};

/// Red, so the pointer sphere stands out from the cluster
pub const TRACKER_DEBUG_COLOR: [f32; 3] = [1.0, 0.0, 0.0];

#[derive(Debug)]
pub struct DampedSphere {
    body: PhysicalBody,
    radius: f64,
    pull: f64,
}

impl DampedSphere {
    pub fn new(world: &mut World, descriptor: &SphereDescriptor, params: &Parameters) -> SimResult<Self> {
        let mut body = PhysicalBody::new();
        let rigid = RigidBody::dynamic(
            Shape::Sphere {
                radius: descriptor.radius,
            },
            params.sphere_mass,
        )
        .with_position(descriptor.position_vec())
        .with_linear_damping(params.linear_damping)
        .with_fixed_rotation(true);
        body.attach(world, rigid)?;

        Ok(Self {
            body,
            radius: descriptor.radius,
            pull: params.pull,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Signed magnitude of the per-frame pull (negative = inward)
    pub fn pull_magnitude(&self) -> f64 {
        -self.pull * self.radius
    }

    pub fn debug(&mut self, scene: &mut Scene) -> SimResult<VisualId> {
        self.body
            .attach_debug_visual(scene, DebugVisual::wire_sphere(self.radius))
    }
}

impl Body for DampedSphere {
    type Input = ();
    type Output = Coordinates;

    fn physical(&self) -> &PhysicalBody {
        &self.body
    }

    fn physical_mut(&mut self) -> &mut PhysicalBody {
        &mut self.body
    }

    /// Queue the inward pull for the next step and report the current pose
    fn update(&mut self, world: &mut World, scene: &mut Scene, _: ()) -> Coordinates {
        self.body
            .apply_force(world, self.pull_magnitude(), &NVec3::zeros());
        self.body.sync_debug_visual(world, scene);
        self.body.read_coordinates(world)
    }
}

#[derive(Debug)]
pub struct TrackerSphere {
    body: PhysicalBody,
    radius: f64,
}

impl TrackerSphere {
    pub fn new(world: &mut World, radius: f64) -> SimResult<Self> {
        let mut body = PhysicalBody::new();
        body.attach(world, RigidBody::kinematic(Shape::Sphere { radius }))?;
        Ok(Self { body, radius })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn debug(&mut self, scene: &mut Scene) -> SimResult<VisualId> {
        self.body.attach_debug_visual(
            scene,
            DebugVisual::wire_sphere(self.radius).with_color(TRACKER_DEBUG_COLOR),
        )
    }
}

impl Body for TrackerSphere {
    type Input = NVec3;
    type Output = ();

    fn physical(&self) -> &PhysicalBody {
        &self.body
    }

    fn physical_mut(&mut self) -> &mut PhysicalBody {
        &mut self.body
    }

    /// Teleport to `target`: no velocity, no lag
    fn update(&mut self, world: &mut World, scene: &mut Scene, target: NVec3) {
        if let Some(handle) = self.body.handle() {
            if let Some(rigid) = world.get_mut(handle) {
                rigid.position = target;
                rigid.velocity = NVec3::zeros();
            }
        }
        self.body.sync_debug_visual(world, scene);
    }
}

#[derive(Debug)]
pub struct BoundaryPlane {
    body: PhysicalBody,
}

impl BoundaryPlane {
    /// Static plane at `position`, rotated by XYZ Euler angles (radians).
    /// Unrotated, the plane faces +z.
    pub fn new(world: &mut World, position: NVec3, rotation: [f64; 3]) -> SimResult<Self> {
        let mut body = PhysicalBody::new();
        let rigid = RigidBody::fixed(Shape::Plane)
            .with_position(position)
            .with_rotation(quat_from_euler_xyz(rotation));
        body.attach(world, rigid)?;
        Ok(Self { body })
    }

    pub fn debug(&mut self, scene: &mut Scene, size: [f64; 2]) -> SimResult<VisualId> {
        self.body
            .attach_debug_visual(scene, DebugVisual::wire_plane(size))
    }
}

impl Body for BoundaryPlane {
    type Input = ();
    type Output = ();

    fn physical(&self) -> &PhysicalBody {
        &self.body
    }

    fn physical_mut(&mut self) -> &mut PhysicalBody {
        &mut self.body
    }

    fn update(&mut self, world: &mut World, scene: &mut Scene, _: ()) {
        self.body.sync_debug_visual(world, scene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        World::new(NVec3::zeros(), 1.0 / 60.0)
    }

    #[test]
    fn damped_sphere_queues_radius_scaled_pull() {
        let mut w = world();
        let mut scene = Scene::new();
        let params = Parameters::default();
        let mut sphere =
            DampedSphere::new(&mut w, &SphereDescriptor::new(0.2, [0.0, 3.0, 0.0]), &params).expect("sphere");

        sphere.update(&mut w, &mut scene, ());
        let handle = sphere.physical().handle().expect("handle");
        let force = w.get(handle).map(|b| b.force()).expect("body");
        assert!((force - NVec3::new(0.0, -6.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn tracker_teleports_exactly() {
        let mut w = world();
        let mut scene = Scene::new();
        let mut tracker = TrackerSphere::new(&mut w, 0.5).expect("tracker");
        let id = tracker.debug(&mut scene).expect("visual");

        let target = NVec3::new(0.123456789, -0.5, 0.75);
        tracker.update(&mut w, &mut scene, target);
        assert_eq!(tracker.read_coordinates(&w).position, target);
        assert_eq!(scene.get(id).map(|v| v.position), Some(target));
        assert_eq!(scene.get(id).map(|v| v.color), Some(TRACKER_DEBUG_COLOR));

        w.fixed_step();
        assert_eq!(tracker.read_coordinates(&w).position, target);
    }

    #[test]
    fn plane_stays_put() {
        let mut w = world();
        let mut scene = Scene::new();
        let mut plane = BoundaryPlane::new(&mut w, NVec3::new(0.0, 0.0, 0.7), [std::f64::consts::PI, 0.0, 0.0])
            .expect("plane");
        plane.debug(&mut scene, [2.0, 2.0]).expect("visual");
        for _ in 0..5 {
            w.fixed_step();
            plane.update(&mut w, &mut scene, ());
        }
        assert_eq!(plane.read_coordinates(&w).position, NVec3::new(0.0, 0.0, 0.7));
    }
}
