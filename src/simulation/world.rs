//! The dynamics world: a generational arena of rigid bodies stepped with a
//! fixed timestep.
//!
//! Bodies come in three kinds:
//! - `Dynamic`   integrates forces, gravity and damping
//! - `Kinematic` only moves when its position is assigned (or by its own velocity)
//! - `Static`    never moves, acts as a collision surface
//!
//! Shapes are limited to spheres and infinite planes (normal = local +z).

use log::debug;

use super::contacts::{constrain_sphere, Halfspace};
use super::integrator::integrate_body;
use super::states::{NQuat, NVec3};

/// Generational handle into a [`World`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Dynamic,
    Kinematic,
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere { radius: f64 },
    Plane, // infinite, facing local +z
}

/// Cannon-style default, light spin decay
pub const DEFAULT_ANGULAR_DAMPING: f64 = 0.01;

#[derive(Debug, Clone)]
pub struct RigidBody {
    pub kind: BodyKind,
    pub shape: Shape,
    pub position: NVec3,
    pub quaternion: NQuat,
    pub velocity: NVec3,
    pub angular_velocity: NVec3,
    pub linear_damping: f64,
    pub angular_damping: f64,
    pub fixed_rotation: bool,
    mass: f64,
    inv_mass: f64,
    inv_inertia: f64, // uniform sphere, scalar is enough
    force: NVec3,
    torque: NVec3,
}

impl RigidBody {
    fn with_kind(kind: BodyKind, shape: Shape, mass: f64) -> Self {
        let (mass, inv_mass) = match kind {
            BodyKind::Dynamic if mass > 0.0 => (mass, 1.0 / mass),
            _ => (0.0, 0.0),
        };
        let inv_inertia = match shape {
            Shape::Sphere { radius } if inv_mass > 0.0 && radius > 0.0 => {
                1.0 / (0.4 * mass * radius * radius)
            }
            _ => 0.0,
        };
        Self {
            kind,
            shape,
            position: NVec3::zeros(),
            quaternion: NQuat::identity(),
            velocity: NVec3::zeros(),
            angular_velocity: NVec3::zeros(),
            linear_damping: 0.0,
            angular_damping: DEFAULT_ANGULAR_DAMPING,
            fixed_rotation: false,
            mass,
            inv_mass,
            inv_inertia,
            force: NVec3::zeros(),
            torque: NVec3::zeros(),
        }
    }

    /// Body driven by forces with the given mass
    pub fn dynamic(shape: Shape, mass: f64) -> Self {
        Self::with_kind(BodyKind::Dynamic, shape, mass)
    }

    /// Body driven by explicit position assignment
    pub fn kinematic(shape: Shape) -> Self {
        Self::with_kind(BodyKind::Kinematic, shape, 0.0)
    }

    /// Immovable body, infinite effective mass
    pub fn fixed(shape: Shape) -> Self {
        Self::with_kind(BodyKind::Static, shape, 0.0)
    }

    pub fn with_position(mut self, position: NVec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, quaternion: NQuat) -> Self {
        self.quaternion = quaternion;
        self
    }

    pub fn with_linear_damping(mut self, damping: f64) -> Self {
        self.linear_damping = damping;
        self
    }

    pub fn with_fixed_rotation(mut self, fixed: bool) -> Self {
        self.fixed_rotation = fixed;
        self
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn inv_mass(&self) -> f64 {
        self.inv_mass
    }

    pub fn inv_inertia(&self) -> f64 {
        if self.fixed_rotation {
            0.0
        } else {
            self.inv_inertia
        }
    }

    /// Force accumulated since the last step
    pub fn force(&self) -> NVec3 {
        self.force
    }

    /// Torque accumulated since the last step
    pub fn torque(&self) -> NVec3 {
        self.torque
    }

    /// Accumulate `force` applied at `relative_point` (offset from the body origin).
    /// Only dynamic bodies respond to forces.
    pub fn apply_force(&mut self, force: &NVec3, relative_point: &NVec3) {
        if self.kind != BodyKind::Dynamic {
            return;
        }
        self.force += force;
        self.torque += relative_point.cross(force);
    }

    pub fn clear_forces(&mut self) {
        self.force = NVec3::zeros();
        self.torque = NVec3::zeros();
    }

    /// World-space plane normal (local +z rotated by the body orientation)
    pub fn plane_normal(&self) -> NVec3 {
        self.quaternion * NVec3::z()
    }
}

/// Single simulation space owning every rigid body
#[derive(Debug)]
pub struct World {
    pub gravity: NVec3,
    timestep: f64,
    slots: Vec<Option<RigidBody>>,
    generations: Vec<u32>,
    free: Vec<u32>,
    time: f64,
    steps: u64,
}

impl World {
    pub fn new(gravity: NVec3, timestep: f64) -> Self {
        Self {
            gravity,
            timestep,
            slots: Vec::new(),
            generations: Vec::new(),
            free: Vec::new(),
            time: 0.0,
            steps: 0,
        }
    }

    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    /// Simulated time advanced so far
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Number of live bodies
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        let handle = match self.free.pop() {
            Some(index) => {
                let i = index as usize;
                self.generations[i] = self.generations[i].wrapping_add(1);
                self.slots[i] = Some(body);
                BodyHandle {
                    index,
                    generation: self.generations[i],
                }
            }
            None => {
                self.slots.push(Some(body));
                self.generations.push(0);
                BodyHandle {
                    index: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        };
        debug!("world: added body {:?}", handle);
        handle
    }

    pub fn remove_body(&mut self, handle: BodyHandle) -> Option<RigidBody> {
        if !self.contains(handle) {
            return None;
        }
        let body = self.slots[handle.index as usize].take();
        self.free.push(handle.index);
        debug!("world: removed body {:?}", handle);
        body
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        let i = handle.index as usize;
        i < self.slots.len() && self.generations[i] == handle.generation && self.slots[i].is_some()
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&RigidBody> {
        if !self.contains(handle) {
            return None;
        }
        self.slots[handle.index as usize].as_ref()
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        if !self.contains(handle) {
            return None;
        }
        self.slots[handle.index as usize].as_mut()
    }

    /// Advance the world by exactly one fixed timestep
    pub fn fixed_step(&mut self) {
        let dt = self.timestep;
        let gravity = self.gravity;

        // Integrate: forces -> velocity -> position
        for body in self.slots.iter_mut().flatten() {
            integrate_body(body, dt, &gravity);
        }

        // Static planes bound the dynamic spheres
        let planes: Vec<Halfspace> = self
            .slots
            .iter()
            .flatten()
            .filter_map(Halfspace::from_body)
            .collect();
        if !planes.is_empty() {
            for body in self.slots.iter_mut().flatten() {
                constrain_sphere(body, &planes);
            }
        }

        for body in self.slots.iter_mut().flatten() {
            body.clear_forces();
        }

        self.time += dt;
        self.steps += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_handle_is_stale_after_slot_reuse() {
        let mut world = World::new(NVec3::zeros(), 1.0 / 60.0);
        let a = world.add_body(RigidBody::dynamic(Shape::Sphere { radius: 0.1 }, 1.0));
        assert!(world.remove_body(a).is_some());

        let b = world.add_body(RigidBody::kinematic(Shape::Sphere { radius: 0.1 }));
        assert_ne!(a, b);
        assert!(world.get(a).is_none());
        assert!(world.get(b).is_some());
        assert!(world.remove_body(a).is_none());
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn static_body_ignores_forces() {
        let mut world = World::new(NVec3::new(0.0, -9.8, 0.0), 1.0 / 60.0);
        let h = world.add_body(RigidBody::fixed(Shape::Plane).with_position(NVec3::new(0.0, 0.0, 1.0)));
        if let Some(b) = world.get_mut(h) {
            b.apply_force(&NVec3::new(5.0, 0.0, 0.0), &NVec3::zeros());
        }
        for _ in 0..10 {
            world.fixed_step();
        }
        let b = world.get(h).map(|b| b.position);
        assert_eq!(b, Some(NVec3::new(0.0, 0.0, 1.0)));
        assert_eq!(world.steps(), 10);
    }

    #[test]
    fn force_at_offset_produces_torque() {
        let mut body = RigidBody::dynamic(Shape::Sphere { radius: 0.5 }, 1.0);
        body.apply_force(&NVec3::new(0.0, 1.0, 0.0), &NVec3::new(1.0, 0.0, 0.0));
        assert!((body.torque() - NVec3::new(0.0, 0.0, 1.0)).norm() < 1e-12);

        body.clear_forces();
        assert_eq!(body.force(), NVec3::zeros());
    }

    #[test]
    fn forces_are_cleared_after_step() {
        let mut world = World::new(NVec3::zeros(), 1.0 / 60.0);
        let h = world.add_body(RigidBody::dynamic(Shape::Sphere { radius: 0.1 }, 1.0));
        if let Some(b) = world.get_mut(h) {
            b.apply_force(&NVec3::new(1.0, 0.0, 0.0), &NVec3::zeros());
        }
        world.fixed_step();
        let b = world.get(h).expect("body");
        assert_eq!(b.force(), NVec3::zeros());
        assert!(b.velocity.x > 0.0);
    }
}
