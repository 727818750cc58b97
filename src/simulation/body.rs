//! Lifecycle core shared by every simulated entity.
//!
//! A [`PhysicalBody`] owns at most one rigid-body handle in a [`World`] and at
//! most one debug visual in a [`Scene`]. Concrete roles wrap it and implement
//! [`Body::update`] to say what one frame means for them.
//!
//! Reads and forces before attachment are silent no-ops: coordinates stay at
//! the cached origin/identity defaults. That keeps construction order
//! forgiving, but a body that never got attached will not complain.

use log::debug;

use super::forces::radial_force;
use super::states::{Coordinates, NVec3};
use super::world::{BodyHandle, RigidBody, World};
use crate::error::{SimError, SimResult};
use crate::render::scene::{DebugVisual, Scene, VisualId};

#[derive(Debug, Default)]
pub struct PhysicalBody {
    handle: Option<BodyHandle>,
    visual: Option<VisualId>,
    coordinates: Coordinates, // read-back cache
}

impl PhysicalBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> Option<BodyHandle> {
        self.handle
    }

    pub fn visual(&self) -> Option<VisualId> {
        self.visual
    }

    pub fn is_attached(&self) -> bool {
        self.handle.is_some()
    }

    /// Register `body` with the world. Exactly once per instance.
    pub fn attach(&mut self, world: &mut World, body: RigidBody) -> SimResult<BodyHandle> {
        if self.handle.is_some() {
            return Err(SimError::AlreadyAttached);
        }
        let handle = world.add_body(body);
        self.handle = Some(handle);
        Ok(handle)
    }

    /// Register a debug proxy in `scene`. At most once per instance.
    pub fn attach_debug_visual(&mut self, scene: &mut Scene, visual: DebugVisual) -> SimResult<VisualId> {
        if self.visual.is_some() {
            return Err(SimError::VisualAlreadyAttached);
        }
        let id = scene.add(visual);
        self.visual = Some(id);
        Ok(id)
    }

    /// Push `magnitude` along the unit direction of the current position,
    /// applied at `relative_point` from the body origin.
    /// No-op without a handle, zero force at the exact origin.
    pub fn apply_force(&self, world: &mut World, magnitude: f64, relative_point: &NVec3) {
        let Some(handle) = self.handle else {
            return;
        };
        let Some(body) = world.get_mut(handle) else {
            return;
        };
        let force = radial_force(&body.position, magnitude);
        body.apply_force(&force, relative_point);
    }

    /// Current pose; the cached one when nothing is attached
    pub fn read_coordinates(&mut self, world: &World) -> Coordinates {
        if let Some(body) = self.handle.and_then(|h| world.get(h)) {
            self.coordinates = Coordinates {
                position: body.position,
                quaternion: body.quaternion,
            };
        }
        self.coordinates
    }

    /// Copy the pose onto the debug visual when both are attached
    pub fn sync_debug_visual(&mut self, world: &World, scene: &mut Scene) {
        if self.handle.is_none() || self.visual.is_none() {
            return;
        }
        let coordinates = self.read_coordinates(world);
        if let Some(id) = self.visual {
            if let Some(visual) = scene.get_mut(id) {
                visual.position = coordinates.position;
                visual.quaternion = coordinates.quaternion;
            }
        }
    }

    /// Remove the rigid body and debug visual; safe to call more than once
    pub fn detach(&mut self, world: &mut World, scene: &mut Scene) {
        if let Some(handle) = self.handle.take() {
            world.remove_body(handle);
            debug!("detached body {:?}", handle);
        }
        if let Some(id) = self.visual.take() {
            scene.remove(id);
        }
    }
}

/// Flat capability interface shared by the body roles
pub trait Body {
    /// What the role needs from outside each frame
    type Input;
    /// What the role reports back
    type Output;

    fn physical(&self) -> &PhysicalBody;
    fn physical_mut(&mut self) -> &mut PhysicalBody;

    /// Advance the role by one frame
    fn update(&mut self, world: &mut World, scene: &mut Scene, input: Self::Input) -> Self::Output;

    fn read_coordinates(&mut self, world: &World) -> Coordinates {
        self.physical_mut().read_coordinates(world)
    }

    fn detach(&mut self, world: &mut World, scene: &mut Scene) {
        self.physical_mut().detach(world, scene);
    }
}
