//! Core state types shared by the simulation and its consumers.
//!
//! - `NVec3` / `NQuat` vector and rotation aliases (f64, like the rest of the engine)
//! - `Coordinates` pose read back from a body
//! - `SphereDescriptor` / `SphereBuffer` the externally visible sphere array
//!
//! The sphere buffer is the single output the visual effect reads every frame.
//! The simulator is its only writer; anyone holding a clone may read it.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use nalgebra::{UnitQuaternion, Vector3};

pub type NVec3 = Vector3<f64>;
pub type NQuat = UnitQuaternion<f64>;

/// Position + orientation of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub position: NVec3,
    pub quaternion: NQuat,
}

impl Default for Coordinates {
    fn default() -> Self {
        Self {
            position: NVec3::zeros(),
            quaternion: NQuat::identity(),
        }
    }
}

/// Configuration and runtime state of one damped sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereDescriptor {
    pub radius: f64,        // positive
    pub position: [f64; 3], // latest simulated position
}

impl SphereDescriptor {
    pub fn new(radius: f64, position: [f64; 3]) -> Self {
        Self { radius, position }
    }

    pub fn position_vec(&self) -> NVec3 {
        NVec3::new(self.position[0], self.position[1], self.position[2])
    }
}

/// Shared, index-stable array of sphere descriptors.
///
/// Cloning the buffer clones the handle, not the data. Order never changes
/// after construction, so `spheres()[i]` always belongs to the i-th sphere.
#[derive(Debug, Clone, Default)]
pub struct SphereBuffer {
    inner: Rc<RefCell<Vec<SphereDescriptor>>>,
}

impl SphereBuffer {
    pub fn new(descriptors: Vec<SphereDescriptor>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(descriptors)),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Borrow the current descriptors for reading
    pub fn spheres(&self) -> Ref<'_, [SphereDescriptor]> {
        Ref::map(self.inner.borrow(), |v| v.as_slice())
    }

    /// Copy of the descriptor at `index`
    pub fn get(&self, index: usize) -> Option<SphereDescriptor> {
        self.inner.borrow().get(index).copied()
    }

    /// Replace the contents with the initial layout of a new simulator
    pub(crate) fn reset(&self, descriptors: &[SphereDescriptor]) {
        let mut inner = self.inner.borrow_mut();
        inner.clear();
        inner.extend_from_slice(descriptors);
    }

    /// Only the simulator writes positions
    pub(crate) fn write_position(&self, index: usize, position: &NVec3) {
        if let Some(d) = self.inner.borrow_mut().get_mut(index) {
            d.position = [position.x, position.y, position.z];
        }
    }
}
