//! Debug scene: the simple stand-in meshes that make body poses visible.
//!
//! The scene only stores shape, color and pose per visual; drawing it is the
//! job of whatever [`Renderer`](crate::render::target::Renderer) the host
//! provides. Insertion order is kept so renderers draw deterministically.

use crate::simulation::states::{NQuat, NVec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualId(u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisualShape {
    Sphere { radius: f64 },
    Plane { width: f64, height: f64 }, // in the local xy plane
}

#[derive(Debug, Clone, PartialEq)]
pub struct DebugVisual {
    pub shape: VisualShape,
    pub color: [f32; 3],
    pub wireframe: bool,
    pub visible: bool,
    pub position: NVec3,
    pub quaternion: NQuat,
}

impl DebugVisual {
    fn wire(shape: VisualShape) -> Self {
        Self {
            shape,
            color: [1.0, 1.0, 1.0],
            wireframe: true,
            visible: true,
            position: NVec3::zeros(),
            quaternion: NQuat::identity(),
        }
    }

    /// White wireframe sphere
    pub fn wire_sphere(radius: f64) -> Self {
        Self::wire(VisualShape::Sphere { radius })
    }

    /// White wireframe plane of `size = [width, height]`
    pub fn wire_plane(size: [f64; 2]) -> Self {
        Self::wire(VisualShape::Plane {
            width: size[0],
            height: size[1],
        })
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }
}

#[derive(Debug, Default)]
pub struct Scene {
    visuals: Vec<(VisualId, DebugVisual)>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, visual: DebugVisual) -> VisualId {
        let id = VisualId(self.next_id);
        self.next_id += 1;
        self.visuals.push((id, visual));
        id
    }

    pub fn remove(&mut self, id: VisualId) -> Option<DebugVisual> {
        let pos = self.visuals.iter().position(|(v, _)| *v == id)?;
        Some(self.visuals.remove(pos).1)
    }

    pub fn get(&self, id: VisualId) -> Option<&DebugVisual> {
        self.visuals.iter().find(|(v, _)| *v == id).map(|(_, d)| d)
    }

    pub fn get_mut(&mut self, id: VisualId) -> Option<&mut DebugVisual> {
        self.visuals.iter_mut().find(|(v, _)| *v == id).map(|(_, d)| d)
    }

    pub fn iter(&self) -> impl Iterator<Item = (VisualId, &DebugVisual)> {
        self.visuals.iter().map(|(id, d)| (*id, d))
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    pub fn clear(&mut self) {
        self.visuals.clear();
    }
}
