//! Pointer-to-world projection.
//!
//! The projector listens to mouse and touch moves, keeps the latest pointer
//! position in normalized device coordinates and, on demand, turns it into a
//! world-space point: a ray is cast from the camera through the pointer and
//! resolved against a reference surface around the origin.
//!
//! Two surfaces are supported:
//! - `Sphere`: intersection with a sphere of `reference_radius`. Rays that
//!   miss are resolved to their closest approach, pushed onto the sphere, so
//!   the result always lies on it.
//! - `ViewPlane`: the plane through the origin facing the camera, reached with
//!   `distance = |o| / cos(pi - angle(dir, o))`. The distance diverges at
//!   grazing angles and is clamped to the camera far plane.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use log::debug;
use serde::Deserialize;

use super::camera::PerspectiveCamera;
use super::events::{ListenerId, NVec2, PointerEventBus, PointerEventKind};
use crate::simulation::states::NVec3;

/// Below this cosine the view-plane ray counts as parallel
pub const GRAZING_COS: f64 = 1e-6;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferenceSurface {
    #[serde(rename = "sphere")]
    #[default]
    Sphere,

    #[serde(rename = "view_plane")]
    ViewPlane,
}

#[derive(Debug)]
pub struct Projector {
    pointer: Rc<Cell<NVec2>>,
    surface: ReferenceSurface,
    reference_radius: f64,
    bus: Weak<PointerEventBus>,
    listeners: Vec<ListenerId>,
}

impl Projector {
    /// Subscribe to mouse and touch moves on `bus`
    pub fn new(bus: &Rc<PointerEventBus>, surface: ReferenceSurface, reference_radius: f64) -> Self {
        let pointer = Rc::new(Cell::new(NVec2::zeros()));
        let mut listeners = Vec::with_capacity(2);

        for kind in [PointerEventKind::MouseMove, PointerEventKind::TouchMove] {
            let state = pointer.clone();
            let id = bus.add_listener(kind, move |event, viewport| {
                if let Some([x, y]) = event.primary_position() {
                    state.set(viewport.normalize(x, y));
                }
            });
            listeners.push(id);
        }

        Self {
            pointer,
            surface,
            reference_radius,
            bus: Rc::downgrade(bus),
            listeners,
        }
    }

    /// Latest pointer position in normalized device coordinates
    pub fn pointer(&self) -> NVec2 {
        self.pointer.get()
    }

    /// Overwrite the pointer directly (hosts without an event stream)
    pub fn set_pointer(&self, ndc: NVec2) {
        self.pointer.set(ndc);
    }

    pub fn surface(&self) -> ReferenceSurface {
        self.surface
    }

    pub fn reference_radius(&self) -> f64 {
        self.reference_radius
    }

    pub fn is_listening(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// World point under the pointer, recomputed on every call
    pub fn position(&self, camera: &mut PerspectiveCamera) -> NVec3 {
        camera.update_matrix_world();

        let origin = camera.world_position();
        let pointer = self.pointer.get();
        let through = camera.unproject(&NVec3::new(pointer.x, pointer.y, 0.5));
        let dir = match (through - origin).try_normalize(1e-12) {
            Some(d) => d,
            None => return origin,
        };

        match self.surface {
            ReferenceSurface::Sphere => ray_onto_sphere(&origin, &dir, self.reference_radius),
            ReferenceSurface::ViewPlane => ray_onto_view_plane(&origin, &dir, camera.far),
        }
    }

    /// Unsubscribe from the event bus; calling again does nothing
    pub fn dispose(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        if let Some(bus) = self.bus.upgrade() {
            for id in self.listeners.drain(..) {
                bus.remove_listener(id);
            }
        } else {
            self.listeners.clear();
        }
        debug!("projector listeners removed");
    }
}

impl Drop for Projector {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Nearest point where the ray meets the sphere, or the closest approach
/// projected onto it when the ray misses
pub fn ray_onto_sphere(origin: &NVec3, dir: &NVec3, radius: f64) -> NVec3 {
    let b = origin.dot(dir);
    let c = origin.norm_squared() - radius * radius;
    let disc = b * b - c;

    if disc >= 0.0 {
        let root = disc.sqrt();
        let near = -b - root;
        let t = if near >= 0.0 { near } else { -b + root };
        if t >= 0.0 {
            return origin + dir * t;
        }
    }

    let closest = origin + dir * (-b).max(0.0);
    match closest.try_normalize(1e-12) {
        Some(n) => n * radius,
        None => NVec3::z() * radius,
    }
}

/// Point on the plane through the origin perpendicular to `origin`
pub fn ray_onto_view_plane(origin: &NVec3, dir: &NVec3, max_distance: f64) -> NVec3 {
    let angle = dir.angle(origin);
    let cos = (std::f64::consts::PI - angle).cos();
    let distance = if cos > GRAZING_COS {
        (origin.norm() / cos).min(max_distance)
    } else {
        max_distance
    };
    origin + dir * distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointer::events::{PointerEvent, Viewport};

    fn setup(surface: ReferenceSurface) -> (Rc<PointerEventBus>, Projector, PerspectiveCamera) {
        let bus = Rc::new(PointerEventBus::new(Viewport::new(800.0, 600.0)));
        let projector = Projector::new(&bus, surface, 1.0);
        let mut camera = PerspectiveCamera::new(50.0, 800.0 / 600.0, 0.01, 100.0)
            .with_position(NVec3::new(0.0, 0.0, 3.0));
        camera.look_at(NVec3::zeros());
        (bus, projector, camera)
    }

    #[test]
    fn center_pointer_hits_front_of_sphere() {
        let (_bus, projector, mut camera) = setup(ReferenceSurface::Sphere);
        let p = projector.position(&mut camera);
        assert!((p - NVec3::new(0.0, 0.0, 1.0)).norm() < 1e-9);
    }

    #[test]
    fn mouse_event_updates_pointer() {
        let (bus, projector, _) = setup(ReferenceSurface::Sphere);
        bus.dispatch(&PointerEvent::MouseMove { page_x: 600.0, page_y: 150.0 });
        assert!((projector.pointer() - NVec2::new(0.5, 0.5)).norm() < 1e-12);
    }

    #[test]
    fn view_plane_center_is_origin() {
        let (_bus, projector, mut camera) = setup(ReferenceSurface::ViewPlane);
        let p = projector.position(&mut camera);
        assert!(p.norm() < 1e-9);
    }

    #[test]
    fn view_plane_point_lies_in_plane() {
        let (_bus, projector, mut camera) = setup(ReferenceSurface::ViewPlane);
        projector.set_pointer(NVec2::new(0.7, -0.4));
        let p = projector.position(&mut camera);
        assert!(p.z.abs() < 1e-9);
        assert!(p.x > 0.0 && p.y < 0.0);
    }

    #[test]
    fn grazing_view_plane_ray_is_clamped() {
        let origin = NVec3::new(0.0, 0.0, 3.0);
        let parallel = NVec3::new(1.0, 0.0, 0.0);
        let p = ray_onto_view_plane(&origin, &parallel, 100.0);
        assert!(p.iter().all(|c| c.is_finite()));
        assert!(((p - origin).norm() - 100.0).abs() < 1e-9);

        // nearly parallel but still converging: huge but bounded
        let almost = NVec3::new(1.0, 0.0, -1e-4).normalize();
        let q = ray_onto_view_plane(&origin, &almost, 100.0);
        assert!((q - origin).norm() <= 100.0 + 1e-9);
    }

    #[test]
    fn missing_ray_lands_on_silhouette() {
        let origin = NVec3::new(0.0, 0.0, 3.0);
        let dir = NVec3::new(0.0, 1.0, -1.0).normalize();
        let p = ray_onto_sphere(&origin, &dir, 1.0);
        assert!((p.norm() - 1.0).abs() < 1e-12);
        assert!(p.y > 0.0);
    }

    #[test]
    fn dispose_unsubscribes_once() {
        let (bus, mut projector, _) = setup(ReferenceSurface::Sphere);
        assert_eq!(bus.listener_count(), 2);
        projector.dispose();
        projector.dispose();
        assert_eq!(bus.listener_count(), 0);
        assert!(!projector.is_listening());

        bus.dispatch(&PointerEvent::MouseMove { page_x: 0.0, page_y: 0.0 });
        assert_eq!(projector.pointer(), NVec2::zeros());
    }

    #[test]
    fn drop_unsubscribes() {
        let bus = Rc::new(PointerEventBus::new(Viewport::new(10.0, 10.0)));
        {
            let _projector = Projector::new(&bus, ReferenceSurface::Sphere, 1.0);
            assert_eq!(bus.listener_count(), 2);
        }
        assert_eq!(bus.listener_count(), 0);
    }
}
