//! Frame orchestration for the sphere cluster.
//!
//! The `Simulator` owns the world, the debug scene and camera, the offscreen
//! target and the pointer projector. One `update` per display frame:
//!
//! 1. step the world by one fixed timestep
//! 2. update every damped sphere, write its position into the shared buffer
//! 3. teleport the tracker to the projected pointer
//! 4. render the debug scene into the offscreen target, then rebind the default
//!
//! Construction runs one body pass without stepping, so the buffer and debug
//! visuals are in sync and the first step already carries the pull.

use std::rc::Rc;

use log::{debug, info, warn};

use super::bodies::{BoundaryPlane, DampedSphere, TrackerSphere};
use super::body::Body;
use super::scenario::Scenario;
use super::states::{NVec3, SphereBuffer};
use super::world::World;
use crate::error::{SimError, SimResult};
use crate::pointer::camera::PerspectiveCamera;
use crate::pointer::events::PointerEventBus;
use crate::pointer::projector::Projector;
use crate::render::scene::Scene;
use crate::render::target::{RenderTarget, Renderer, TextureHandle};

pub struct Simulator {
    world: World,
    scene: Scene,
    camera: PerspectiveCamera,
    target: RenderTarget,
    projector: Projector,
    spheres: Vec<DampedSphere>,
    descriptors: SphereBuffer,
    tracker: TrackerSphere,
    planes: [BoundaryPlane; 2], // back, front
    disposed: bool,
}

impl Simulator {
    /// Build the scene described by `scenario` with a fresh descriptor buffer,
    /// reachable through [`Simulator::spheres`].
    pub fn new(scenario: &Scenario, bus: &Rc<PointerEventBus>) -> SimResult<Self> {
        Self::with_buffer(scenario, bus, SphereBuffer::default())
    }

    /// Build the scene and publish sphere positions into `buffer`, which the
    /// caller owns and may read at any time. Its previous contents are
    /// replaced by the scenario's initial layout; from then on the simulator
    /// is the only writer.
    pub fn with_buffer(scenario: &Scenario, bus: &Rc<PointerEventBus>, buffer: SphereBuffer) -> SimResult<Self> {
        let cfg = &scenario.config;
        let params = &scenario.parameters;
        let width = cfg.viewport.width;
        let height = cfg.viewport.height;

        // render target + camera
        let target = RenderTarget::new(width, height);
        let mut camera = PerspectiveCamera::new(
            cfg.camera.fov,
            width as f64 / height.max(1) as f64,
            cfg.camera.near,
            cfg.camera.far,
        )
        .with_position(NVec3::from(cfg.camera.position));
        camera.look_at(NVec3::zeros());

        let mut world = World::new(params.gravity, params.timestep);
        let mut scene = Scene::new();
        let projector = Projector::new(bus, cfg.pointer.surface, cfg.pointer.reference_radius);
        let debug_visuals = cfg.debug.visuals;

        // spheres, in descriptor order
        buffer.reset(&scenario.spheres);
        let descriptors = buffer;
        let mut spheres = Vec::with_capacity(scenario.spheres.len());
        for d in &scenario.spheres {
            let mut sphere = DampedSphere::new(&mut world, d, params)?;
            if debug_visuals {
                sphere.debug(&mut scene)?;
            }
            spheres.push(sphere);
        }

        // pointer tracker
        let mut tracker = TrackerSphere::new(&mut world, params.tracker_radius)?;
        if debug_visuals {
            tracker.debug(&mut scene)?;
        }

        // depth constraints, both facing the origin
        let h = params.half_spacing;
        let size = cfg.boundaries.debug_size;
        let mut back = BoundaryPlane::new(&mut world, NVec3::new(0.0, 0.0, -h), [0.0, 0.0, 0.0])?;
        let mut front = BoundaryPlane::new(&mut world, NVec3::new(0.0, 0.0, h), [std::f64::consts::PI, 0.0, 0.0])?;
        if debug_visuals {
            back.debug(&mut scene, size)?;
            front.debug(&mut scene, size)?;
        }

        let mut sim = Self {
            world,
            scene,
            camera,
            target,
            projector,
            spheres,
            descriptors,
            tracker,
            planes: [back, front],
            disposed: false,
        };
        sim.update_bodies();

        info!(
            "simulator ready: {} spheres, {} bodies, target {}x{}",
            sim.spheres.len(),
            sim.world.len(),
            width,
            height
        );
        Ok(sim)
    }

    /// Advance one frame and render the debug scene offscreen
    pub fn update<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> SimResult<()> {
        if self.disposed {
            return Err(SimError::Disposed);
        }

        self.world.fixed_step();
        self.update_bodies();

        renderer.set_render_target(Some(&self.target));
        let rendered = renderer.render(&self.scene, &self.camera);
        renderer.set_render_target(None);
        rendered
    }

    fn update_bodies(&mut self) {
        for (i, sphere) in self.spheres.iter_mut().enumerate() {
            let coordinates = sphere.update(&mut self.world, &mut self.scene, ());
            self.descriptors.write_position(i, &coordinates.position);
        }

        let pointer = self.projector.position(&mut self.camera);
        self.tracker.update(&mut self.world, &mut self.scene, pointer);

        for plane in self.planes.iter_mut() {
            plane.update(&mut self.world, &mut self.scene, ());
        }
    }

    /// New viewport size: camera aspect and target size follow it
    pub fn handle_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            warn!("ignoring resize to {}x{}", width, height);
            return;
        }
        let aspect = width as f64 / height as f64;
        if self.camera.aspect != aspect {
            self.camera.aspect = aspect;
            self.camera.update_projection_matrix();
        }
        if self.target.set_size(width, height) {
            debug!("simulator target resized to {}x{}", width, height);
        }
    }

    pub fn set_camera_position_z(&mut self, z: f64) {
        self.camera.position.z = z;
    }

    /// Color buffer of the offscreen target
    pub fn texture(&self) -> TextureHandle {
        self.target.texture()
    }

    /// Shared sphere descriptors, index-aligned with construction order
    pub fn spheres(&self) -> SphereBuffer {
        self.descriptors.clone()
    }

    pub fn sphere_bodies(&self) -> &[DampedSphere] {
        &self.spheres
    }

    pub fn tracker(&self) -> &TrackerSphere {
        &self.tracker
    }

    /// Current tracker position
    pub fn tracker_position(&mut self) -> NVec3 {
        self.tracker.read_coordinates(&self.world).position
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    pub fn render_target(&self) -> &RenderTarget {
        &self.target
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Release the target, stop listening to pointer events and remove every
    /// body. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.target.dispose();
        self.projector.dispose();

        for sphere in self.spheres.iter_mut() {
            sphere.detach(&mut self.world, &mut self.scene);
        }
        self.tracker.detach(&mut self.world, &mut self.scene);
        for plane in self.planes.iter_mut() {
            plane.detach(&mut self.world, &mut self.scene);
        }

        self.disposed = true;
        info!("simulator disposed");
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        self.dispose();
    }
}
